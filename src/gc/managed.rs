//! Managed pairing of an engine handle with its owning environment.

use crate::engine::{ObjectKind, RawHandle};
use crate::environment::Environment;
use crate::error::BridgeError;

/// A counted reference to an engine-owned object.
///
/// While a `Managed` exists, the engine-side reference count of its handle
/// is at least one on account of this value's acquire. The pairing is
/// immutable: a "new value" is always a new `Managed`.
///
/// The concrete wrappers ([`crate::Ast`], [`crate::Sort`], [`crate::AstMap`],
/// [`crate::AstVector`]) embed one of these; none of them add lifetime rules
/// of their own.
pub(crate) struct Managed {
    env: Environment,
    handle: RawHandle,
    kind: ObjectKind,
}

impl Managed {
    /// Acquire a counted reference to `handle`.
    ///
    /// Drains the kind's deferred-decrement queue first, then increments, so
    /// the engine observes all currently-known `-1`s before this `+1`. That
    /// ordering bounds queue growth to the interval between two same-kind
    /// acquires and keeps handle reuse safe: a pending decrement can never
    /// be applied after an increment of a recycled handle value.
    ///
    /// Owning thread only.
    pub(crate) fn acquire(
        env: &Environment,
        kind: ObjectKind,
        handle: RawHandle,
    ) -> Result<Managed, BridgeError> {
        env.ensure_open()?;
        if handle.is_null() {
            return Err(BridgeError::InvalidHandle { operation: "acquire" });
        }

        env.drain(kind);
        env.engine().increment(kind, handle);

        Ok(Managed {
            env: env.clone(),
            handle,
            kind,
        })
    }

    #[inline]
    pub(crate) fn handle(&self) -> RawHandle {
        self.handle
    }

    #[inline]
    pub(crate) fn env(&self) -> &Environment {
        &self.env
    }

    /// The kind this reference was acquired as (for tests).
    #[cfg(test)]
    pub(crate) fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Fail unless `arg` belongs to the same environment as this object.
    pub(crate) fn ensure_same_env(
        &self,
        arg: &Managed,
        operation: &'static str,
    ) -> Result<(), BridgeError> {
        if self.env == arg.env {
            Ok(())
        } else {
            Err(BridgeError::InvalidHandle { operation })
        }
    }
}

impl Drop for Managed {
    /// Release this counted reference.
    ///
    /// Never calls the engine: the decrement is deferred into the kind's
    /// queue and applied on the owning thread at the next same-kind acquire
    /// or explicit flush. May run on any thread.
    fn drop(&mut self) {
        if self.env.is_closed() {
            // Teardown raced finalization; drop the decrement rather than
            // touch an engine that is no longer valid.
            tracing::trace!(
                "Discarding {} decrement after environment teardown",
                self.kind
            );
            return;
        }
        self.env.queue(self.kind).defer(self.handle);
    }
}

impl std::fmt::Debug for Managed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Managed")
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .finish()
    }
}
