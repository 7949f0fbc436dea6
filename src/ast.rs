//! Managed wrapper for engine AST nodes.

use crate::engine::{ObjectKind, RawHandle};
use crate::environment::Environment;
use crate::error::BridgeError;
use crate::gc::Managed;

/// A counted reference to an engine AST node.
///
/// Two `Ast` values are equal iff they come from the same environment and
/// carry the same engine object. AST equality is identity of the underlying
/// engine object, never wrapper identity.
pub struct Ast {
    managed: Managed,
}

impl Ast {
    /// Acquire a counted reference to the AST denoted by `handle`.
    ///
    /// Fails with [`BridgeError::InvalidHandle`] when `handle` is the null
    /// sentinel and [`BridgeError::UseAfterTeardown`] when the environment
    /// has been closed.
    pub fn acquire(env: &Environment, handle: RawHandle) -> Result<Ast, BridgeError> {
        let managed = Managed::acquire(env, ObjectKind::Ast, handle)?;
        Ok(Ast { managed })
    }

    /// The underlying engine handle.
    #[inline]
    pub fn handle(&self) -> RawHandle {
        self.managed.handle()
    }

    /// The environment this AST belongs to.
    #[inline]
    pub fn environment(&self) -> &Environment {
        self.managed.env()
    }

    pub(crate) fn managed(&self) -> &Managed {
        &self.managed
    }
}

impl PartialEq for Ast {
    fn eq(&self, other: &Self) -> bool {
        self.environment() == other.environment() && self.handle() == other.handle()
    }
}

impl Eq for Ast {}

impl std::fmt::Debug for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ast").field("handle", &self.handle()).finish()
    }
}
