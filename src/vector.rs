//! Managed wrapper for engine AST vectors.

use crate::ast::Ast;
use crate::engine::{ObjectKind, RawHandle};
use crate::environment::Environment;
use crate::error::BridgeError;
use crate::gc::Managed;

/// A counted reference to an engine-owned vector of ASTs.
///
/// Produced by [`crate::AstMap::keys`] as a snapshot; the engine does not
/// update it when the source map changes.
pub struct AstVector {
    managed: Managed,
}

impl AstVector {
    /// Acquire a counted reference to the vector denoted by `handle`.
    pub(crate) fn acquire(env: &Environment, handle: RawHandle) -> Result<AstVector, BridgeError> {
        let managed = Managed::acquire(env, ObjectKind::Vector, handle)?;
        Ok(AstVector { managed })
    }

    /// Number of entries.
    pub fn len(&self) -> Result<usize, BridgeError> {
        self.env().ensure_open()?;
        Ok(self.env().engine().vector_size(self.managed.handle()))
    }

    /// The entry at `index`, as a fresh counted reference.
    ///
    /// Out-of-range indices fail with [`BridgeError::InvalidHandle`].
    pub fn get(&self, index: usize) -> Result<Ast, BridgeError> {
        self.env().ensure_open()?;
        let handle = self.env().engine().vector_get(self.managed.handle(), index);
        if handle.is_null() {
            return Err(BridgeError::InvalidHandle {
                operation: "vector_get",
            });
        }
        Ast::acquire(self.env(), handle)
    }

    /// All entries, each as a fresh counted reference.
    pub fn to_vec(&self) -> Result<Vec<Ast>, BridgeError> {
        let len = self.len()?;
        let mut out = Vec::with_capacity(len);
        for index in 0..len {
            out.push(self.get(index)?);
        }
        Ok(out)
    }

    /// The environment this vector belongs to.
    #[inline]
    pub fn environment(&self) -> &Environment {
        self.managed.env()
    }

    fn env(&self) -> &Environment {
        self.managed.env()
    }
}

impl std::fmt::Debug for AstVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstVector")
            .field("handle", &self.managed.handle())
            .finish()
    }
}
