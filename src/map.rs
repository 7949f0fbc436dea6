//! Managed wrapper for engine AST-to-AST maps.

use crate::ast::Ast;
use crate::engine::ObjectKind;
use crate::environment::Environment;
use crate::error::BridgeError;
use crate::gc::Managed;
use crate::vector::AstVector;

/// An engine-owned map from AST to AST with unique keys.
///
/// All operations proxy to the engine through the map's handle. Arguments
/// must belong to the same environment as the map; a cross-environment
/// argument is a usage error and fails with [`BridgeError::InvalidHandle`].
pub struct AstMap {
    managed: Managed,
}

impl AstMap {
    /// Create a fresh, empty map under `env`.
    pub fn create(env: &Environment) -> Result<AstMap, BridgeError> {
        env.ensure_open()?;
        let handle = env.engine().create_map();
        let managed = Managed::acquire(env, ObjectKind::Map, handle)?;
        Ok(AstMap { managed })
    }

    /// Whether `key` is present. Pure query, never mutates.
    pub fn contains(&self, key: &Ast) -> Result<bool, BridgeError> {
        self.check_arg(key, "map_contains")?;
        Ok(self
            .env()
            .engine()
            .map_contains(self.managed.handle(), key.handle()))
    }

    /// The value associated with `key`.
    ///
    /// Fails with [`BridgeError::KeyNotFound`] when `key` is absent: the
    /// engine signals this, and the bridge propagates it rather than mask it
    /// with a default. On success the returned [`Ast`] is a fresh counted
    /// reference, not an alias of the inserted value wrapper.
    pub fn find(&self, key: &Ast) -> Result<Ast, BridgeError> {
        self.check_arg(key, "map_find")?;
        let value = self
            .env()
            .engine()
            .map_find(self.managed.handle(), key.handle())
            .ok_or(BridgeError::KeyNotFound)?;
        Ast::acquire(self.env(), value)
    }

    /// Store or replace the pair (`key`, `value`).
    pub fn insert(&mut self, key: &Ast, value: &Ast) -> Result<(), BridgeError> {
        self.check_arg(key, "map_insert")?;
        self.check_arg(value, "map_insert")?;
        self.env()
            .engine()
            .map_insert(self.managed.handle(), key.handle(), value.handle());
        Ok(())
    }

    /// Remove the pair for `key` if present; a no-op (not an error) when
    /// absent.
    pub fn erase(&mut self, key: &Ast) -> Result<(), BridgeError> {
        self.check_arg(key, "map_erase")?;
        self.env()
            .engine()
            .map_erase(self.managed.handle(), key.handle());
        Ok(())
    }

    /// Remove all pairs.
    pub fn reset(&mut self) -> Result<(), BridgeError> {
        self.env().ensure_open()?;
        self.env().engine().map_reset(self.managed.handle());
        Ok(())
    }

    /// Current number of pairs.
    pub fn size(&self) -> Result<usize, BridgeError> {
        self.env().ensure_open()?;
        Ok(self.env().engine().map_size(self.managed.handle()))
    }

    /// Snapshot of the current keys, in an engine-internal iteration order.
    ///
    /// Not a live view: mutating the map afterwards does not affect a
    /// previously obtained snapshot.
    pub fn keys(&self) -> Result<AstVector, BridgeError> {
        self.env().ensure_open()?;
        let vector = self.env().engine().map_keys(self.managed.handle());
        AstVector::acquire(self.env(), vector)
    }

    /// The environment this map belongs to.
    #[inline]
    pub fn environment(&self) -> &Environment {
        self.managed.env()
    }

    fn env(&self) -> &Environment {
        self.managed.env()
    }

    fn check_arg(&self, arg: &Ast, operation: &'static str) -> Result<(), BridgeError> {
        self.env().ensure_open()?;
        self.managed.ensure_same_env(arg.managed(), operation)
    }
}

/// Renders the engine's structural dump of all pairs. After environment
/// teardown a placeholder is written instead.
impl std::fmt::Display for AstMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.env().is_closed() {
            return f.write_str("<environment torn down>");
        }
        f.write_str(&self.env().engine().map_to_string(self.managed.handle()))
    }
}

impl std::fmt::Debug for AstMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstMap")
            .field("handle", &self.managed.handle())
            .finish()
    }
}
