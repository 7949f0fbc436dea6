//! Error taxonomy for the bridge.

use thiserror::Error;

/// Errors surfaced by bridge operations.
///
/// None of these are transient: every variant indicates a contract violation
/// (or, for [`BridgeError::KeyNotFound`], an absent key the caller can probe
/// for beforehand). No operation is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A null handle, or a handle belonging to a different environment, was
    /// passed to `operation`.
    #[error("invalid handle passed to `{operation}`")]
    InvalidHandle {
        /// The operation that rejected the handle.
        operation: &'static str,
    },

    /// `find` was called with a key that is not in the map.
    ///
    /// The engine signals this as an error rather than returning a default
    /// value; callers that want a tolerant lookup should call `contains`
    /// first.
    #[error("key not present in map")]
    KeyNotFound,

    /// The engine reported a sort kind tag outside the known closed set.
    ///
    /// This indicates a version skew between the bridge and the engine.
    /// Fatal: retrying cannot succeed.
    #[error("engine reported unsupported sort kind tag {tag}")]
    UnsupportedSortKind {
        /// The raw tag the engine returned.
        tag: u32,
    },

    /// An operation was attempted on an object whose environment has already
    /// been torn down.
    ///
    /// The bridge promises the engine is never called after its environment
    /// is closed, so this is detected and surfaced instead of forwarded.
    #[error("environment has been torn down")]
    UseAfterTeardown,
}
