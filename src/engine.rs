//! The boundary with the native term engine.
//!
//! The engine is an external collaborator: it owns the real data (AST graph,
//! sorts, associative maps) behind reference-counted opaque handles, and it
//! is only safe to call from the thread that owns the session. Everything the
//! bridge needs from it is captured by the [`Engine`] trait; production
//! builds implement it over the engine's FFI, tests substitute an in-memory
//! simulation.

/// Opaque identifier for an engine-owned object.
///
/// The bridge never interprets a handle; it only passes it back to the
/// engine. Equality is identity of the underlying engine object, not of
/// wrapper instances: two wrappers may carry the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(usize);

impl RawHandle {
    /// The engine's sentinel for "no object".
    pub const NULL: RawHandle = RawHandle(0);

    /// Wrap a raw engine object id.
    pub const fn new(id: usize) -> Self {
        RawHandle(id)
    }

    /// Whether this is the null sentinel.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The raw id, for engine implementations.
    #[inline]
    pub fn id(&self) -> usize {
        self.0
    }
}

/// The distinct reference-count families the engine exposes.
///
/// The engine's increment/decrement entry point differs per kind, so each
/// kind gets its own deferred-decrement queue in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Plain AST node.
    Ast,
    /// Sort (type) node.
    Sort,
    /// AST-to-AST associative map.
    Map,
    /// AST vector (e.g. a key snapshot).
    Vector,
}

impl ObjectKind {
    /// Every kind, in queue-index order.
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Ast,
        ObjectKind::Sort,
        ObjectKind::Map,
        ObjectKind::Vector,
    ];

    /// Index of this kind into the environment's queue table.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            ObjectKind::Ast => 0,
            ObjectKind::Sort => 1,
            ObjectKind::Map => 2,
            ObjectKind::Vector => 3,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::Ast => "ast",
            ObjectKind::Sort => "sort",
            ObjectKind::Map => "map",
            ObjectKind::Vector => "vector",
        };
        f.write_str(name)
    }
}

/// Direct, blocking operations on the native engine.
///
/// Every call is finite and non-suspending. Reference-count adjustments are
/// void and infallible; absence and out-of-range conditions are reported
/// through `Option`/null returns and mapped to typed errors by the bridge.
///
/// Implementations must be callable from the owning thread only; the bridge
/// guarantees it never calls the engine from a drop context or after the
/// owning environment is torn down.
pub trait Engine: Send + Sync {
    /// Increment the reference count of `handle`.
    fn increment(&self, kind: ObjectKind, handle: RawHandle);

    /// Decrement the reference count of `handle`.
    ///
    /// The engine frees the object's storage when the count reaches zero.
    fn decrement(&self, kind: ObjectKind, handle: RawHandle);

    /// Create a fresh, empty AST-to-AST map. The returned handle starts with
    /// a zero reference count; the caller is expected to acquire it.
    fn create_map(&self) -> RawHandle;

    /// Whether `key` is present in `map`.
    fn map_contains(&self, map: RawHandle, key: RawHandle) -> bool;

    /// The value associated with `key`, or `None` when absent (the engine's
    /// signaled key-not-found error).
    fn map_find(&self, map: RawHandle, key: RawHandle) -> Option<RawHandle>;

    /// Store or replace the pair (`key`, `value`).
    fn map_insert(&self, map: RawHandle, key: RawHandle, value: RawHandle);

    /// Remove `key` if present; no-op otherwise.
    fn map_erase(&self, map: RawHandle, key: RawHandle);

    /// Remove all pairs.
    fn map_reset(&self, map: RawHandle);

    /// Current number of pairs.
    fn map_size(&self, map: RawHandle) -> usize;

    /// Snapshot of the current keys as a fresh vector handle (zero reference
    /// count, caller acquires). Mutating the map afterwards does not affect
    /// the snapshot.
    fn map_keys(&self, map: RawHandle) -> RawHandle;

    /// Engine-rendered structural dump of all pairs.
    fn map_to_string(&self, map: RawHandle) -> String;

    /// Number of entries in a vector.
    fn vector_size(&self, vector: RawHandle) -> usize;

    /// Entry at `index`, or [`RawHandle::NULL`] when out of range.
    fn vector_get(&self, vector: RawHandle, index: usize) -> RawHandle;

    /// The raw sort kind tag of `sort`. See [`crate::SortKind`] for the
    /// closed set of tags the bridge understands.
    fn sort_kind_tag(&self, sort: RawHandle) -> u32;

    /// Display identifier of `sort`. Never empty.
    fn sort_name(&self, sort: RawHandle) -> String;

    /// Engine-rendered structural description of `sort`.
    fn sort_to_string(&self, sort: RawHandle) -> String;

    /// Structural sort equality. Distinct representations of the same sort
    /// compare equal; this is not handle identity.
    fn is_eq_sort(&self, a: RawHandle, b: RawHandle) -> bool;
}
