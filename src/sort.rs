//! Sort classification and the managed sort wrapper.

use crate::engine::{ObjectKind, RawHandle};
use crate::environment::Environment;
use crate::error::BridgeError;
use crate::gc::Managed;

/// The closed set of sort kinds the engine can report.
///
/// Discriminants are the engine's wire tags; the numbering is part of the
/// engine contract. A tag outside this set means the bridge and the engine
/// disagree on their versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SortKind {
    /// Uninterpreted (free) sort.
    Uninterpreted = 0,
    /// Boolean sort.
    Bool = 1,
    /// Integer sort.
    Int = 2,
    /// Real sort.
    Real = 3,
    /// Bit-vector sort.
    BitVec = 4,
    /// Array sort.
    Array = 5,
    /// Datatype sort.
    Datatype = 6,
    /// Relation sort.
    Relation = 7,
    /// Finite-domain sort.
    FiniteDomain = 8,
}

impl SortKind {
    /// Every supported kind.
    pub const ALL: [SortKind; 9] = [
        SortKind::Uninterpreted,
        SortKind::Bool,
        SortKind::Int,
        SortKind::Real,
        SortKind::BitVec,
        SortKind::Array,
        SortKind::Datatype,
        SortKind::Relation,
        SortKind::FiniteDomain,
    ];

    /// Map an engine tag to a kind; `None` for tags outside the closed set.
    pub fn from_tag(tag: u32) -> Option<SortKind> {
        match tag {
            0 => Some(SortKind::Uninterpreted),
            1 => Some(SortKind::Bool),
            2 => Some(SortKind::Int),
            3 => Some(SortKind::Real),
            4 => Some(SortKind::BitVec),
            5 => Some(SortKind::Array),
            6 => Some(SortKind::Datatype),
            7 => Some(SortKind::Relation),
            8 => Some(SortKind::FiniteDomain),
            _ => None,
        }
    }

    /// The engine tag for this kind.
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl std::fmt::Display for SortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortKind::Uninterpreted => "Uninterpreted",
            SortKind::Bool => "Bool",
            SortKind::Int => "Int",
            SortKind::Real => "Real",
            SortKind::BitVec => "BitVec",
            SortKind::Array => "Array",
            SortKind::Datatype => "Datatype",
            SortKind::Relation => "Relation",
            SortKind::FiniteDomain => "FiniteDomain",
        };
        f.write_str(name)
    }
}

/// A counted reference to an engine sort, classified by kind.
///
/// Sorts are immutable: the kind read at classification time matches the
/// engine's answer for the whole lifetime of the wrapper.
///
/// `Sort` deliberately does not implement `PartialEq`: sort equality is
/// structural and defined by the engine, so it is fallible (the environment
/// may be torn down). Use [`Sort::structurally_equals`].
pub struct Sort {
    managed: Managed,
    kind: SortKind,
}

impl Sort {
    /// Read the kind tag of `handle` from the engine and return the matching
    /// variant, with a counted reference acquired.
    ///
    /// An unrecognized tag fails with [`BridgeError::UnsupportedSortKind`]
    /// and constructs nothing; no reference count is touched.
    pub fn classify(env: &Environment, handle: RawHandle) -> Result<Sort, BridgeError> {
        env.ensure_open()?;
        if handle.is_null() {
            return Err(BridgeError::InvalidHandle { operation: "classify" });
        }

        let tag = env.engine().sort_kind_tag(handle);
        let kind = SortKind::from_tag(tag).ok_or(BridgeError::UnsupportedSortKind { tag })?;

        let managed = Managed::acquire(env, ObjectKind::Sort, handle)?;
        Ok(Sort { managed, kind })
    }

    /// The kind this sort was classified as.
    #[inline]
    pub fn kind(&self) -> SortKind {
        self.kind
    }

    /// The underlying engine handle.
    #[inline]
    pub fn handle(&self) -> RawHandle {
        self.managed.handle()
    }

    /// The environment this sort belongs to.
    #[inline]
    pub fn environment(&self) -> &Environment {
        self.managed.env()
    }

    /// The sort's display identifier, queried from the engine. Never empty.
    pub fn name(&self) -> Result<String, BridgeError> {
        self.managed.env().ensure_open()?;
        Ok(self.managed.env().engine().sort_name(self.handle()))
    }

    /// Engine-defined structural equality.
    ///
    /// Distinct representations of the same sort compare equal; sorts from
    /// different environments never do.
    pub fn structurally_equals(&self, other: &Sort) -> Result<bool, BridgeError> {
        self.managed.env().ensure_open()?;
        if self.environment() != other.environment() {
            return Ok(false);
        }
        Ok(self
            .managed
            .env()
            .engine()
            .is_eq_sort(self.handle(), other.handle()))
    }
}

/// Renders the engine's full structural description of the sort. After
/// environment teardown a placeholder is written instead, since the engine
/// can no longer be asked.
impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.managed.env().is_closed() {
            return f.write_str("<environment torn down>");
        }
        f.write_str(&self.managed.env().engine().sort_to_string(self.handle()))
    }
}

impl std::fmt::Debug for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sort")
            .field("kind", &self.kind)
            .field("handle", &self.handle())
            .finish()
    }
}
