//! Safe managed wrappers over a reference-counted native term engine.
//!
//! The engine owns its objects (AST nodes, sorts, AST-to-AST maps) behind
//! opaque handles and is only safe to call from one owning thread. This
//! crate pairs each handle with an [`Environment`] in a wrapper that
//! increments the engine-side reference count on acquire and *defers* the
//! decrement when dropped: drops may happen on any thread, so they only
//! enqueue into a per-kind queue that the owning thread drains before the
//! next same-kind acquire (or via [`Environment::flush_pending`]).

pub mod ast;
pub mod engine;
pub mod environment;
pub mod error;
pub mod gc;
pub mod map;
pub mod sort;
pub mod vector;

// Core API
pub use ast::Ast;
pub use engine::{Engine, ObjectKind, RawHandle};
pub use environment::Environment;
pub use error::BridgeError;
pub use gc::DeferredDecrementQueue;
pub use map::AstMap;
pub use sort::{Sort, SortKind};
pub use vector::AstVector;
