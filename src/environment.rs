//! Session state shared by every managed wrapper.
//!
//! An [`Environment`] pairs the engine with one deferred-decrement queue per
//! object kind. It is cheaply cloneable; every wrapper created under it holds
//! a clone, so the queues outlive any wrapper that may still enqueue into
//! them from a drop context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ast::Ast;
use crate::engine::{Engine, ObjectKind, RawHandle};
use crate::error::BridgeError;
use crate::gc::DeferredDecrementQueue;
use crate::map::AstMap;
use crate::sort::Sort;
use crate::vector::AstVector;

struct EnvironmentInner {
    engine: Arc<dyn Engine>,

    /// One queue per kind, indexed by `ObjectKind::index()`. Read-only after
    /// construction; no queue is ever added or removed.
    queues: [DeferredDecrementQueue; 4],

    closed: AtomicBool,
}

impl Drop for EnvironmentInner {
    fn drop(&mut self) {
        // Last reference gone: no wrapper can enqueue anymore, so a final
        // drain is safe and leaves nothing behind.
        if !self.closed.load(Ordering::Acquire) {
            for queue in &self.queues {
                queue.process_all(&*self.engine);
            }
        }
    }
}

/// A session boundary: the engine plus per-kind deferred-decrement queues.
///
/// All direct engine calls must happen on the single owning thread. Wrappers
/// may be *dropped* from any thread; their drops only touch a queue.
///
/// Do not tear down an environment while a wrapper derived from it may still
/// be pending finalization: decrements deferred after [`Environment::close`]
/// are discarded, which leaks the engine-side reference.
#[derive(Clone)]
pub struct Environment {
    inner: Arc<EnvironmentInner>,
}

impl Environment {
    /// Create a new environment over `engine`.
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        tracing::debug!("Creating environment");
        let queues = ObjectKind::ALL.map(DeferredDecrementQueue::new);
        Environment {
            inner: Arc::new(EnvironmentInner {
                engine,
                queues,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Whether [`Environment::close`] has run.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Tear down the environment.
    ///
    /// Drains every queue first (the engine is still valid, so all known
    /// decrements are applied), then marks the environment closed. After
    /// this, every operation fails with [`BridgeError::UseAfterTeardown`]
    /// and drop-time decrements are discarded silently.
    ///
    /// Idempotent. Owning thread only.
    pub fn close(&self) {
        if self.is_closed() {
            return;
        }
        tracing::debug!("Closing environment");
        for queue in &self.inner.queues {
            queue.process_all(&*self.inner.engine);
        }
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Explicitly drain every pending decrement.
    ///
    /// The queues are also drained automatically before each same-kind
    /// acquire; this is for callers that want the engine-side counts settled
    /// at a known point. Owning thread only. No-op after teardown.
    pub fn flush_pending(&self) {
        if self.is_closed() {
            return;
        }
        for queue in &self.inner.queues {
            queue.process_all(&*self.inner.engine);
        }
    }

    /// Number of decrements currently pending for `kind`.
    pub fn pending(&self, kind: ObjectKind) -> u64 {
        self.queue(kind).len()
    }

    /// Create a fresh, empty AST-to-AST map owned by this environment.
    pub fn create_map(&self) -> Result<AstMap, BridgeError> {
        AstMap::create(self)
    }

    /// Classify `handle` into its concrete sort variant.
    pub fn classify_sort(&self, handle: RawHandle) -> Result<Sort, BridgeError> {
        Sort::classify(self, handle)
    }

    /// Wrap an engine AST handle, acquiring a counted reference to it.
    pub fn wrap_ast(&self, handle: RawHandle) -> Result<Ast, BridgeError> {
        Ast::acquire(self, handle)
    }

    /// Wrap an engine vector handle, acquiring a counted reference to it.
    pub fn wrap_vector(&self, handle: RawHandle) -> Result<AstVector, BridgeError> {
        AstVector::acquire(self, handle)
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        &*self.inner.engine
    }

    pub(crate) fn queue(&self, kind: ObjectKind) -> &DeferredDecrementQueue {
        &self.inner.queues[kind.index()]
    }

    /// Drain the queue for `kind`. No-op after teardown (the engine must not
    /// be called anymore; racing entries are discarded).
    pub(crate) fn drain(&self, kind: ObjectKind) {
        if self.is_closed() {
            return;
        }
        self.queue(kind).process_all(&*self.inner.engine);
    }

    /// Fail unless the environment is still usable.
    pub(crate) fn ensure_open(&self) -> Result<(), BridgeError> {
        if self.is_closed() {
            Err(BridgeError::UseAfterTeardown)
        } else {
            Ok(())
        }
    }
}

/// Two `Environment` values are equal iff they are the same session.
impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Environment {}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("closed", &self.is_closed())
            .finish()
    }
}
