//! Deferred decrement queue for engine handles.
//!
//! This module provides thread-safe deferred reference-count decrements for
//! handles whose wrappers may be dropped from threads that are not allowed
//! to call the engine.
//!
//! ## Problem
//!
//! Engine reference counts should only be adjusted from the owning thread.
//! A wrapper holding a counted handle might be dropped from a collector or
//! worker thread that must not call into the engine.
//!
//! ## Solution
//!
//! Queue the handle for a deferred decrement, then process the queue from
//! the owning thread: automatically before the next same-kind acquire, or
//! explicitly via [`crate::Environment::flush_pending`].
//!
//! ## Usage
//!
//! ```ignore
//! use crate::gc::DeferredDecrementQueue;
//!
//! // Per-kind queue (stored in the Environment)
//! let queue = DeferredDecrementQueue::new(ObjectKind::Ast);
//!
//! // From any thread, defer a decrement
//! queue.defer(handle);
//!
//! // From the owning thread, apply pending decrements
//! queue.process_all(&*engine);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::engine::{Engine, ObjectKind, RawHandle};

/// Per-kind queue of handles pending a reference-count decrement.
///
/// The queue is thread-safe and can receive handles from any thread. Pending
/// handles are decremented when `process_all()` is called on the owning
/// thread. A handle may appear more than once: each finalized counted
/// reference contributes one entry, and each entry is exactly one decrement.
pub struct DeferredDecrementQueue {
    /// The reference-count family this queue decrements.
    kind: ObjectKind,

    /// Handles pending decrement, in enqueue order.
    queue: Mutex<VecDeque<RawHandle>>,

    /// Fast check for pending items (avoids lock acquisition on hot path)
    pending_count: AtomicU64,
}

impl DeferredDecrementQueue {
    /// Create a new empty queue for `kind`.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            queue: Mutex::new(VecDeque::with_capacity(8)),
            pending_count: AtomicU64::new(0),
        }
    }

    /// The kind this queue decrements.
    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Queue a handle for a deferred decrement.
    ///
    /// Thread-safe; never calls the engine. Safe to call concurrently with
    /// `process_all` and with `defer` from other threads.
    pub fn defer(&self, handle: RawHandle) {
        self.queue
            .lock()
            .expect("deferred decrement queue poisoned")
            .push_back(handle);
        self.pending_count.fetch_add(1, Ordering::Release);

        tracing::trace!(
            "Deferred {} decrement (pending: {})",
            self.kind,
            self.len()
        );
    }

    /// Check if there are pending decrements.
    ///
    /// This is a fast lock-free check.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending_count.load(Ordering::Acquire) > 0
    }

    /// Get the number of pending decrements.
    #[inline]
    pub fn len(&self) -> u64 {
        self.pending_count.load(Ordering::Acquire)
    }

    /// Check if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.has_pending()
    }

    /// Apply all pending decrements through `engine`, in enqueue order.
    ///
    /// Must be called from the owning thread only, never from a drop
    /// context, because the engine is not reentrant-safe from there. The
    /// queue is emptied atomically first, so `defer` calls racing this one
    /// land in the next batch.
    ///
    /// Called automatically before every same-kind acquire, so the count
    /// delta the engine observes is always a `+1` applied after all
    /// currently-known `-1`s.
    pub fn process_all(&self, engine: &dyn Engine) {
        // Fast path: no pending decrements
        if !self.has_pending() {
            return;
        }

        // Take all pending handles
        let handles: VecDeque<RawHandle> = {
            let mut queue = self
                .queue
                .lock()
                .expect("deferred decrement queue poisoned");
            std::mem::take(&mut *queue)
        };

        let count = handles.len();

        if count == 0 {
            return;
        }

        for handle in handles {
            engine.decrement(self.kind, handle);
        }

        self.pending_count
            .fetch_sub(count as u64, Ordering::Release);

        tracing::trace!("Processed {} deferred {} decrements", count, self.kind);
    }
}

impl std::fmt::Debug for DeferredDecrementQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredDecrementQueue")
            .field("kind", &self.kind)
            .field("pending_count", &self.len())
            .finish()
    }
}
