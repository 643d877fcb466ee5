//! # safesync
//!
//! Lock-guarded concurrent collections for sharing ordinary data between threads.
//!
//! ## Features
//!
//! - **Concurrent Map**: `HashMap` semantics behind a reader/writer lock; any number of
//!   readers or a single writer at a time
//! - **Concurrent Queue**: unbounded FIFO behind a mutex and condition variable, with
//!   non-blocking, blocking and timed consumers
//!
//! ## Quick Start
//!
//! ```rust
//! use safesync::{ConcurrentMap, ConcurrentQueue};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = ConcurrentMap::new();
//! map.set("answer", 42);
//! assert_eq!(map.get("answer"), Some(42));
//!
//! let queue = Arc::new(ConcurrentQueue::new());
//! let consumer = thread::spawn({
//!     let queue = Arc::clone(&queue);
//!     move || queue.dequeue_wait()
//! });
//! queue.enqueue("hello");
//! assert_eq!(consumer.join().unwrap(), "hello");
//! ```
//!
//! ## Thread Safety
//!
//! Every container owns its lock; no two instances share state. Callbacks passed to
//! [`ConcurrentMap::for_each`] run with the map's read lock held and must not call
//! back into the same map.
//!
//! ## Blocking
//!
//! [`ConcurrentQueue::dequeue_wait`] and [`ConcurrentQueue::peek_wait`] park the caller
//! until an element arrives and cannot be cancelled. Use
//! [`ConcurrentQueue::dequeue_timeout`] or [`ConcurrentQueue::peek_timeout`] when the
//! caller needs a way out.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod map;
pub mod metrics;
pub mod queue;

mod sync;

pub use crate::map::ConcurrentMap;
pub use crate::metrics::{MetricsCollector, PerformanceMetrics};
pub use crate::queue::ConcurrentQueue;

/// Error types for safesync operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A timed wait elapsed before an element became available
    Timeout,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Timeout => write!(f, "Timed out waiting for an element"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for safesync operations
pub type Result<T> = core::result::Result<T, Error>;
