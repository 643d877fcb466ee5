//! Queue implementations
//!
//! This module provides the blocking FIFO queue.
//!
//! ## Available Queues
//!
//! - [`ConcurrentQueue`]: unbounded multi-producer, multi-consumer FIFO guarded by a
//!   mutex, with a condition variable for blocking consumers
//!
//! ## Consumer Variants
//!
//! | Operation | Removes | Blocks |
//! |-----------|---------|--------|
//! | `dequeue` / `peek` | yes / no | never |
//! | `dequeue_wait` / `peek_wait` | yes / no | until an element arrives |
//! | `dequeue_timeout` / `peek_timeout` | yes / no | up to the timeout |
//!
//! ## Examples
//!
//! ```rust
//! use safesync::queue::ConcurrentQueue;
//! use std::time::Duration;
//!
//! let queue = ConcurrentQueue::new();
//! queue.enqueue("job");
//! assert_eq!(queue.dequeue(), Some("job"));
//! assert!(queue.dequeue_timeout(Duration::from_millis(1)).is_err());
//! ```

pub mod blocking;

pub use self::blocking::ConcurrentQueue;


#[cfg(all(test, not(loom)))]
mod proptests;
