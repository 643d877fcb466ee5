//! Blocking FIFO Queue for safesync
//!
//! An unbounded multi-producer, multi-consumer queue built as a monitor: one mutex
//! guards the storage and a condition variable parks consumers while it is empty.
//!
//! ## Wake Protocol
//!
//! - Every element appended signals exactly one parked waiter
//! - Waiters re-check emptiness in a loop after every wake, so spurious wakeups
//!   and signals already consumed by another waiter are harmless
//! - A peeker that had to wait leaves its element in place and passes the signal
//!   on, so a dequeuer parked beside it is never stranded on a non-empty queue
//!
//! ## Example
//!
//! ```rust
//! use safesync::queue::ConcurrentQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(ConcurrentQueue::new());
//!
//! let consumer = thread::spawn({
//!     let queue = Arc::clone(&queue);
//!     move || (0..3).map(|_| queue.dequeue_wait()).collect::<Vec<_>>()
//! });
//!
//! for i in 1..=3 {
//!     queue.enqueue(i);
//! }
//!
//! assert_eq!(consumer.join().unwrap(), vec![1, 2, 3]);
//! ```

use crate::metrics::{AtomicMetrics, MetricsCollector, PerformanceMetrics};
use crate::sync::{Condvar, Mutex};
use core::fmt;
use std::collections::VecDeque;
use std::time::Instant;

#[cfg(not(loom))]
use std::time::Duration;

/// An unbounded FIFO queue with non-blocking, blocking and timed consumers
///
/// The element count is the length of the guarded `VecDeque`, so it can only change
/// while the mutex is held and always matches the stored elements.
///
/// # Examples
///
/// ```rust
/// use safesync::queue::ConcurrentQueue;
///
/// let queue: ConcurrentQueue<i32> = ConcurrentQueue::new();
/// queue.enqueue(10);
/// queue.enqueue(30);
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.peek(), Some(10));
/// assert_eq!(queue.dequeue(), Some(10));
/// assert_eq!(queue.dequeue(), Some(30));
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct ConcurrentQueue<T> {
    elements: Mutex<VecDeque<T>>,
    available: Condvar,
    metrics: AtomicMetrics,
}

impl<T> ConcurrentQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::from_deque(VecDeque::new())
    }

    /// Create an empty queue with storage for `capacity` elements
    ///
    /// The queue still grows past `capacity`; this only avoids early reallocations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_deque(VecDeque::with_capacity(capacity))
    }

    fn from_deque(elements: VecDeque<T>) -> Self {
        Self {
            elements: Mutex::new(elements),
            available: Condvar::new(),
            metrics: AtomicMetrics::default(),
        }
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }

    /// Get the current number of elements in the queue
    pub fn len(&self) -> usize {
        self.elements.lock().len()
    }

    /// Append `element` at the tail and wake one parked consumer
    pub fn enqueue(&self, element: T) {
        let start = self.metrics.start();
        {
            let mut elements = self.elements.lock();
            elements.push_back(element);
            self.available.notify_one();
        }
        self.metrics.record_success(start);
    }

    /// Append every element of `values` under a single lock hold
    ///
    /// `values` is drained before the lock is taken, so the iterator may use this
    /// queue, and a panicking iterator appends nothing. One parked consumer is woken
    /// per element appended. Returns the number of elements appended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::queue::ConcurrentQueue;
    ///
    /// let queue: ConcurrentQueue<i32> = ConcurrentQueue::new();
    /// assert_eq!(queue.enqueue_batch(vec![1, 2, 3, 4, 5]), 5);
    /// assert_eq!(queue.len(), 5);
    /// ```
    pub fn enqueue_batch<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.metrics.start();
        let mut batch: VecDeque<T> = values.into_iter().collect();
        let pushed = batch.len();
        {
            let mut elements = self.elements.lock();
            elements.append(&mut batch);
            for _ in 0..pushed {
                self.available.notify_one();
            }
        }
        self.metrics.record_success(start);
        pushed
    }

    /// Remove and return the head element, or `None` if the queue is empty
    ///
    /// Never blocks.
    pub fn dequeue(&self) -> Option<T> {
        let start = self.metrics.start();
        let element = self.elements.lock().pop_front();
        self.record_poll(start, element.is_some());
        element
    }

    /// Remove up to `max_values` elements from the head in a single lock hold
    ///
    /// Never blocks; the result is empty if the queue is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::queue::ConcurrentQueue;
    ///
    /// let queue: ConcurrentQueue<i32> = (1..=3).collect();
    /// assert_eq!(queue.dequeue_batch(2), vec![1, 2]);
    /// assert_eq!(queue.dequeue_batch(2), vec![3]);
    /// assert!(queue.dequeue_batch(2).is_empty());
    /// ```
    pub fn dequeue_batch(&self, max_values: usize) -> Vec<T> {
        let start = self.metrics.start();
        let values: Vec<T> = {
            let mut elements = self.elements.lock();
            let count = max_values.min(elements.len());
            elements.drain(..count).collect()
        };
        self.record_poll(start, !values.is_empty());
        values
    }

    /// Remove and return the head element, parking until one is available
    ///
    /// There is no timeout and no cancellation: on a queue nobody enqueues to, this
    /// never returns. See [`dequeue_timeout`](Self::dequeue_timeout).
    pub fn dequeue_wait(&self) -> T {
        let start = self.metrics.start();
        let mut elements = self.elements.lock();
        let mut parked = false;
        let element = loop {
            if let Some(element) = elements.pop_front() {
                break element;
            }
            if !parked {
                self.metrics.record_contention();
                parked = true;
            }
            self.available.wait(&mut elements);
        };
        drop(elements);
        self.metrics.record_success(start);
        element
    }

    /// Remove and return the head element, parking for at most `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`](crate::Error::Timeout) if the queue stayed empty
    /// for the whole `timeout`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use safesync::queue::ConcurrentQueue;
    /// use safesync::Error;
    /// use std::time::Duration;
    ///
    /// let queue: ConcurrentQueue<i32> = ConcurrentQueue::new();
    /// assert_eq!(queue.dequeue_timeout(Duration::from_millis(10)), Err(Error::Timeout));
    ///
    /// queue.enqueue(7);
    /// assert_eq!(queue.dequeue_timeout(Duration::from_millis(10)), Ok(7));
    /// ```
    #[cfg(not(loom))]
    pub fn dequeue_timeout(&self, timeout: Duration) -> crate::Result<T> {
        self.wait_for_head(timeout, VecDeque::pop_front)
    }

    /// Remove every element
    ///
    /// Counts as one successful operation. Parked consumers stay parked.
    pub fn clear(&self) {
        let start = self.metrics.start();
        let drained = core::mem::take(&mut *self.elements.lock());
        drop(drained);
        self.metrics.record_success(start);
    }

    fn record_poll(&self, start: Option<Instant>, hit: bool) {
        if hit {
            self.metrics.record_success(start);
        } else {
            self.metrics.record_failure(start);
        }
    }

    /// Shared timed wait loop; `take` runs under the lock once the queue is non-empty
    #[cfg(not(loom))]
    fn wait_for_head<F>(&self, timeout: Duration, mut take: F) -> crate::Result<T>
    where
        F: FnMut(&mut VecDeque<T>) -> Option<T>,
    {
        let start = self.metrics.start();
        let deadline = Instant::now().checked_add(timeout);
        let mut elements = self.elements.lock();
        let mut parked = false;
        loop {
            if let Some(element) = take(&mut *elements) {
                drop(elements);
                self.metrics.record_success(start);
                return Ok(element);
            }
            if !parked {
                self.metrics.record_contention();
                parked = true;
            }
            match deadline {
                Some(deadline) => {
                    if self.available.wait_until(&mut elements, deadline).timed_out()
                        && elements.is_empty()
                    {
                        drop(elements);
                        self.metrics.record_failure(start);
                        return Err(crate::Error::Timeout);
                    }
                }
                // Deadline overflowed `Instant`; wait as if unbounded.
                None => self.available.wait(&mut elements),
            }
        }
    }
}

impl<T: Clone> ConcurrentQueue<T> {
    /// Return a clone of the head element without removing it
    ///
    /// Never blocks; returns `None` if the queue is empty.
    pub fn peek(&self) -> Option<T> {
        let start = self.metrics.start();
        let element = self.elements.lock().front().cloned();
        self.record_poll(start, element.is_some());
        element
    }

    /// Return a clone of the head element, parking until one is available
    ///
    /// The element stays queued. Like [`dequeue_wait`](Self::dequeue_wait) this has
    /// no timeout; see [`peek_timeout`](Self::peek_timeout).
    pub fn peek_wait(&self) -> T {
        let start = self.metrics.start();
        let mut elements = self.elements.lock();
        let mut parked = false;
        let element = loop {
            if let Some(element) = elements.front() {
                break element.clone();
            }
            if !parked {
                self.metrics.record_contention();
                parked = true;
            }
            self.available.wait(&mut elements);
        };
        if parked {
            // We consumed an enqueue signal without consuming the element.
            self.available.notify_one();
        }
        drop(elements);
        self.metrics.record_success(start);
        element
    }

    /// Return a clone of the head element, parking for at most `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`](crate::Error::Timeout) if the queue stayed empty
    /// for the whole `timeout`.
    #[cfg(not(loom))]
    pub fn peek_timeout(&self, timeout: Duration) -> crate::Result<T> {
        let mut parked = false;
        let result = self.wait_for_head(timeout, |elements| {
            let head = elements.front().cloned();
            if head.is_none() {
                parked = true;
            }
            head
        });
        if result.is_ok() && parked {
            self.available.notify_one();
        }
        result
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ConcurrentQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_deque(iter.into_iter().collect())
    }
}

impl<T> fmt::Debug for ConcurrentQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentQueue")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> MetricsCollector for ConcurrentQueue<T> {
    fn metrics(&self) -> PerformanceMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn set_metrics_enabled(&self, enabled: bool) {
        self.metrics.set_enabled(enabled);
    }

    fn is_metrics_enabled(&self) -> bool {
        self.metrics.is_enabled()
    }
}
