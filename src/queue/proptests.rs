//! Property-based tests for the blocking queue using proptest
//!
//! These tests verify that the queue keeps FIFO order and an exact element count
//! under arbitrary operation sequences and concurrent producers/consumers.

use super::ConcurrentQueue;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

/// Property: FIFO ordering and size bookkeeping on a single thread
mod sequential_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_fifo_ordering_single_thread(
            values in prop::collection::vec(any::<i32>(), 0..100)
        ) {
            let queue: ConcurrentQueue<i32> = ConcurrentQueue::new();

            for &value in &values {
                queue.enqueue(value);
            }
            prop_assert_eq!(queue.len(), values.len());

            for &expected in &values {
                prop_assert_eq!(queue.dequeue(), Some(expected));
            }

            prop_assert_eq!(queue.dequeue(), None);
            prop_assert!(queue.is_empty());
        }

        #[test]
        fn test_len_invariant(
            operations in prop::collection::vec(
                prop::bool::weighted(0.6), // 60% enqueue, 40% dequeue
                1..300
            )
        ) {
            let queue: ConcurrentQueue<u32> = ConcurrentQueue::new();
            let mut model = VecDeque::new();
            let mut counter = 0;

            for &should_enqueue in &operations {
                if should_enqueue {
                    queue.enqueue(counter);
                    model.push_back(counter);
                    counter += 1;
                } else {
                    prop_assert_eq!(queue.dequeue(), model.pop_front());
                }

                prop_assert_eq!(queue.len(), model.len());
                prop_assert_eq!(queue.is_empty(), model.is_empty());
            }
        }

        #[test]
        fn test_peek_matches_next_dequeue(
            values in prop::collection::vec(any::<u64>(), 1..50)
        ) {
            let queue: ConcurrentQueue<u64> = values.iter().copied().collect();

            while !queue.is_empty() {
                let size = queue.len();
                let peeked = queue.peek();
                prop_assert_eq!(queue.len(), size);
                prop_assert_eq!(peeked, queue.dequeue());
            }

            prop_assert_eq!(queue.peek(), None);
        }

        #[test]
        fn test_batches_preserve_order(
            values in prop::collection::vec(any::<i16>(), 0..100),
            batch in 1usize..20
        ) {
            let queue: ConcurrentQueue<i16> = ConcurrentQueue::new();
            prop_assert_eq!(queue.enqueue_batch(values.iter().copied()), values.len());

            let mut drained = Vec::new();
            loop {
                let chunk = queue.dequeue_batch(batch);
                prop_assert!(chunk.len() <= batch);
                if chunk.is_empty() {
                    break;
                }
                drained.extend(chunk);
            }

            prop_assert_eq!(drained, values);
        }
    }
}

/// Property: no element is lost or duplicated across threads
mod concurrent_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_concurrent_multiset_preserved(
            num_threads in 1usize..5,
            operations_per_thread in 1usize..300
        ) {
            let queue = Arc::new(ConcurrentQueue::new());
            let mut handles = Vec::new();

            for thread_id in 0..num_threads {
                let queue = Arc::clone(&queue);
                handles.push(thread::spawn(move || {
                    for i in 0..operations_per_thread {
                        queue.enqueue(thread_id * operations_per_thread + i);
                    }
                    Vec::new()
                }));
            }

            for _ in 0..num_threads {
                let queue = Arc::clone(&queue);
                handles.push(thread::spawn(move || {
                    (0..operations_per_thread)
                        .map(|_| queue.dequeue_wait())
                        .collect::<Vec<_>>()
                }));
            }

            let mut all_received = Vec::new();
            for handle in handles {
                all_received.extend(handle.join().unwrap());
            }

            let expected_total = num_threads * operations_per_thread;
            prop_assert_eq!(all_received.len(), expected_total);

            all_received.sort_unstable();
            prop_assert_eq!(all_received, (0..expected_total).collect::<Vec<_>>());
            prop_assert!(queue.is_empty());
        }
    }
}
