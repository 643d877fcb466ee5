//! Map implementations
//!
//! This module provides the lock-guarded concurrent map.
//!
//! ## Available Maps
//!
//! - [`ConcurrentMap`]: `HashMap` behind a reader/writer lock
//!
//! ## Locking
//!
//! | Operation | Lock |
//! |-----------|------|
//! | `len`, `is_empty`, `get`, `get_with`, `contains_key`, `for_each` | shared |
//! | `set`, `delete`, `clear` | exclusive |

pub mod concurrent;

pub use self::concurrent::ConcurrentMap;


#[cfg(all(test, not(loom)))]
mod proptests;
