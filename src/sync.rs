//! Lock primitives used by the containers.
//!
//! Normal builds use `parking_lot` directly. Under `--cfg loom` the same names
//! resolve to thin wrappers over loom's instrumented locks that expose the
//! `parking_lot` calling convention (guards returned directly, condvar waits
//! through `&mut guard`), so container code is written once. Model tests get
//! `Arc`, `spawn` and `wrap_test` from here too.

#[cfg(not(loom))]
mod not_loom {
    pub(crate) use parking_lot::{Condvar, Mutex, RwLock};
}

#[cfg(not(loom))]
pub(crate) use not_loom::*;

#[cfg(loom)]
mod with_loom {
    use core::ops::{Deref, DerefMut};
    use std::sync::PoisonError;

    #[cfg(test)]
    pub(crate) use loom::sync::Arc;
    #[cfg(test)]
    pub(crate) use loom::thread::spawn;

    pub(crate) struct Mutex<T>(loom::sync::Mutex<T>);

    // Vacated only while the owning thread is parked inside `Condvar::wait`.
    pub(crate) struct MutexGuard<'a, T>(Option<loom::sync::MutexGuard<'a, T>>);

    impl<T> Mutex<T> {
        pub(crate) fn new(value: T) -> Self {
            Self(loom::sync::Mutex::new(value))
        }

        pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
            MutexGuard(Some(
                self.0.lock().unwrap_or_else(PoisonError::into_inner),
            ))
        }
    }

    impl<T> Deref for MutexGuard<'_, T> {
        type Target = T;

        fn deref(&self) -> &T {
            match &self.0 {
                Some(guard) => &**guard,
                None => unreachable!("guard used while parked"),
            }
        }
    }

    impl<T> DerefMut for MutexGuard<'_, T> {
        fn deref_mut(&mut self) -> &mut T {
            match &mut self.0 {
                Some(guard) => &mut **guard,
                None => unreachable!("guard used while parked"),
            }
        }
    }

    pub(crate) struct Condvar(loom::sync::Condvar);

    impl Condvar {
        pub(crate) fn new() -> Self {
            Self(loom::sync::Condvar::new())
        }

        pub(crate) fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
            if let Some(inner) = guard.0.take() {
                guard.0 = Some(self.0.wait(inner).unwrap_or_else(PoisonError::into_inner));
            }
        }

        pub(crate) fn notify_one(&self) {
            self.0.notify_one();
        }
    }

    pub(crate) struct RwLock<T>(loom::sync::RwLock<T>);

    impl<T> RwLock<T> {
        pub(crate) fn new(value: T) -> Self {
            Self(loom::sync::RwLock::new(value))
        }

        pub(crate) fn read(&self) -> loom::sync::RwLockReadGuard<'_, T> {
            self.0.read().unwrap_or_else(PoisonError::into_inner)
        }

        pub(crate) fn write(&self) -> loom::sync::RwLockWriteGuard<'_, T> {
            self.0.write().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[cfg(test)]
    pub(crate) fn wrap_test(what: impl Fn() + Sync + Send + 'static) {
        loom::model(what)
    }
}

#[cfg(loom)]
pub(crate) use with_loom::*;
