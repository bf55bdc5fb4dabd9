// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Pistonite

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex as StdMutex, MutexGuard as StdMutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::{Error, Result};

/// Process-wide mutual exclusion with separate lock and unlock calls.
///
/// Unlike [`std::sync::Mutex`], ownership is not tied to a guard, so the
/// lock can be taken and released across an FFI boundary. Use
/// [`Mutex::guard`] for scoped locking from Rust.
#[derive(Debug, Default)]
pub struct Mutex {
    owner: StdMutex<Option<ThreadId>>,
    released: Condvar,
}

impl Mutex {
    /// Create a new, unlocked mutex
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the calling thread owns the mutex.
    ///
    /// Locking a mutex the calling thread already owns is an error, since
    /// the mutex is not reentrant.
    pub fn lock(&self) -> Result<()> {
        let me = thread::current().id();
        let mut owner = self.state();
        if *owner == Some(me) {
            return Err(Error::misuse("mutex is already locked by this thread"));
        }
        while owner.is_some() {
            owner = self
                .released
                .wait(owner)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *owner = Some(me);
        Ok(())
    }

    /// Release the mutex held by the calling thread
    pub fn unlock(&self) -> Result<()> {
        let me = thread::current().id();
        let mut owner = self.state();
        match *owner {
            None => return Err(Error::misuse("unlocking a mutex that is not locked")),
            Some(id) if id != me => {
                return Err(Error::misuse(
                    "unlocking a mutex that is locked by another thread",
                ));
            }
            Some(_) => {}
        }
        *owner = None;
        drop(owner);
        self.released.notify_one();
        Ok(())
    }

    /// Lock and return a guard that unlocks on drop
    pub fn guard(&self) -> Result<MutexGuard<'_>> {
        self.lock()?;
        Ok(MutexGuard {
            mutex: self,
            _not_send: PhantomData,
        })
    }

    /// Check if any thread currently owns the mutex
    pub fn is_locked(&self) -> bool {
        self.state().is_some()
    }

    /// Release the mutex and all its resources
    pub fn destroy(self) {
        if let Some(owner) = *self.state() {
            cu::warn!("destroying a mutex that is still locked by thread {owner:?}");
        }
    }

    fn state(&self) -> StdMutexGuard<'_, Option<ThreadId>> {
        // the critical sections above never panic, poisoning carries no meaning
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped ownership of a [`Mutex`], released when dropped.
///
/// The guard must be dropped on the thread that locked the mutex, so it
/// cannot be sent to another thread:
///
/// ```compile_fail
/// let mutex = xpal::Mutex::new();
/// let guard = mutex.guard().unwrap();
/// std::thread::scope(|s| {
///     s.spawn(move || drop(guard));
/// });
/// ```
#[must_use = "the mutex is unlocked immediately if the guard is not held"]
#[derive(Debug)]
pub struct MutexGuard<'a> {
    mutex: &'a Mutex,
    _not_send: PhantomData<*const ()>,
}

impl Drop for MutexGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.mutex.unlock() {
            cu::error!("failed to release mutex guard: {e}");
        }
    }
}
