//! Lock guards that survive poisoning.
//!
//! Everything guarded in this crate (resolved cascades, the event queue,
//! the in-memory adapters) is rebuildable from the stores, so a panic in
//! another holder never makes the protected state unrecoverable. These
//! helpers take the inner value out of a poisoned lock and log the
//! recovery instead of propagating the panic to every later caller.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

fn note_recovery(scope: &'static str, op: &'static str, access: &'static str) {
    warn!(
        scope,
        op,
        access,
        "Lock poisoned by an earlier panic; continuing with recovered state"
    );
}

pub(crate) fn rw_read<'a, T>(
    lock: &'a RwLock<T>,
    scope: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        note_recovery(scope, op, "read");
        poisoned.into_inner()
    })
}

pub(crate) fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    scope: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        note_recovery(scope, op, "write");
        poisoned.into_inner()
    })
}

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    scope: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        note_recovery(scope, op, "lock");
        poisoned.into_inner()
    })
}
