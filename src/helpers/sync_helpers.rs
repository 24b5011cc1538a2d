use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// Poisoning is ignored, critical sections guarded by these are a single assignment or clone.

pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    return mutex.lock().unwrap_or_else(PoisonError::into_inner);
}

pub fn read<T>(rw_lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    return rw_lock.read().unwrap_or_else(PoisonError::into_inner);
}

pub fn write<T>(rw_lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    return rw_lock.write().unwrap_or_else(PoisonError::into_inner);
}
