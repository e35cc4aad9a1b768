//! Identity registry for ref-counted wrappers.
//!
//! Wrapping the same object for the same class twice must hand out the same
//! wrapper, so that struct pointers (and wrapper pointers) compare equal
//! whenever the underlying object is the same. Entries are keyed by the
//! class tag plus the underlying identity: the object's data pointer for
//! `cpptoc` wrappers, the foreign struct pointer for `ctocpp` wrappers.
//!
//! Lookup-and-reuse and removal race against each other, so both happen
//! under one lock. A wrap holds the guard from [`lock`] across the lookup,
//! the [`RefCount::try_add_ref`] revival attempt, and any replacement
//! insert; a dying wrapper calls [`remove`] before its record is freed.
//! `try_add_ref` refuses once the count has hit zero, so the only wrapper a
//! lookup can ever revive is one whose record is guaranteed to stay
//! allocated at least until the guard is released.
//!
//! Scoped wrappers are exempt: ownership transfer means the same object is
//! never legitimately wrapped twice.
//!
//! [`RefCount::try_add_ref`]: crate::ref_count::RefCount::try_add_ref

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::wrapper_types::WrapperType;

pub(crate) type Key = (WrapperType, usize);

pub(crate) fn lock() -> MutexGuard<'static, HashMap<Key, usize>> {
    static MAP: OnceLock<Mutex<HashMap<Key, usize>>> = OnceLock::new();
    MAP.get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Removes `wrapper`'s entry. Conditional on the address still matching: a
/// replacement wrapper built while this one was mid-destruction owns the key
/// now and must not lose its entry.
pub(crate) fn remove(key: Key, wrapper: usize) {
    let mut map = lock();
    if map.get(&key) == Some(&wrapper) {
        map.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_keyed_by_class_and_identity() {
        // Identities here are synthetic; real callers use stable heap
        // addresses that live as long as the entry.
        let mut map = lock();
        map.insert((WrapperType::TestPadded, 0x1000), 0xaaaa);
        assert_eq!(map.get(&(WrapperType::TestPadded, 0x1000)), Some(&0xaaaa));
        assert_eq!(map.get(&(WrapperType::TestPadded, 0x2000)), None);
        assert_eq!(map.get(&(WrapperType::App, 0x1000)), None);
        map.remove(&(WrapperType::TestPadded, 0x1000));
        assert_eq!(map.get(&(WrapperType::TestPadded, 0x1000)), None);
    }

    #[test]
    fn removal_spares_a_replacement_entry() {
        lock().insert((WrapperType::TestPadded, 0x3000), 0xbbbb);

        // A stale wrapper going away must not evict its successor.
        remove((WrapperType::TestPadded, 0x3000), 0xcccc);
        assert_eq!(
            lock().get(&(WrapperType::TestPadded, 0x3000)),
            Some(&0xbbbb)
        );

        remove((WrapperType::TestPadded, 0x3000), 0xbbbb);
        assert_eq!(lock().get(&(WrapperType::TestPadded, 0x3000)), None);
    }
}
