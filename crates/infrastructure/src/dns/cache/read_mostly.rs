//! Read-mostly concurrent map.
//!
//! Reads of keys present in the published snapshot are lock-free. New keys
//! are staged in a mutex-protected overlay ("dirty") that is promoted to the
//! snapshot once enough lookups have missed it. Each key owns an [`Entry`]
//! whose slot is swapped atomically, so updates of known keys never take the
//! lock either.
//!
//! An entry slot is in one of three states:
//! - `Value(v)`: present.
//! - `Deleted`: absent, but still writable in place.
//! - `Expunged`: absent and absent from the overlay. Writers must go through
//!   the lock and re-register the entry before storing into it.

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

enum Slot<V> {
    Value(V),
    Deleted,
    Expunged,
}

impl<V: Clone> Slot<V> {
    fn value(&self) -> Option<V> {
        match self {
            Slot::Value(v) => Some(v.clone()),
            Slot::Deleted | Slot::Expunged => None,
        }
    }
}

struct Entry<V> {
    slot: ArcSwap<Slot<V>>,
}

impl<V: Clone> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            slot: ArcSwap::from_pointee(Slot::Value(value)),
        }
    }

    fn load(&self) -> Option<V> {
        self.slot.load().value()
    }

    /// Replaces `current` with `new` if the slot still holds exactly
    /// `current`. Identity is the loaded `Arc`, never the value.
    fn cas(&self, current: &Arc<Slot<V>>, new: Slot<V>) -> bool {
        let prev = self.slot.compare_and_swap(current, Arc::new(new));
        Arc::ptr_eq(&*prev, current)
    }

    /// Stores `value` unless the entry is expunged.
    fn try_swap(&self, value: &V) -> Result<Option<V>, ()> {
        loop {
            let current = self.slot.load_full();
            if matches!(*current, Slot::Expunged) {
                return Err(());
            }
            if self.cas(&current, Slot::Value(value.clone())) {
                return Ok(current.value());
            }
        }
    }

    /// Must be called with the overlay lock held. Returns true if the entry
    /// was expunged, in which case the caller re-registers it in the overlay.
    fn unexpunge_locked(&self) -> bool {
        loop {
            let current = self.slot.load_full();
            if !matches!(*current, Slot::Expunged) {
                return false;
            }
            if self.cas(&current, Slot::Deleted) {
                return true;
            }
        }
    }

    /// Must be called with the overlay lock held, on a non-expunged entry.
    fn swap_locked(&self, value: V) -> Option<V> {
        self.slot.swap(Arc::new(Slot::Value(value))).value()
    }

    fn delete(&self) -> Option<V> {
        loop {
            let current = self.slot.load_full();
            match *current {
                Slot::Value(_) => {
                    if self.cas(&current, Slot::Deleted) {
                        return current.value();
                    }
                }
                Slot::Deleted | Slot::Expunged => return None,
            }
        }
    }

    /// Marks a deleted entry expunged. Returns whether the entry ends up
    /// expunged.
    fn try_expunge_locked(&self) -> bool {
        loop {
            let current = self.slot.load_full();
            match *current {
                Slot::Value(_) => return false,
                Slot::Expunged => return true,
                Slot::Deleted => {
                    if self.cas(&current, Slot::Expunged) {
                        return true;
                    }
                }
            }
        }
    }
}

impl<V: Clone + PartialEq> Entry<V> {
    fn try_compare_and_swap(&self, old: &V, new: &V) -> bool {
        loop {
            let current = self.slot.load_full();
            match &*current {
                Slot::Value(v) if v == old => {
                    if self.cas(&current, Slot::Value(new.clone())) {
                        return true;
                    }
                }
                _ => return false,
            }
        }
    }
}

type EntryMap<K, V> = FxHashMap<K, Arc<Entry<V>>>;

/// Published snapshot. Never mutated after publication.
struct ReadOnly<K, V> {
    m: Arc<EntryMap<K, V>>,
    /// True when the overlay holds keys missing from `m`.
    amended: bool,
}

struct Dirty<K, V> {
    map: Option<EntryMap<K, V>>,
    misses: usize,
}

/// Concurrent map optimised for keys that are written once and read many
/// times, or for disjoint key sets per writer.
pub struct ReadMostlyMap<K, V> {
    read: ArcSwap<ReadOnly<K, V>>,
    dirty: Mutex<Dirty<K, V>>,
}

impl<K, V> Default for ReadMostlyMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ReadMostlyMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            read: ArcSwap::from_pointee(ReadOnly {
                m: Arc::new(FxHashMap::default()),
                amended: false,
            }),
            dirty: Mutex::new(Dirty {
                map: None,
                misses: 0,
            }),
        }
    }

    fn lock_dirty(&self) -> MutexGuard<'_, Dirty<K, V>> {
        self.dirty.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Looks `key` up in the snapshot, falling back to the overlay under the
    /// lock. `remove` drops the key from the overlay on the fallback path.
    fn find_entry(&self, key: &K, remove: bool) -> Option<Arc<Entry<V>>> {
        let read = self.read.load_full();
        if let Some(e) = read.m.get(key) {
            return Some(Arc::clone(e));
        }
        if !read.amended {
            return None;
        }

        let mut dirty = self.lock_dirty();
        let read = self.read.load_full();
        if let Some(e) = read.m.get(key) {
            return Some(Arc::clone(e));
        }
        if !read.amended {
            return None;
        }
        let entry = match dirty.map.as_mut() {
            Some(m) if remove => m.remove(key),
            Some(m) => m.get(key).cloned(),
            None => None,
        };
        // Counted whether or not the overlay had it: the snapshot missed.
        self.miss_locked(&mut dirty);
        entry
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.find_entry(key, false)?.load()
    }

    /// Inserts or replaces the value for `key`, returning the previous one.
    pub fn add(&self, key: K, value: V) -> Option<V> {
        {
            let read = self.read.load();
            if let Some(e) = read.m.get(&key) {
                if let Ok(previous) = e.try_swap(&value) {
                    return previous;
                }
            }
        }

        let mut dirty = self.lock_dirty();
        let read = self.read.load_full();

        if let Some(e) = read.m.get(&key) {
            if e.unexpunge_locked() {
                // Expunged entries exist only while an overlay exists.
                if let Some(m) = dirty.map.as_mut() {
                    m.insert(key, Arc::clone(e));
                }
            }
            return e.swap_locked(value);
        }

        if let Some(e) = dirty.map.as_ref().and_then(|m| m.get(&key)) {
            return e.swap_locked(value);
        }

        if !read.amended {
            self.dirty_locked(&mut dirty, &read);
            self.read.store(Arc::new(ReadOnly {
                m: Arc::clone(&read.m),
                amended: true,
            }));
        }
        dirty
            .map
            .get_or_insert_with(FxHashMap::default)
            .insert(key, Arc::new(Entry::new(value)));
        None
    }

    /// Removes `key`, returning the previous value if it was present.
    pub fn del(&self, key: &K) -> Option<V> {
        self.find_entry(key, true)?.delete()
    }

    /// Replaces the value for `key` with `new` only if it currently equals
    /// `old`.
    pub fn compare_and_swap(&self, key: &K, old: &V, new: V) -> bool
    where
        V: PartialEq,
    {
        {
            let read = self.read.load();
            if let Some(e) = read.m.get(key) {
                return e.try_compare_and_swap(old, &new);
            }
            if !read.amended {
                return false;
            }
        }

        let mut dirty = self.lock_dirty();
        let read = self.read.load_full();
        if let Some(e) = read.m.get(key) {
            return e.try_compare_and_swap(old, &new);
        }
        let entry = dirty.map.as_ref().and_then(|m| m.get(key).cloned());
        match entry {
            Some(e) => {
                let swapped = e.try_compare_and_swap(old, &new);
                self.miss_locked(&mut dirty);
                swapped
            }
            None => false,
        }
    }

    /// Calls `f` for every present key/value until it returns false.
    ///
    /// The overlay is promoted first so the walk covers a single snapshot.
    /// Keys written during the walk may or may not be visited.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut read = self.read.load_full();
        if read.amended {
            let mut dirty = self.lock_dirty();
            read = self.read.load_full();
            if read.amended {
                if let Some(m) = dirty.map.take() {
                    let promoted = Arc::new(ReadOnly {
                        m: Arc::new(m),
                        amended: false,
                    });
                    self.read.store(Arc::clone(&promoted));
                    read = promoted;
                }
                dirty.misses = 0;
            }
        }

        for (k, e) in read.m.iter() {
            if let Some(v) = e.load() {
                if !f(k, &v) {
                    break;
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        let mut n = 0;
        self.range(|_, _| {
            n += 1;
            true
        });
        n
    }

    pub fn is_empty(&self) -> bool {
        let mut empty = true;
        self.range(|_, _| {
            empty = false;
            false
        });
        empty
    }

    fn miss_locked(&self, dirty: &mut Dirty<K, V>) {
        dirty.misses += 1;
        let overlay_len = dirty.map.as_ref().map_or(0, |m| m.len());
        if dirty.misses < overlay_len {
            return;
        }
        if let Some(m) = dirty.map.take() {
            self.read.store(Arc::new(ReadOnly {
                m: Arc::new(m),
                amended: false,
            }));
        }
        dirty.misses = 0;
    }

    /// Rebuilds the overlay from the snapshot, expunging deleted entries.
    fn dirty_locked(&self, dirty: &mut Dirty<K, V>, read: &ReadOnly<K, V>) {
        if dirty.map.is_some() {
            return;
        }
        let mut m = FxHashMap::with_capacity_and_hasher(read.m.len(), Default::default());
        for (k, e) in read.m.iter() {
            if !e.try_expunge_locked() {
                m.insert(k.clone(), Arc::clone(e));
            }
        }
        dirty.map = Some(m);
    }

    #[cfg(test)]
    fn snapshot_state(&self) -> (usize, bool, Option<usize>) {
        let read = self.read.load();
        let dirty = self.lock_dirty();
        (read.m.len(), read.amended, dirty.map.as_ref().map(|m| m.len()))
    }
}
