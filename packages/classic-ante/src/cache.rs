use std::collections::BTreeMap;
use std::ops::Bound;

use cosmwasm_std::{Order, Record, Storage};

/// Copy-on-write view over a base store. Reads fall through to the base
/// unless the key was written here; writes stay buffered until the caller
/// commits them with [`StorageWrites::apply`].
pub struct CacheStorage<'a> {
    base: &'a dyn Storage,
    // `None` marks a deletion
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStorage<'a> {
    pub fn new(base: &'a dyn Storage) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.writes.is_empty()
    }

    /// Releases the base store and hands back the buffered writes.
    pub fn into_writes(self) -> StorageWrites {
        StorageWrites(self.writes)
    }
}

impl Storage for CacheStorage<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(value) => value.clone(),
            None => self.base.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Box::new(std::iter::empty());
            }
        }

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.range(start, end, Order::Ascending).collect();

        let lower = start.map_or(Bound::Unbounded, |key| Bound::Included(key.to_vec()));
        let upper = end.map_or(Bound::Unbounded, |key| Bound::Excluded(key.to_vec()));
        for (key, value) in self.writes.range((lower, upper)) {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                },
                None => {
                    merged.remove(key);
                },
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

/// Writes buffered by a [`CacheStorage`], in key order.
#[derive(Debug, Default, PartialEq)]
pub struct StorageWrites(BTreeMap<Vec<u8>, Option<Vec<u8>>>);

impl StorageWrites {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn apply(self, storage: &mut dyn Storage) {
        for (key, value) in self.0 {
            match value {
                Some(value) => storage.set(&key, &value),
                None => storage.remove(&key),
            }
        }
    }
}
