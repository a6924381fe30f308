//! Dict: string-keyed open-addressing table.
//!
//! Keys are hashed with djb2 and owned by the table as `Box<str>`; they are
//! copied on first insertion (or adopted via [`Dict::set_owned`]) and freed on
//! removal, clear, and drop. Values are stored as given: a reference type
//! for `V` keeps the table from owning them.

use crate::cell_table::CellTable;
use crate::error::ContainerError;
use core::fmt;
use core::mem;

/// djb2 over the UTF-8 bytes of `key`, with wrapping arithmetic.
pub fn hash_str(key: &str) -> u64 {
    key.bytes().fold(5381u64, |hash, byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte))
    })
}

fn copy_key(key: &str) -> Result<Box<str>, ContainerError> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(key.len())
        .map_err(|_| ContainerError::AllocationFailed { bytes: key.len() })?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}

pub struct Dict<V> {
    table: CellTable<Box<str>, V>,
}

impl<V> Dict<V> {
    pub fn new() -> Result<Self, ContainerError> {
        Ok(Self {
            table: CellTable::new()?,
        })
    }

    /// Dict with at least `cells` index cells (rounded up to a power of
    /// two); it holds 7/10 of that many keys before growing.
    pub fn with_capacity(cells: usize) -> Result<Self, ContainerError> {
        Ok(Self {
            table: CellTable::with_cell_capacity(cells)?,
        })
    }

    /// Maps `key` to `value`, returning the value it replaces. The key is
    /// copied only when it is new.
    pub fn set(&mut self, key: &str, value: V) -> Result<Option<V>, ContainerError> {
        self.table
            .insert_with(hash_str(key), |k| **k == *key, || copy_key(key), value)
    }

    /// Like [`Dict::set`] but adopts `key` instead of copying it.
    pub fn set_owned(&mut self, key: String, value: V) -> Result<Option<V>, ContainerError> {
        let hash = hash_str(&key);
        if let Some(slot) = self.table.get_mut(hash, |k| **k == *key) {
            return Ok(Some(mem::replace(slot, value)));
        }
        self.table
            .insert_with(hash, |_| false, || Ok(key.into_boxed_str()), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.table.get(hash_str(key), |k| **k == *key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.table.get_mut(hash_str(key), |k| **k == *key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table.find(hash_str(key), |k| **k == *key).is_some()
    }

    /// Value of the item at dense position `ix`.
    pub fn get_value_at(&self, ix: usize) -> Option<&V> {
        self.table.value_at(ix)
    }

    /// Key of the item at dense position `ix`.
    pub fn get_key_at(&self, ix: usize) -> Option<&str> {
        self.table.key_at(ix).map(|k| &**k)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of keys the dict holds before it must grow.
    pub fn capacity(&self) -> usize {
        self.table.item_capacity()
    }

    /// Removes `key`, freeing its copy, and returns the value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.table
            .remove(hash_str(key), |k| **k == *key)
            .map(|(_key, value)| value)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Items in dense order. Removal moves the last item into the hole, so
    /// order is only stable between removals.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.table.iter().map(|(k, v)| (&**k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.table.iter_mut().map(|(k, v)| (&**k, v))
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &CellTable<Box<str>, V> {
        &self.table
    }
}

impl<V: fmt::Debug> fmt::Debug for Dict<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
