//! PtrDict: identity-keyed open-addressing table.
//!
//! Keys are pointer handles compared by address; the cell index comes
//! straight from the address bits. The table never frees a pointee it
//! does not own through `P`: with reference or raw-pointer keys, removal
//! and clear only forget the key. `remove` hands the key back to the caller.
//!
//! Handles to zero-sized values need not have distinct addresses: a
//! `Box<()>` never allocates, so all of them land on one key.

use crate::cell_table::CellTable;
use crate::error::ContainerError;
use crate::pointer::Pointer;
use core::fmt;

#[inline]
fn hash_addr<T>(ptr: *const T) -> u64 {
    ptr as usize as u64
}

pub struct PtrDict<P, V> {
    table: CellTable<P, V>,
}

impl<P: Pointer, V> PtrDict<P, V> {
    pub fn new() -> Result<Self, ContainerError> {
        Ok(Self {
            table: CellTable::new()?,
        })
    }

    pub fn with_capacity(cells: usize) -> Result<Self, ContainerError> {
        Ok(Self {
            table: CellTable::with_cell_capacity(cells)?,
        })
    }

    /// Maps `key` to `value`, returning the value it replaces. When the
    /// address is already present the stored key handle is kept and `key`
    /// is dropped.
    pub fn set(&mut self, key: P, value: V) -> Result<Option<V>, ContainerError> {
        let target = key.as_ptr();
        self.table
            .insert_with(hash_addr(target), |k| k.as_ptr() == target, || Ok(key), value)
    }

    pub fn get(&self, key: *const P::Target) -> Option<&V> {
        self.table.get(hash_addr(key), |k| k.as_ptr() == key)
    }

    pub fn get_mut(&mut self, key: *const P::Target) -> Option<&mut V> {
        self.table.get_mut(hash_addr(key), |k| k.as_ptr() == key)
    }

    pub fn contains_key(&self, key: *const P::Target) -> bool {
        self.table.find(hash_addr(key), |k| k.as_ptr() == key).is_some()
    }

    pub fn get_value_at(&self, ix: usize) -> Option<&V> {
        self.table.value_at(ix)
    }

    pub fn get_key_at(&self, ix: usize) -> Option<&P> {
        self.table.key_at(ix)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.item_capacity()
    }

    /// Removes the entry for `key`, returning the stored key handle and value.
    pub fn remove(&mut self, key: *const P::Target) -> Option<(P, V)> {
        self.table.remove(hash_addr(key), |k| k.as_ptr() == key)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&P, &V)> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&P, &mut V)> {
        self.table.iter_mut()
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &CellTable<P, V> {
        &self.table
    }
}

impl<P: Pointer, V: fmt::Debug> fmt::Debug for PtrDict<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (k.as_ptr(), v)))
            .finish()
    }
}
