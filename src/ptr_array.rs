//! PtrArray: an `Array` of pointer handles with stack operations.

use crate::array::Array;
use crate::error::ContainerError;
use crate::pointer::Pointer;
use core::fmt;

/// Array of pointer handles. The array owns the slots; whether it owns the
/// pointees depends on `P` (see [`Pointer`]).
pub struct PtrArray<P> {
    arr: Array<P>,
}

impl<P: Pointer> PtrArray<P> {
    pub const fn new() -> Self {
        Self { arr: Array::new() }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        Ok(Self {
            arr: Array::with_capacity(capacity)?,
        })
    }

    pub fn add(&mut self, ptr: P) -> Result<(), ContainerError> {
        self.arr.add(ptr)
    }

    pub fn push(&mut self, ptr: P) -> Result<(), ContainerError> {
        self.arr.add(ptr)
    }

    pub fn pop(&mut self) -> Option<P> {
        self.arr.pop()
    }

    pub fn top(&self) -> Option<&P> {
        self.arr.last()
    }

    /// Appends clones of `ptrs`; see [`Array::addn`].
    pub fn addn(&mut self, ptrs: &[P]) -> Result<(), ContainerError>
    where
        P: Clone,
    {
        self.arr.addn(ptrs)
    }

    pub fn add_array(&mut self, source: &PtrArray<P>) -> Result<(), ContainerError>
    where
        P: Clone,
    {
        self.arr.add_array(&source.arr)
    }

    /// Replaces the handle at `ix`, returning the previous one. The old
    /// handle is handed back, never released here.
    pub fn set(&mut self, ix: usize, ptr: P) -> Result<P, ContainerError> {
        self.arr.set(ix, ptr)
    }

    pub fn get(&self, ix: usize) -> Result<&P, ContainerError> {
        self.arr.get(ix)
    }

    pub fn get_mut(&mut self, ix: usize) -> Result<&mut P, ContainerError> {
        self.arr.get_mut(ix)
    }

    /// Index of the slot at `slot`, which must point into this array's
    /// storage. Use [`PtrArray::index_of`] to search by pointee.
    pub fn get_index(&self, slot: *const P) -> Option<usize> {
        self.arr.get_index(slot)
    }

    pub fn len(&self) -> usize {
        self.arr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arr.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.arr.capacity()
    }

    pub fn remove(&mut self, ix: usize) -> Result<P, ContainerError> {
        self.arr.remove(ix)
    }

    pub fn clear(&mut self) {
        self.arr.clear();
    }

    pub fn lock_capacity(&mut self) {
        self.arr.lock_capacity();
    }

    /// Index of the first handle pointing at `item`.
    pub fn index_of(&self, item: *const P::Target) -> Option<usize> {
        self.arr.iter().position(|p| p.as_ptr() == item)
    }

    /// Removes the first handle pointing at `item`, preserving order.
    pub fn remove_item(&mut self, item: *const P::Target) -> Result<P, ContainerError> {
        let ix = self.index_of(item).ok_or(ContainerError::ItemNotFound)?;
        self.arr.remove(ix)
    }

    pub fn reverse(&mut self) {
        self.arr.as_mut_slice().reverse();
    }

    pub fn iter(&self) -> core::slice::Iter<'_, P> {
        self.arr.iter()
    }

    pub fn as_slice(&self) -> &[P] {
        self.arr.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [P] {
        self.arr.as_mut_slice()
    }

    pub fn orphan_data(&mut self) -> Vec<P> {
        self.arr.orphan_data()
    }

    /// Passes every handle, in index order, to `destructor` and then frees
    /// the array itself.
    pub fn destroy_with_items<F>(mut self, destructor: F)
    where
        F: FnMut(P),
    {
        self.arr.orphan_data().into_iter().for_each(destructor);
    }
}

impl<P: Pointer> Default for PtrArray<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug> fmt::Debug for PtrArray<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.arr, f)
    }
}
