//! Array: growable contiguous storage over a raw allocation.
//!
//! Elements live packed in `[0, len)` of a buffer obtained directly from the
//! global allocator. Capacity doubles when full, and an array can be
//! capacity-locked so the buffer address never changes. All index-taking
//! operations are bounds-checked in every build profile.

use crate::error::ContainerError;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};
use std::alloc::{self, Layout};

pub struct Array<T> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    locked: bool,
    _owns: PhantomData<T>,
}

impl<T> Array<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Empty array with capacity 0. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: 0,
            locked: false,
            _owns: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        let ptr = Self::allocate(capacity)?;
        Ok(Self {
            ptr,
            len: 0,
            cap: capacity,
            locked: false,
            _owns: PhantomData,
        })
    }

    /// Array of `count` clones of `value`, allocated at exactly `count`.
    pub fn filled(count: usize, value: T) -> Result<Self, ContainerError>
    where
        T: Clone,
    {
        let mut arr = Self::with_capacity(count)?;
        for _ in 0..count {
            arr.push_unchecked(value.clone());
        }
        Ok(arr)
    }

    fn layout_for(capacity: usize) -> Result<Layout, ContainerError> {
        Layout::array::<T>(capacity).map_err(|_| ContainerError::CapacityOverflow)
    }

    fn allocate(capacity: usize) -> Result<NonNull<T>, ContainerError> {
        if Self::IS_ZST || capacity == 0 {
            return Ok(NonNull::dangling());
        }
        let layout = Self::layout_for(capacity)?;
        // SAFETY: layout has a non-zero size because T is sized and capacity > 0.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(ContainerError::AllocationFailed {
            bytes: layout.size(),
        })
    }

    /// Returns the buffer to the allocator without touching the elements.
    fn release(&mut self) {
        if Self::IS_ZST || self.cap == 0 {
            return;
        }
        if let Ok(layout) = Self::layout_for(self.cap) {
            // SAFETY: ptr was allocated by `allocate` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        }
    }

    /// Ensures room for `required` elements, doubling from the current
    /// capacity (or from 1 when empty) until it fits.
    fn grow_to(&mut self, required: usize) -> Result<(), ContainerError> {
        if required <= self.cap {
            return Ok(());
        }
        if self.locked {
            return Err(ContainerError::CapacityLocked { capacity: self.cap });
        }
        let mut new_cap = if self.cap == 0 { 1 } else { self.cap };
        while new_cap < required {
            new_cap = new_cap
                .checked_mul(2)
                .ok_or(ContainerError::CapacityOverflow)?;
        }
        let new_ptr = Self::allocate(new_cap)?;
        // SAFETY: both buffers hold at least `len` slots and do not overlap.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len) };
        self.release();
        trace!("array regrow {} -> {} elements", self.cap, new_cap);
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Writes `value` into the slot at `len`. Caller guarantees `len < cap`.
    fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.cap || Self::IS_ZST);
        // SAFETY: slot `len` is inside the allocation and uninitialized.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    fn check_index(&self, ix: usize) -> Result<(), ContainerError> {
        if ix >= self.len {
            return Err(ContainerError::IndexOutOfBounds {
                index: ix,
                len: self.len,
            });
        }
        Ok(())
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), ContainerError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(ContainerError::CapacityOverflow)?;
        self.grow_to(required)
    }

    pub fn add(&mut self, value: T) -> Result<(), ContainerError> {
        self.reserve(1)?;
        self.push_unchecked(value);
        Ok(())
    }

    /// Appends clones of `values`. Fails without appending anything when the
    /// capacity cannot be reserved.
    pub fn addn(&mut self, values: &[T]) -> Result<(), ContainerError>
    where
        T: Clone,
    {
        self.reserve(values.len())?;
        for v in values {
            self.push_unchecked(v.clone());
        }
        Ok(())
    }

    pub fn add_array(&mut self, source: &Array<T>) -> Result<(), ContainerError>
    where
        T: Clone,
    {
        self.addn(source.as_slice())
    }

    /// Moves every element of `other` to the end of `self`, leaving `other`
    /// empty with its capacity intact.
    pub fn append(&mut self, other: &mut Array<T>) -> Result<(), ContainerError> {
        self.reserve(other.len)?;
        // SAFETY: room for `other.len` more elements was just reserved; the
        // moved-from slots are forgotten by zeroing `other.len`.
        unsafe {
            ptr::copy_nonoverlapping(
                other.ptr.as_ptr(),
                self.ptr.as_ptr().add(self.len),
                other.len,
            )
        };
        self.len += other.len;
        other.len = 0;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was initialized and is now outside the live range.
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Replaces the element at `ix`, returning the previous one.
    pub fn set(&mut self, ix: usize, value: T) -> Result<T, ContainerError> {
        let slot = self.get_mut(ix)?;
        Ok(mem::replace(slot, value))
    }

    /// Overwrites from `ix` onward; values past the end are appended.
    /// `ix` may equal `len` but not exceed it.
    pub fn setn(&mut self, ix: usize, values: &[T]) -> Result<(), ContainerError>
    where
        T: Clone,
    {
        if ix > self.len {
            return Err(ContainerError::IndexOutOfBounds {
                index: ix,
                len: self.len,
            });
        }
        let overlap = (self.len - ix).min(values.len());
        self.reserve(values.len() - overlap)?;
        let (head, tail) = values.split_at(overlap);
        self.as_mut_slice()[ix..ix + overlap].clone_from_slice(head);
        for v in tail {
            self.push_unchecked(v.clone());
        }
        Ok(())
    }

    pub fn get(&self, ix: usize) -> Result<&T, ContainerError> {
        self.check_index(ix)?;
        Ok(&self.as_slice()[ix])
    }

    pub fn get_mut(&mut self, ix: usize) -> Result<&mut T, ContainerError> {
        self.check_index(ix)?;
        Ok(&mut self.as_mut_slice()[ix])
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Removes the element at `ix`, shifting the tail left by one slot.
    pub fn remove(&mut self, ix: usize) -> Result<T, ContainerError> {
        self.check_index(ix)?;
        // SAFETY: ix < len; the tail move keeps `[0, len - 1)` initialized.
        unsafe {
            let base = self.ptr.as_ptr().add(ix);
            let removed = base.read();
            ptr::copy(base.add(1), base, self.len - ix - 1);
            self.len -= 1;
            Ok(removed)
        }
    }

    /// Removes the element at `ix` and moves the last element into its slot.
    pub fn swap_remove(&mut self, ix: usize) -> Result<T, ContainerError> {
        self.check_index(ix)?;
        let last = self.len - 1;
        self.as_mut_slice().swap(ix, last);
        self.len = last;
        // SAFETY: slot `last` holds the removed element and is no longer live.
        Ok(unsafe { self.ptr.as_ptr().add(last).read() })
    }

    /// Drops elements past `len`. No-op when already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail_len = self.len - len;
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: `[len, len + tail_len)` was initialized and is now unreachable.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(len), tail_len);
            ptr::drop_in_place(tail);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Forbids any further reallocation; growth attempts then fail with
    /// `CapacityLocked` and the buffer address stays stable.
    pub fn lock_capacity(&mut self) {
        self.locked = true;
    }

    pub fn is_capacity_locked(&self) -> bool {
        self.locked
    }

    /// Index of the element stored at `element`, if it points into the
    /// live range on an element boundary.
    pub fn get_index(&self, element: *const T) -> Option<usize> {
        if Self::IS_ZST {
            return None;
        }
        let base = self.ptr.as_ptr() as usize;
        let offset = (element as usize).checked_sub(base)?;
        let size = mem::size_of::<T>();
        if offset % size != 0 {
            return None;
        }
        let ix = offset / size;
        (ix < self.len).then_some(ix)
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialized; ptr is non-null and aligned.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, with exclusive access through `&mut self`.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Detaches the buffer and hands it to the caller. The array is left
    /// empty, unlocked, and at capacity 0.
    pub fn orphan_data(&mut self) -> Vec<T> {
        let detached = mem::replace(self, Self::new());
        let detached = mem::ManuallyDrop::new(detached);
        trace!(
            "array orphaned {} elements (capacity {})",
            detached.len,
            detached.cap
        );
        // SAFETY: the buffer came from the global allocator with
        // `Layout::array::<T>(cap)`, which is the layout `Vec<T>` uses, and
        // `[0, len)` is initialized. `detached` is never dropped.
        unsafe { Vec::from_raw_parts(detached.ptr.as_ptr(), detached.len, detached.cap) }
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        self.clear();
        self.release();
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
