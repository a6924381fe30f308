//! CellTable: structural open-addressing layer shared by `Dict` and `PtrDict`.
//!
//! Items live densely in parallel arrays (`keys`, `values`, `hashes`,
//! `cell_ixs`). A separate power-of-two `cells` index maps probe positions to
//! item indices. Callers supply the hash and an equality predicate, so this
//! layer never hashes or compares keys itself.
//!
//! Invariants
//! - `cell_capacity` is a power of two and `item_capacity` is 7/10 of it.
//! - `cells[cell_ixs[i]] == i` for every live item `i`, and every occupied
//!   cell holds a live item index.
//! - Each item is reachable by linear probing from `hash & mask` without
//!   crossing an empty cell (maintained by backward-shift deletion).

use crate::array::Array;
use crate::error::ContainerError;

pub(crate) const EMPTY_CELL: usize = usize::MAX;
pub(crate) const DEFAULT_CELL_CAPACITY: usize = 16;
pub(crate) const MIN_CELL_CAPACITY: usize = 4;

/// Outcome of a probe sequence.
enum Probe {
    /// Cell holding the matching item.
    Found(usize),
    /// First empty cell on the sequence; the key is absent.
    Vacant(usize),
}

fn item_capacity_for(cell_capacity: usize) -> usize {
    cell_capacity
        .checked_mul(7)
        .map(|n| n / 10)
        .unwrap_or(cell_capacity / 10 * 7)
}

pub struct CellTable<K, V> {
    cells: Array<usize>,
    keys: Array<K>,
    values: Array<V>,
    hashes: Array<u64>,
    cell_ixs: Array<usize>,
    item_capacity: usize,
    cell_capacity: usize,
}

impl<K, V> CellTable<K, V> {
    pub fn new() -> Result<Self, ContainerError> {
        Self::allocate(DEFAULT_CELL_CAPACITY)
    }

    /// Table with at least `cells` probe cells, rounded up to a power of two.
    pub fn with_cell_capacity(cells: usize) -> Result<Self, ContainerError> {
        let cells = cells
            .max(MIN_CELL_CAPACITY)
            .checked_next_power_of_two()
            .ok_or(ContainerError::CapacityOverflow)?;
        Self::allocate(cells)
    }

    /// Allocates every structure up front. A failure drops whatever was
    /// already allocated, so no partial table escapes.
    fn allocate(cell_capacity: usize) -> Result<Self, ContainerError> {
        debug_assert!(cell_capacity.is_power_of_two());
        let item_capacity = item_capacity_for(cell_capacity);
        let cells = Array::filled(cell_capacity, EMPTY_CELL)?;
        let mut keys = Array::with_capacity(item_capacity)?;
        let mut values = Array::with_capacity(item_capacity)?;
        let mut hashes = Array::with_capacity(item_capacity)?;
        let mut cell_ixs = Array::with_capacity(item_capacity)?;
        keys.lock_capacity();
        values.lock_capacity();
        hashes.lock_capacity();
        cell_ixs.lock_capacity();
        trace!(
            "cell table allocated: {} cells, {} items",
            cell_capacity,
            item_capacity
        );
        Ok(Self {
            cells,
            keys,
            values,
            hashes,
            cell_ixs,
            item_capacity,
            cell_capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn cell_capacity(&self) -> usize {
        self.cell_capacity
    }

    pub fn item_capacity(&self) -> usize {
        self.item_capacity
    }

    #[inline]
    fn mask(&self) -> usize {
        self.cell_capacity - 1
    }

    /// Walks the probe sequence for `hash` until a matching item or an
    /// empty cell.
    fn probe<F>(&self, hash: u64, mut eq: F) -> Probe
    where
        F: FnMut(&K) -> bool,
    {
        let mask = self.mask();
        let start = (hash as usize) & mask;
        let cells = self.cells.as_slice();
        let hashes = self.hashes.as_slice();
        let keys = self.keys.as_slice();
        for step in 0..self.cell_capacity {
            let cell = (start + step) & mask;
            let item = cells[cell];
            if item == EMPTY_CELL {
                return Probe::Vacant(cell);
            }
            if hashes[item] == hash && eq(&keys[item]) {
                return Probe::Found(cell);
            }
        }
        unreachable!("probe scanned every cell: load factor invariant violated");
    }

    pub fn find<F>(&self, hash: u64, eq: F) -> Option<usize>
    where
        F: FnMut(&K) -> bool,
    {
        match self.probe(hash, eq) {
            Probe::Found(cell) => Some(self.cells.as_slice()[cell]),
            Probe::Vacant(_) => None,
        }
    }

    pub fn get<F>(&self, hash: u64, eq: F) -> Option<&V>
    where
        F: FnMut(&K) -> bool,
    {
        let item = self.find(hash, eq)?;
        self.values.get(item).ok()
    }

    pub fn get_mut<F>(&mut self, hash: u64, eq: F) -> Option<&mut V>
    where
        F: FnMut(&K) -> bool,
    {
        let item = self.find(hash, eq)?;
        self.values.get_mut(item).ok()
    }

    pub fn key_at(&self, ix: usize) -> Option<&K> {
        self.keys.get(ix).ok()
    }

    pub fn value_at(&self, ix: usize) -> Option<&V> {
        self.values.get(ix).ok()
    }

    /// Sets the value for a key. An existing item keeps its key and gets the
    /// new value (the old one is returned); `make_key` only runs when a new
    /// item is created.
    pub fn insert_with<F, M>(
        &mut self,
        hash: u64,
        eq: F,
        make_key: M,
        value: V,
    ) -> Result<Option<V>, ContainerError>
    where
        F: FnMut(&K) -> bool,
        M: FnOnce() -> Result<K, ContainerError>,
    {
        let mut cell = match self.probe(hash, eq) {
            Probe::Found(cell) => {
                let item = self.cells.as_slice()[cell];
                return self.values.set(item, value).map(Some);
            }
            Probe::Vacant(cell) => cell,
        };
        let key = make_key()?;
        if self.len() >= self.item_capacity {
            self.grow()?;
            cell = self.vacant_cell(hash);
        }
        let item = self.len();
        self.keys.add(key)?;
        self.values.add(value)?;
        self.hashes.add(hash)?;
        self.cell_ixs.add(cell)?;
        self.cells.as_mut_slice()[cell] = item;
        Ok(None)
    }

    fn vacant_cell(&self, hash: u64) -> usize {
        match self.probe(hash, |_| false) {
            Probe::Vacant(cell) => cell,
            Probe::Found(_) => unreachable!("probe with a rejecting predicate matched"),
        }
    }

    /// Doubles the cell count and rebuilds the index. Items keep their dense
    /// positions and are moved, not cloned. The new table is fully allocated
    /// before anything moves, so failure leaves `self` untouched.
    fn grow(&mut self) -> Result<(), ContainerError> {
        let cell_capacity = self
            .cell_capacity
            .checked_mul(2)
            .ok_or(ContainerError::CapacityOverflow)?;
        let mut grown = Self::allocate(cell_capacity)?;
        grown.keys.append(&mut self.keys)?;
        grown.values.append(&mut self.values)?;
        grown.hashes.append(&mut self.hashes)?;
        for item in 0..grown.hashes.len() {
            let cell = grown.vacant_cell(grown.hashes.as_slice()[item]);
            grown.cells.as_mut_slice()[cell] = item;
            grown.cell_ixs.add(cell)?;
        }
        debug!(
            "cell table grew {} -> {} cells ({} items rehashed)",
            self.cell_capacity,
            cell_capacity,
            grown.len()
        );
        *self = grown;
        Ok(())
    }

    /// Removes the item matching `eq`, returning its key and value.
    pub fn remove<F>(&mut self, hash: u64, eq: F) -> Option<(K, V)>
    where
        F: FnMut(&K) -> bool,
    {
        match self.probe(hash, eq) {
            Probe::Found(cell) => self.remove_at_cell(cell).ok(),
            Probe::Vacant(_) => None,
        }
    }

    fn remove_at_cell(&mut self, cell: usize) -> Result<(K, V), ContainerError> {
        let item = self.cells.as_slice()[cell];
        let last = self.len() - 1;

        // Keep items dense: the last item moves into the hole.
        let key = self.keys.swap_remove(item)?;
        let value = self.values.swap_remove(item)?;
        self.hashes.swap_remove(item)?;
        self.cell_ixs.swap_remove(item)?;
        if item < last {
            let moved_cell = self.cell_ixs.as_slice()[item];
            self.cells.as_mut_slice()[moved_cell] = item;
        }

        self.backward_shift(cell);
        Ok((key, value))
    }

    /// Closes the gap at `cell` by pulling forward every item whose probe
    /// sequence passes through it, then marks the final gap empty.
    fn backward_shift(&mut self, cell: usize) {
        let mask = self.mask();
        let cells = self.cells.as_mut_slice();
        let hashes = self.hashes.as_slice();
        let cell_ixs = self.cell_ixs.as_mut_slice();

        let mut gap = cell;
        let mut scan = gap;
        for _ in 0..mask {
            scan = (scan + 1) & mask;
            let occupant = cells[scan];
            if occupant == EMPTY_CELL {
                break;
            }
            let ideal = (hashes[occupant] as usize) & mask;
            // Move unless `ideal` lies cyclically in (gap, scan].
            if (scan > gap && (ideal <= gap || ideal > scan))
                || (scan < gap && (ideal <= gap && ideal > scan))
            {
                cell_ixs[occupant] = gap;
                cells[gap] = occupant;
                gap = scan;
            }
        }
        cells[gap] = EMPTY_CELL;
    }

    /// Drops every item and empties the index; capacity is kept.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.hashes.clear();
        self.cell_ixs.clear();
        self.cells.as_mut_slice().fill(EMPTY_CELL);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.keys.iter().zip(self.values.as_mut_slice().iter_mut())
    }

    /// Checks every structural invariant, returning a description of the
    /// first violation.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let n = self.len();
        if !self.cell_capacity.is_power_of_two() {
            return Err(format!("cell capacity {} not a power of two", self.cell_capacity));
        }
        if self.item_capacity != item_capacity_for(self.cell_capacity) || n > self.item_capacity {
            return Err(format!("item capacity {} / len {}", self.item_capacity, n));
        }
        if [self.values.len(), self.hashes.len(), self.cell_ixs.len()] != [n, n, n] {
            return Err("parallel arrays out of step".to_string());
        }
        let cells = self.cells.as_slice();
        let mut seen = vec![false; n];
        for (cell, &item) in cells.iter().enumerate() {
            if item == EMPTY_CELL {
                continue;
            }
            if item >= n {
                return Err(format!("cell {} points past the items ({})", cell, item));
            }
            if seen[item] {
                return Err(format!("item {} referenced by two cells", item));
            }
            seen[item] = true;
            if self.cell_ixs.as_slice()[item] != cell {
                return Err(format!("item {} back-pointer mismatch", item));
            }
        }
        if let Some(item) = seen.iter().position(|s| !s) {
            return Err(format!("item {} not referenced by any cell", item));
        }
        let mask = self.mask();
        for item in 0..n {
            let mut cell = (self.hashes.as_slice()[item] as usize) & mask;
            while cells[cell] != item {
                if cells[cell] == EMPTY_CELL {
                    return Err(format!("item {} unreachable from its ideal cell", item));
                }
                cell = (cell + 1) & mask;
            }
        }
        Ok(())
    }
}
