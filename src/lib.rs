//! cellkit: foundational single-threaded containers for a host runtime.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small set of containers that own their storage end to end:
//!   hashing, collision resolution, deletion, growth and raw element storage
//!   are implemented here rather than delegated to `Vec`/`HashMap`.
//! - Layers:
//!   - Array<T>: packed elements over a raw global-allocator buffer;
//!     doubling growth, optional capacity lock, buffer orphaning.
//!   - PtrArray<P>: Array of pointer handles with stack operations and
//!     identity-based removal.
//!   - CellTable<K, V>: structural open-addressing layer. Dense parallel
//!     item arrays plus a power-of-two cell index; linear probing and
//!     backward-shift deletion. Driven by (hash, equality) pairs.
//!   - Dict<V>: CellTable keyed by owned strings, hashed with djb2.
//!   - PtrDict<P, V>: CellTable keyed by pointer identity.
//!   - StrBuf: null-terminated text builder over Array<u8>.
//!
//! Constraints
//! - Single-threaded: containers are `!Send`/`!Sync` (storage is held
//!   through `NonNull`). Callers needing sharing must wrap them.
//! - Allocation failure is reported as `ContainerError::AllocationFailed`,
//!   never an abort, and leaves the container as it was.
//! - Index errors are always checked and reported, in every build profile.
//!
//! Ownership
//! - Dict owns its key strings; neither table owns values beyond what `V`
//!   itself owns.
//! - PtrArray and PtrDict own pointees only when the handle type does
//!   (`Box`, `Rc`). With `&T`, `*const T`, `*mut T` or `NonNull<T>`
//!   they never free what they point at; `PtrDict::remove` returns the key
//!   handle to the caller.
//!
//! Table invariants
//! - `cell_capacity` is a power of two; growth doubles it once the item
//!   count reaches 7/10 of it.
//! - Items are dense: removal moves the last item into the hole and
//!   repoints its cell.
//! - Every item is reachable by linear probing from `hash & mask` without
//!   crossing an empty cell. Backward-shift deletion keeps this true
//!   without tombstones.
//!
//! Notes and non-goals
//! - No thread-safety, persistence, or serialization.
//! - Iteration follows dense item order, which removals perturb.
//! - The `logging` feature routes reallocation and rehash events to `log`.

#[macro_use]
mod logging;

pub mod array;
pub mod cell_table;
mod cell_table_proptest;
pub mod dict;
pub mod error;
pub mod pointer;
pub mod ptr_array;
pub mod ptr_dict;
pub mod str_buf;

// Public surface
pub use array::Array;
pub use dict::Dict;
pub use error::ContainerError;
pub use pointer::Pointer;
pub use ptr_array::PtrArray;
pub use ptr_dict::PtrDict;
pub use str_buf::StrBuf;
