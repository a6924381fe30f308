//! Error type shared by every container in the crate.

use std::fmt::{self, Display};

/// Failure reported by a container operation.
///
/// Containers never abort on these conditions; the operation that returned
/// the error leaves its container exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The allocator returned null for a request of `bytes` bytes.
    AllocationFailed { bytes: usize },
    /// The requested capacity does not fit in the address space.
    CapacityOverflow,
    /// The array is capacity-locked and has no free slot left.
    CapacityLocked { capacity: usize },
    /// `index` was not below the current length `len`.
    IndexOutOfBounds { index: usize, len: usize },
    /// No stored pointer matched the requested identity.
    ItemNotFound,
    /// A `Display`/`Debug` impl returned an error, or produced different
    /// output on the rendering pass than on the measuring pass.
    FormatFailed,
}

impl Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::AllocationFailed { bytes } => {
                write!(f, "Allocation of {} bytes failed", bytes)
            }
            ContainerError::CapacityOverflow => Display::fmt("Requested capacity overflows", f),
            ContainerError::CapacityLocked { capacity } => write!(
                f,
                "Capacity is locked at {} elements and the array is full",
                capacity
            ),
            ContainerError::IndexOutOfBounds { index, len } => write!(
                f,
                "Index {} is out of bounds for length {}",
                index, len
            ),
            ContainerError::ItemNotFound => Display::fmt("Item is not stored in the array", f),
            ContainerError::FormatFailed => Display::fmt("Formatting the arguments failed", f),
        }
    }
}

impl std::error::Error for ContainerError {}
