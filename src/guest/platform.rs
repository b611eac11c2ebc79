// SPDX-License-Identifier: Apache-2.0

//! Platform-specific guest functionality.

use crate::mem::GuestPtr;
use crate::nt::Handle;
use crate::Result;

/// The guest-side memory seam.
///
/// Thunks write nothing into guest memory except the handle out-scalars the
/// wrapped interfaces return, and they do so through this trait. A real guest
/// executes inside the address space its pointers refer to and implements the
/// store as a plain write at its native width; test environments back it with
/// an emulated address space instead.
pub trait Platform {
    /// Stores a returned handle at `at`, truncated to the guest's native
    /// handle width.
    ///
    /// Fails with [`Status::ACCESS_VIOLATION`](crate::nt::Status::ACCESS_VIOLATION)
    /// if `at` is not writable guest memory.
    fn store_handle(&mut self, at: GuestPtr, handle: Handle) -> Result<()>;
}
