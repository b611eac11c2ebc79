// SPDX-License-Identifier: Apache-2.0

//! Guest address space access.
//!
//! The host never dereferences a guest pointer directly. Every read and write
//! of guest memory goes through [`GuestMemory`], which the emulator core
//! implements on top of whatever mapping it maintains, and which carries the
//! guest pointer width as a runtime property. Faults surface as NT statuses,
//! so a bad guest address anywhere on a marshalling path folds into the
//! status the guest observes.

use crate::nt::Status;
use crate::Result;

use core::mem::size_of;

use alloc::vec::Vec;
use bytemuck::{AnyBitPattern, NoUninit};

/// Upper bound on NUL-terminated wide string reads, in UTF-16 units.
///
/// Matches the NT object name limit; a longer unterminated run is treated as
/// a malformed name rather than scanned indefinitely.
pub const MAX_WIDE_CSTR: usize = 0x7fff;

/// The guest pointer width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    W32,
    W64,
}

impl Width {
    /// Size of a guest pointer in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }
}

/// A guest virtual address.
///
/// Always stored zero-extended; only [`crate::nt::Handle`] values widen by
/// sign extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct GuestPtr(u64);

impl GuestPtr {
    pub const NULL: Self = Self(0);

    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// `None` for the null address, `Some(self)` otherwise.
    #[inline]
    pub fn nonnull(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// Byte offset within the guest address space.
    #[inline]
    pub fn offset(self, count: u64) -> Result<Self> {
        self.0
            .checked_add(count)
            .map(Self)
            .ok_or(Status::ACCESS_VIOLATION)
    }
}

impl From<u64> for GuestPtr {
    #[inline]
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// The host's view of the guest address space.
///
/// Implementations must return views of the actual guest memory, bounds
/// checked against what the guest may access; an address outside the guest
/// space fails with [`Status::ACCESS_VIOLATION`]. The null address is never
/// a valid view.
pub trait GuestMemory {
    /// The guest pointer width.
    fn width(&self) -> Width;

    /// A borrowed view of `len` bytes of guest memory at `ptr`.
    fn bytes(&self, ptr: GuestPtr, len: usize) -> Result<&[u8]>;

    /// A mutable view of `len` bytes of guest memory at `ptr`.
    fn bytes_mut(&mut self, ptr: GuestPtr, len: usize) -> Result<&mut [u8]>;

    /// Reads a POD value, tolerating guest-side misalignment.
    #[inline]
    fn read<T: AnyBitPattern>(&self, ptr: GuestPtr) -> Result<T> {
        Ok(bytemuck::pod_read_unaligned(self.bytes(ptr, size_of::<T>())?))
    }

    /// Writes a POD value.
    #[inline]
    fn write<T: NoUninit>(&mut self, ptr: GuestPtr, value: &T) -> Result<()> {
        self.bytes_mut(ptr, size_of::<T>())?
            .copy_from_slice(bytemuck::bytes_of(value));
        Ok(())
    }

    /// Reads a guest pointer at the guest's width, zero-extending.
    #[inline]
    fn read_ptr(&self, ptr: GuestPtr) -> Result<GuestPtr> {
        Ok(match self.width() {
            Width::W32 => GuestPtr::new(self.read::<u32>(ptr)?.into()),
            Width::W64 => GuestPtr::new(self.read::<u64>(ptr)?),
        })
    }

    /// A borrowed view of `units` UTF-16 units at `ptr`.
    ///
    /// The view must be 2-aligned in the host mapping; guest buffers at odd
    /// addresses fail with [`Status::DATATYPE_MISALIGNMENT`].
    #[inline]
    fn wide(&self, ptr: GuestPtr, units: usize) -> Result<&[u16]> {
        bytemuck::try_cast_slice(self.bytes(ptr, units * 2)?)
            .map_err(|_| Status::DATATYPE_MISALIGNMENT)
    }

    /// A mutable view of `units` UTF-16 units at `ptr`.
    #[inline]
    fn wide_mut(&mut self, ptr: GuestPtr, units: usize) -> Result<&mut [u16]> {
        bytemuck::try_cast_slice_mut(self.bytes_mut(ptr, units * 2)?)
            .map_err(|_| Status::DATATYPE_MISALIGNMENT)
    }

    /// Reads a NUL-terminated wide string, excluding the terminator.
    ///
    /// Bounded by [`MAX_WIDE_CSTR`]; longer runs fail with
    /// [`Status::NAME_TOO_LONG`].
    fn read_wide_cstr(&self, ptr: GuestPtr) -> Result<Vec<u16>> {
        let mut units = Vec::new();
        for index in 0..MAX_WIDE_CSTR {
            let unit = self.read::<u16>(ptr.offset(index as u64 * 2)?)?;
            if unit == 0 {
                return Ok(units);
            }
            units.push(unit);
        }
        Err(Status::NAME_TOO_LONG)
    }
}
