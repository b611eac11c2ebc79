// SPDX-License-Identifier: Apache-2.0

//! API for the emulator guest-host registry call boundary
//!
//! `hiveport` is a protocol crate for proxying Windows NT registry calls from
//! emulated guest code to the 64-bit host process that owns the real registry.
//! The guest may run at a different pointer width than the host; this crate
//! owns the marshalling that makes that safe: fixed-layout call records,
//! pointer widening, and conversion of the descriptor structures (wide-string
//! descriptors, object attribute blocks, value entry arrays, I/O status
//! blocks) between their 32-bit and 64-bit layouts.
//!
//! # Mechanism of action
//!
//! Every wrapped registry API crosses the boundary the same way:
//!
//! ```text
//! guest process                       host process
//! -------------                       ------------
//! guest::Handler thunk method
//!   null prechecks
//!   pack arguments into a record
//!   (one u64 slot per argument)
//!   Handler::dispatch ---------------> host::execute
//!                                        parse call number
//!                                        translate pointers and descriptors
//!                                        host::Registry backend method
//!                                        write outputs into guest memory
//!                                        write status into the record
//!   unpack out-scalars  <---------------
//!   return status
//! ```
//!
//! The transport behind [`guest::Handler::dispatch`] and the registry behind
//! [`host::Registry`] are both externally owned; this crate only defines the
//! records that cross the boundary and the translation applied on each side.
//!
//! # Record format
//!
//! A record is a [`Header`](item::Header) (call number and status, one `u64`
//! each) followed by one `u64` slot per argument. Slot encoding:
//!
//! * handles are sign-extended, so pseudo-handle values survive the round trip,
//! * pointers, lengths, indices and flags are zero-extended,
//! * the resulting NT status is a sign-extended `i32`.
//!
//! Guest pointers are never dereferenced by the host except through a
//! [`GuestMemory`] view, which also carries the guest pointer [`Width`] used
//! to pick descriptor layouts.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::all)]

extern crate alloc;

pub mod guest;
pub mod host;
pub mod item;
pub mod mem;
pub mod nt;

pub use mem::{GuestMemory, GuestPtr, Width};
pub use nt::{Handle, Status};

/// Crate result type.
///
/// Marshalling faults carry the NT status that the guest will observe, so a
/// fault anywhere on the path folds into the status slot of the record.
pub type Result<T> = core::result::Result<T, Status>;

/// The hiveport version.
///
/// Both sides of the boundary must be built against the same record layout
/// revision.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
