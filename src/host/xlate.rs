// SPDX-License-Identifier: Apache-2.0

//! Pointer and structure translation between guest and host representations.
//!
//! Pointer-bearing structures change layout with the guest width, so they
//! cannot cross the boundary as raw bytes the way record slots and the
//! same-layout information buffers do. The helpers here pick the layout from
//! [`GuestMemory::width`], resolve embedded guest pointers through guest
//! memory and produce the owned host representations the
//! [`Registry`](super::registry::Registry) methods take, then mirror results
//! back the same way.

use core::mem::size_of;

use alloc::vec::Vec;

use super::registry::{ObjectAttributes, RtlPath, ValueEntry};
use crate::mem::{GuestMemory, GuestPtr, Width};
use crate::nt::{
    Handle, IoStatus, IoStatusBlock32, IoStatusBlock64, KeyValueEntry32, KeyValueEntry64,
    ObjectAttributes32, ObjectAttributes64, ObjectFlags, Status, UnicodeString32, UnicodeString64,
    WideString, RTL_REGISTRY_HANDLE,
};
use crate::Result;

/// A counted string descriptor with its buffer address resolved.
#[derive(Clone, Copy, Debug)]
pub(super) struct RawUnicodeString {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: GuestPtr,
}

/// Reads a string descriptor at the guest's width.
pub(super) fn read_unicode_string<M: GuestMemory>(
    mem: &M,
    ptr: GuestPtr,
) -> Result<RawUnicodeString> {
    Ok(match mem.width() {
        Width::W32 => {
            let raw: UnicodeString32 = mem.read(ptr)?;
            RawUnicodeString {
                length: raw.length,
                maximum_length: raw.maximum_length,
                buffer: GuestPtr::new(raw.buffer.into()),
            }
        }
        Width::W64 => {
            let raw: UnicodeString64 = mem.read(ptr)?;
            RawUnicodeString {
                length: raw.length,
                maximum_length: raw.maximum_length,
                buffer: GuestPtr::new(raw.buffer),
            }
        }
    })
}

/// Materializes the string behind a descriptor.
///
/// An odd byte count floors to whole UTF-16 units. The buffer is not touched
/// for a zero length, so an empty descriptor may carry a null buffer.
pub(super) fn read_name<M: GuestMemory>(mem: &M, ptr: GuestPtr) -> Result<WideString> {
    let raw = read_unicode_string(mem, ptr)?;
    let units = usize::from(raw.length) / 2;
    if units == 0 {
        return Ok(WideString::new());
    }
    Ok(WideString::from_units(mem.wide(raw.buffer, units)?))
}

/// [`read_name`] through a nullable descriptor pointer.
pub(super) fn read_name_opt<M: GuestMemory>(
    mem: &M,
    ptr: GuestPtr,
) -> Result<Option<WideString>> {
    match ptr.nonnull() {
        Some(ptr) => Ok(Some(read_name(mem, ptr)?)),
        None => Ok(None),
    }
}

/// Copies `name` back into a caller descriptor with `capacity` bytes of
/// buffer behind it.
///
/// The descriptor's `length` is updated to the name's byte count either way;
/// a name that does not fit leaves the buffer untouched and reports
/// [`Status::BUFFER_TOO_SMALL`]. A terminator is appended when
/// `maximum_length` leaves room for one.
pub(super) fn write_name_back<M: GuestMemory>(
    mem: &mut M,
    ptr: GuestPtr,
    desc: &RawUnicodeString,
    capacity: u16,
    name: &WideString,
) -> Result<Status> {
    let bytes = u16::try_from(name.len_bytes()).map_err(|_| Status::NAME_TOO_LONG)?;
    if bytes > capacity {
        write_string_length(mem, ptr, bytes)?;
        return Ok(Status::BUFFER_TOO_SMALL);
    }
    if !name.is_empty() {
        mem.wide_mut(desc.buffer, name.len())?.copy_from_slice(name);
    }
    if usize::from(desc.maximum_length) >= usize::from(bytes) + 2 {
        mem.write(desc.buffer.offset(bytes.into())?, &0u16)?;
    }
    write_string_length(mem, ptr, bytes)?;
    Ok(Status::SUCCESS)
}

/// The `length` field leads both descriptor layouts.
fn write_string_length<M: GuestMemory>(mem: &mut M, ptr: GuestPtr, bytes: u16) -> Result<()> {
    mem.write(ptr, &bytes)
}

/// Resolves an object attribute block at the guest's width.
///
/// The guest's `length` field is not trusted; the width picks the layout.
/// A 32-bit root directory handle widens by sign extension.
pub(super) fn read_object_attributes<M: GuestMemory>(
    mem: &M,
    ptr: GuestPtr,
) -> Result<ObjectAttributes> {
    Ok(match mem.width() {
        Width::W32 => {
            let raw: ObjectAttributes32 = mem.read(ptr)?;
            ObjectAttributes {
                root: Handle::from_guest32(raw.root_directory),
                name: read_name_opt(mem, GuestPtr::new(raw.object_name.into()))?,
                flags: ObjectFlags::from_bits_retain(raw.attributes),
                security_descriptor: GuestPtr::new(raw.security_descriptor.into()),
                security_qos: GuestPtr::new(raw.security_quality_of_service.into()),
            }
        }
        Width::W64 => {
            let raw: ObjectAttributes64 = mem.read(ptr)?;
            ObjectAttributes {
                root: Handle::from_raw(raw.root_directory),
                name: read_name_opt(mem, GuestPtr::new(raw.object_name))?,
                flags: ObjectFlags::from_bits_retain(raw.attributes),
                security_descriptor: GuestPtr::new(raw.security_descriptor),
                security_qos: GuestPtr::new(raw.security_quality_of_service),
            }
        }
    })
}

/// Resolves a contiguous array of object attribute blocks.
pub(super) fn read_object_attributes_array<M: GuestMemory>(
    mem: &M,
    ptr: GuestPtr,
    count: u32,
) -> Result<Vec<ObjectAttributes>> {
    let stride = match mem.width() {
        Width::W32 => size_of::<ObjectAttributes32>(),
        Width::W64 => size_of::<ObjectAttributes64>(),
    } as u64;
    let mut all = Vec::with_capacity(count as usize);
    for index in 0..u64::from(count) {
        all.push(read_object_attributes(mem, ptr.offset(index * stride)?)?);
    }
    Ok(all)
}

/// Resolves a multiple-value query's entry array, names included.
pub(super) fn read_value_entries<M: GuestMemory>(
    mem: &M,
    ptr: GuestPtr,
    count: u32,
) -> Result<Vec<ValueEntry>> {
    let mut entries = Vec::with_capacity(count as usize);
    for index in 0..u64::from(count) {
        entries.push(match mem.width() {
            Width::W32 => {
                let raw: KeyValueEntry32 =
                    mem.read(ptr.offset(index * size_of::<KeyValueEntry32>() as u64)?)?;
                ValueEntry {
                    name: read_name(mem, GuestPtr::new(raw.value_name.into()))?,
                    data_length: raw.data_length,
                    data_offset: raw.data_offset,
                    value_type: raw.value_type,
                }
            }
            Width::W64 => {
                let raw: KeyValueEntry64 =
                    mem.read(ptr.offset(index * size_of::<KeyValueEntry64>() as u64)?)?;
                ValueEntry {
                    name: read_name(mem, GuestPtr::new(raw.value_name))?,
                    data_length: raw.data_length,
                    data_offset: raw.data_offset,
                    value_type: raw.value_type,
                }
            }
        });
    }
    Ok(entries)
}

/// Mirrors the backend's entry updates into the guest array.
///
/// Only the data fields are written; the guest's name pointers stay as the
/// guest packed them.
pub(super) fn write_value_entries<M: GuestMemory>(
    mem: &mut M,
    ptr: GuestPtr,
    entries: &[ValueEntry],
) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        match mem.width() {
            Width::W32 => {
                let at = ptr.offset(index as u64 * size_of::<KeyValueEntry32>() as u64)?;
                let mut raw: KeyValueEntry32 = mem.read(at)?;
                raw.data_length = entry.data_length;
                raw.data_offset = entry.data_offset;
                raw.value_type = entry.value_type;
                mem.write(at, &raw)?;
            }
            Width::W64 => {
                let at = ptr.offset(index as u64 * size_of::<KeyValueEntry64>() as u64)?;
                let mut raw: KeyValueEntry64 = mem.read(at)?;
                raw.data_length = entry.data_length;
                raw.data_offset = entry.data_offset;
                raw.value_type = entry.value_type;
                mem.write(at, &raw)?;
            }
        }
    }
    Ok(())
}

/// Writes a completed I/O status block at the guest's width.
pub(super) fn write_io_status<M: GuestMemory>(
    mem: &mut M,
    ptr: GuestPtr,
    iosb: IoStatus,
) -> Result<()> {
    match mem.width() {
        Width::W32 => mem.write(
            ptr,
            &IoStatusBlock32 {
                status: iosb.status.raw() as u32,
                information: iosb.information as u32,
            },
        ),
        Width::W64 => mem.write(
            ptr,
            &IoStatusBlock64 {
                status: iosb.status.to_slot(),
                information: iosb.information,
            },
        ),
    }
}

/// Decodes the path slot of a path-based convenience call.
///
/// The handle form widens like any other handle; the string form is a
/// NUL-terminated name in guest memory.
pub(super) fn read_rtl_path<M: GuestMemory>(
    mem: &M,
    relative_to: u32,
    slot: u64,
) -> Result<RtlPath> {
    if relative_to & RTL_REGISTRY_HANDLE != 0 {
        let handle = match mem.width() {
            Width::W32 => Handle::from_guest32(slot as u32),
            Width::W64 => Handle::from_raw(slot),
        };
        return Ok(RtlPath::Handle(handle));
    }
    Ok(RtlPath::Path(
        mem.read_wide_cstr(GuestPtr::new(slot))?.into(),
    ))
}
