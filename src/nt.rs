// SPDX-License-Identifier: Apache-2.0

//! Definitions of the NT registry ABI items used within the crate.
//!
//! No platform headers exist on either side of this boundary: the guest is an
//! emulated environment and the host-facing seam is a trait. Everything the
//! records and descriptors refer to is therefore defined here, with the
//! 32-bit and 64-bit layouts of pointer-bearing structures spelled out
//! explicitly.

use core::fmt::{self, Write as _};

use alloc::vec::Vec;
use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

/// An NT status code.
///
/// Values are the raw 32-bit codes; success is `NT_SUCCESS`, that is any
/// non-negative value, which includes informational codes such as
/// [`Status::PENDING`] but not warnings like [`Status::BUFFER_OVERFLOW`].
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Self = Self(0);
    pub const PENDING: Self = Self(0x0000_0103);

    pub const DATATYPE_MISALIGNMENT: Self = Self(0x8000_0002_u32 as i32);
    pub const BUFFER_OVERFLOW: Self = Self(0x8000_0005_u32 as i32);
    pub const NO_MORE_ENTRIES: Self = Self(0x8000_001a_u32 as i32);

    pub const NOT_IMPLEMENTED: Self = Self(0xc000_0002_u32 as i32);
    pub const INFO_LENGTH_MISMATCH: Self = Self(0xc000_0004_u32 as i32);
    pub const ACCESS_VIOLATION: Self = Self(0xc000_0005_u32 as i32);
    pub const INVALID_HANDLE: Self = Self(0xc000_0008_u32 as i32);
    pub const INVALID_PARAMETER: Self = Self(0xc000_000d_u32 as i32);
    pub const ACCESS_DENIED: Self = Self(0xc000_0022_u32 as i32);
    pub const BUFFER_TOO_SMALL: Self = Self(0xc000_0023_u32 as i32);
    pub const OBJECT_NAME_NOT_FOUND: Self = Self(0xc000_0034_u32 as i32);
    pub const OBJECT_NAME_COLLISION: Self = Self(0xc000_0035_u32 as i32);
    pub const NAME_TOO_LONG: Self = Self(0xc000_0106_u32 as i32);
    pub const CANNOT_DELETE: Self = Self(0xc000_0121_u32 as i32);
    pub const NOT_REGISTRY_FILE: Self = Self(0xc000_015c_u32 as i32);
    pub const KEY_DELETED: Self = Self(0xc000_017c_u32 as i32);

    /// `NT_SUCCESS`: success and informational severities.
    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub const fn is_warning(self) -> bool {
        (self.0 as u32) >> 30 == 2
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        (self.0 as u32) >> 30 == 3
    }

    /// Encodes the status into a record slot, sign-extended.
    #[inline]
    pub const fn to_slot(self) -> u64 {
        self.0 as i64 as u64
    }

    /// Decodes a record slot, truncating to the 32-bit code.
    #[inline]
    pub const fn from_slot(slot: u64) -> Self {
        Self(slot as u32 as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({:#010x})", self.0 as u32)
    }
}

/// An NT object handle in slot encoding.
///
/// Handles widen by sign extension so that pseudo-handle values, which are
/// small negative integers, keep their meaning on the 64-bit side. A 32-bit
/// guest truncates the slot back to its native width on the way out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    pub const NULL: Self = Self(0);

    /// Wraps an already widened handle value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Widens a 32-bit guest handle, sign-extending.
    #[inline]
    pub const fn from_guest32(raw: u32) -> Self {
        Self(raw as i32 as i64 as u64)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Truncates back to a 32-bit guest handle.
    #[inline]
    pub const fn to_guest32(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

bitflags! {
    /// Registry key access rights.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AccessMask: u32 {
        const QUERY_VALUE = 0x0001;
        const SET_VALUE = 0x0002;
        const CREATE_SUB_KEY = 0x0004;
        const ENUMERATE_SUB_KEYS = 0x0008;
        const NOTIFY = 0x0010;
        const CREATE_LINK = 0x0020;
        const WOW64_64KEY = 0x0100;
        const WOW64_32KEY = 0x0200;

        const DELETE = 0x0001_0000;
        const READ_CONTROL = 0x0002_0000;
        const WRITE_DAC = 0x0004_0000;
        const WRITE_OWNER = 0x0008_0000;
        const SYNCHRONIZE = 0x0010_0000;

        const GENERIC_ALL = 0x1000_0000;
        const GENERIC_EXECUTE = 0x2000_0000;
        const GENERIC_WRITE = 0x4000_0000;
        const GENERIC_READ = 0x8000_0000;

        const READ = Self::READ_CONTROL.bits()
            | Self::QUERY_VALUE.bits()
            | Self::ENUMERATE_SUB_KEYS.bits()
            | Self::NOTIFY.bits();
        const WRITE = Self::READ_CONTROL.bits()
            | Self::SET_VALUE.bits()
            | Self::CREATE_SUB_KEY.bits();
        const ALL_ACCESS = 0x000f_003f;
    }
}

bitflags! {
    /// `REG_OPTION_*` create and open options.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CreateOptions: u32 {
        const VOLATILE = 0x0001;
        const CREATE_LINK = 0x0002;
        const BACKUP_RESTORE = 0x0004;
        const OPEN_LINK = 0x0008;
    }
}

bitflags! {
    /// `REG_NOTIFY_CHANGE_*` completion filter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NotifyFilter: u32 {
        const NAME = 0x0001;
        const ATTRIBUTES = 0x0002;
        const LAST_SET = 0x0004;
        const SECURITY = 0x0008;
    }
}

bitflags! {
    /// `OBJ_*` attribute flags of an object attribute block.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ObjectFlags: u32 {
        const INHERIT = 0x0002;
        const PERMANENT = 0x0010;
        const EXCLUSIVE = 0x0020;
        const CASE_INSENSITIVE = 0x0040;
        const OPENIF = 0x0080;
        const OPENLINK = 0x0100;
        const KERNEL_HANDLE = 0x0200;
        const FORCE_ACCESS_CHECK = 0x0400;
    }
}

/// Registry value types. An open set; unrecognized types pass through.
pub const REG_NONE: u32 = 0;
pub const REG_SZ: u32 = 1;
pub const REG_EXPAND_SZ: u32 = 2;
pub const REG_BINARY: u32 = 3;
pub const REG_DWORD: u32 = 4;
pub const REG_DWORD_BIG_ENDIAN: u32 = 5;
pub const REG_LINK: u32 = 6;
pub const REG_MULTI_SZ: u32 = 7;
pub const REG_RESOURCE_LIST: u32 = 8;
pub const REG_FULL_RESOURCE_DESCRIPTOR: u32 = 9;
pub const REG_RESOURCE_REQUIREMENTS_LIST: u32 = 10;
pub const REG_QWORD: u32 = 11;

/// Create dispositions.
pub const REG_CREATED_NEW_KEY: u32 = 1;
pub const REG_OPENED_EXISTING_KEY: u32 = 2;

/// Hive restore flags.
pub const REG_WHOLE_HIVE_VOLATILE: u32 = 0x0001;
pub const REG_REFRESH_HIVE: u32 = 0x0002;
pub const REG_NO_LAZY_FLUSH: u32 = 0x0004;
pub const REG_FORCE_RESTORE: u32 = 0x0008;

/// `RTL_REGISTRY_*` roots for the path-based convenience calls.
pub const RTL_REGISTRY_ABSOLUTE: u32 = 0;
pub const RTL_REGISTRY_SERVICES: u32 = 1;
pub const RTL_REGISTRY_CONTROL: u32 = 2;
pub const RTL_REGISTRY_WINDOWS_NT: u32 = 3;
pub const RTL_REGISTRY_DEVICEMAP: u32 = 4;
pub const RTL_REGISTRY_USER: u32 = 5;
pub const RTL_REGISTRY_MAXIMUM: u32 = 6;
pub const RTL_REGISTRY_HANDLE: u32 = 0x4000_0000;
pub const RTL_REGISTRY_OPTIONAL: u32 = 0x8000_0000;

/// Key information classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum KeyInfo {
    Basic = 0,
    Node = 1,
    Full = 2,
    Name = 3,
    Cached = 4,
    Flags = 5,
    Virtualization = 6,
    HandleTags = 7,
}

impl TryFrom<u32> for KeyInfo {
    type Error = u32;

    #[inline]
    fn try_from(class: u32) -> Result<Self, Self::Error> {
        match class {
            class if class == Self::Basic as u32 => Ok(Self::Basic),
            class if class == Self::Node as u32 => Ok(Self::Node),
            class if class == Self::Full as u32 => Ok(Self::Full),
            class if class == Self::Name as u32 => Ok(Self::Name),
            class if class == Self::Cached as u32 => Ok(Self::Cached),
            class if class == Self::Flags as u32 => Ok(Self::Flags),
            class if class == Self::Virtualization as u32 => Ok(Self::Virtualization),
            class if class == Self::HandleTags as u32 => Ok(Self::HandleTags),
            class => Err(class),
        }
    }
}

/// Key value information classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum KeyValueInfo {
    Basic = 0,
    Full = 1,
    Partial = 2,
    FullAlign64 = 3,
    PartialAlign64 = 4,
}

impl TryFrom<u32> for KeyValueInfo {
    type Error = u32;

    #[inline]
    fn try_from(class: u32) -> Result<Self, Self::Error> {
        match class {
            class if class == Self::Basic as u32 => Ok(Self::Basic),
            class if class == Self::Full as u32 => Ok(Self::Full),
            class if class == Self::Partial as u32 => Ok(Self::Partial),
            class if class == Self::FullAlign64 as u32 => Ok(Self::FullAlign64),
            class if class == Self::PartialAlign64 as u32 => Ok(Self::PartialAlign64),
            class => Err(class),
        }
    }
}

/// Key set-information classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum KeySetInfo {
    WriteTime = 0,
    Wow64Flags = 1,
    ControlFlags = 2,
    SetVirtualization = 3,
    SetDebug = 4,
    SetHandleTags = 5,
}

impl TryFrom<u32> for KeySetInfo {
    type Error = u32;

    #[inline]
    fn try_from(class: u32) -> Result<Self, Self::Error> {
        match class {
            class if class == Self::WriteTime as u32 => Ok(Self::WriteTime),
            class if class == Self::Wow64Flags as u32 => Ok(Self::Wow64Flags),
            class if class == Self::ControlFlags as u32 => Ok(Self::ControlFlags),
            class if class == Self::SetVirtualization as u32 => Ok(Self::SetVirtualization),
            class if class == Self::SetDebug as u32 => Ok(Self::SetDebug),
            class if class == Self::SetHandleTags as u32 => Ok(Self::SetHandleTags),
            class => Err(class),
        }
    }
}

/// 32-bit layout of a counted UTF-16 string descriptor.
///
/// `length` and `maximum_length` are in bytes; `buffer` is a guest address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct UnicodeString32 {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: u32,
}

/// 64-bit layout of a counted UTF-16 string descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct UnicodeString64 {
    pub length: u16,
    pub maximum_length: u16,
    pub pad: [u8; 4],
    pub buffer: u64,
}

/// 32-bit layout of an object attribute block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ObjectAttributes32 {
    pub length: u32,
    pub root_directory: u32,
    pub object_name: u32,
    pub attributes: u32,
    pub security_descriptor: u32,
    pub security_quality_of_service: u32,
}

/// 64-bit layout of an object attribute block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ObjectAttributes64 {
    pub length: u32,
    pub pad0: [u8; 4],
    pub root_directory: u64,
    pub object_name: u64,
    pub attributes: u32,
    pub pad1: [u8; 4],
    pub security_descriptor: u64,
    pub security_quality_of_service: u64,
}

/// 32-bit layout of one entry of a multiple-value query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyValueEntry32 {
    pub value_name: u32,
    pub data_length: u32,
    pub data_offset: u32,
    pub value_type: u32,
}

/// 64-bit layout of one entry of a multiple-value query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyValueEntry64 {
    pub value_name: u64,
    pub data_length: u32,
    pub data_offset: u32,
    pub value_type: u32,
    pub pad: [u8; 4],
}

/// 32-bit layout of an I/O status block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct IoStatusBlock32 {
    pub status: u32,
    pub information: u32,
}

/// 64-bit layout of an I/O status block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct IoStatusBlock64 {
    pub status: u64,
    pub information: u64,
}

/// A completed I/O status in host representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IoStatus {
    pub status: Status,
    pub information: u64,
}

/// Fixed prefix of `KEY_BASIC_INFORMATION`; the name follows in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyBasicHeader {
    pub last_write_time: u64,
    pub title_index: u32,
    pub name_length: u32,
}

/// Fixed prefix of `KEY_VALUE_BASIC_INFORMATION`; the name follows in place.
///
/// The key and value information classes wrapped by this crate have identical
/// 32-bit and 64-bit layouts, which is what lets info buffers cross the
/// boundary as raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyValueBasicHeader {
    pub title_index: u32,
    pub value_type: u32,
    pub name_length: u32,
}

/// Fixed prefix of `KEY_VALUE_PARTIAL_INFORMATION`; the data follows in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyValuePartialHeader {
    pub title_index: u32,
    pub value_type: u32,
    pub data_length: u32,
}

/// Fixed prefix of `KEY_VALUE_FULL_INFORMATION`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyValueFullHeader {
    pub title_index: u32,
    pub value_type: u32,
    pub data_offset: u32,
    pub data_length: u32,
    pub name_length: u32,
}

/// An owned UTF-16 string materialized out of guest memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WideString(Vec<u16>);

impl WideString {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn from_units(units: &[u16]) -> Self {
        Self(units.to_vec())
    }

    #[inline]
    pub fn into_units(self) -> Vec<u16> {
        self.0
    }

    /// Length in bytes, as descriptor `length` fields count it.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.0.len() * 2
    }
}

impl core::ops::Deref for WideString {
    type Target = [u16];

    #[inline]
    fn deref(&self) -> &[u16] {
        &self.0
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self(s.encode_utf16().collect())
    }
}

impl From<Vec<u16>> for WideString {
    #[inline]
    fn from(units: Vec<u16>) -> Self {
        Self(units)
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(self.0.iter().copied()) {
            f.write_char(c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        fmt::Display::fmt(self, f)?;
        f.write_char('"')
    }
}
