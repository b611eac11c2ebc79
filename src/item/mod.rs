// SPDX-License-Identifier: Apache-2.0

//! Call record definitions.
//!
//! Exactly one record crosses the boundary per call: a [`Header`] followed by
//! one `u64` slot per argument. The slots carry widened scalars and guest
//! addresses; nothing in a record is a host pointer. Records are plain old
//! data so either side may view them as transport words.

pub mod hive;
pub mod key;
pub mod notify;
pub mod rtl;
pub mod value;

use core::mem::size_of;

use bytemuck::{Pod, Zeroable};

/// The header every record starts with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Header {
    /// The call [`Number`], as its raw discriminant.
    pub num: u64,
    /// The resulting NT status, sign-extended.
    pub status: u64,
}

pub(crate) const HEADER_WORDS: usize = size_of::<Header>() / size_of::<u64>();

/// Number of a wrapped registry call.
///
/// Variants are named after the native entry points they wrap, with the
/// private `RtlpNt*` surface exposed as `Rtl*`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum Number {
    CreateKey = 0x00,
    CreateKeyTransacted = 0x01,
    OpenKey = 0x02,
    OpenKeyEx = 0x03,
    OpenKeyTransacted = 0x04,
    OpenKeyTransactedEx = 0x05,
    DeleteKey = 0x06,
    RenameKey = 0x07,
    FlushKey = 0x08,
    EnumerateKey = 0x09,
    QueryKey = 0x0a,
    SetInformationKey = 0x0b,

    DeleteValueKey = 0x0c,
    EnumerateValueKey = 0x0d,
    QueryValueKey = 0x0e,
    SetValueKey = 0x0f,
    QueryMultipleValueKey = 0x10,
    QueryLicenseValue = 0x11,

    LoadKey = 0x12,
    LoadKey2 = 0x13,
    SaveKey = 0x14,
    RestoreKey = 0x15,
    ReplaceKey = 0x16,
    UnloadKey = 0x17,

    NotifyChangeKey = 0x18,
    NotifyChangeMultipleKeys = 0x19,

    RtlCreateKey = 0x1a,
    RtlOpenKey = 0x1b,
    RtlMakeTemporaryKey = 0x1c,
    RtlEnumerateSubKey = 0x1d,
    RtlQueryValueKey = 0x1e,
    RtlSetValueKey = 0x1f,
    OpenCurrentUser = 0x20,
    FormatCurrentUserKeyPath = 0x21,
    QueryRegistryValues = 0x22,
    CheckRegistryKey = 0x23,
    DeleteRegistryValue = 0x24,
    WriteRegistryValue = 0x25,
}

impl TryFrom<u64> for Number {
    type Error = u64;

    #[inline]
    fn try_from(number: u64) -> Result<Self, Self::Error> {
        match number {
            number if number == Self::CreateKey as u64 => Ok(Self::CreateKey),
            number if number == Self::CreateKeyTransacted as u64 => Ok(Self::CreateKeyTransacted),
            number if number == Self::OpenKey as u64 => Ok(Self::OpenKey),
            number if number == Self::OpenKeyEx as u64 => Ok(Self::OpenKeyEx),
            number if number == Self::OpenKeyTransacted as u64 => Ok(Self::OpenKeyTransacted),
            number if number == Self::OpenKeyTransactedEx as u64 => Ok(Self::OpenKeyTransactedEx),
            number if number == Self::DeleteKey as u64 => Ok(Self::DeleteKey),
            number if number == Self::RenameKey as u64 => Ok(Self::RenameKey),
            number if number == Self::FlushKey as u64 => Ok(Self::FlushKey),
            number if number == Self::EnumerateKey as u64 => Ok(Self::EnumerateKey),
            number if number == Self::QueryKey as u64 => Ok(Self::QueryKey),
            number if number == Self::SetInformationKey as u64 => Ok(Self::SetInformationKey),
            number if number == Self::DeleteValueKey as u64 => Ok(Self::DeleteValueKey),
            number if number == Self::EnumerateValueKey as u64 => Ok(Self::EnumerateValueKey),
            number if number == Self::QueryValueKey as u64 => Ok(Self::QueryValueKey),
            number if number == Self::SetValueKey as u64 => Ok(Self::SetValueKey),
            number if number == Self::QueryMultipleValueKey as u64 => {
                Ok(Self::QueryMultipleValueKey)
            }
            number if number == Self::QueryLicenseValue as u64 => Ok(Self::QueryLicenseValue),
            number if number == Self::LoadKey as u64 => Ok(Self::LoadKey),
            number if number == Self::LoadKey2 as u64 => Ok(Self::LoadKey2),
            number if number == Self::SaveKey as u64 => Ok(Self::SaveKey),
            number if number == Self::RestoreKey as u64 => Ok(Self::RestoreKey),
            number if number == Self::ReplaceKey as u64 => Ok(Self::ReplaceKey),
            number if number == Self::UnloadKey as u64 => Ok(Self::UnloadKey),
            number if number == Self::NotifyChangeKey as u64 => Ok(Self::NotifyChangeKey),
            number if number == Self::NotifyChangeMultipleKeys as u64 => {
                Ok(Self::NotifyChangeMultipleKeys)
            }
            number if number == Self::RtlCreateKey as u64 => Ok(Self::RtlCreateKey),
            number if number == Self::RtlOpenKey as u64 => Ok(Self::RtlOpenKey),
            number if number == Self::RtlMakeTemporaryKey as u64 => Ok(Self::RtlMakeTemporaryKey),
            number if number == Self::RtlEnumerateSubKey as u64 => Ok(Self::RtlEnumerateSubKey),
            number if number == Self::RtlQueryValueKey as u64 => Ok(Self::RtlQueryValueKey),
            number if number == Self::RtlSetValueKey as u64 => Ok(Self::RtlSetValueKey),
            number if number == Self::OpenCurrentUser as u64 => Ok(Self::OpenCurrentUser),
            number if number == Self::FormatCurrentUserKeyPath as u64 => {
                Ok(Self::FormatCurrentUserKeyPath)
            }
            number if number == Self::QueryRegistryValues as u64 => Ok(Self::QueryRegistryValues),
            number if number == Self::CheckRegistryKey as u64 => Ok(Self::CheckRegistryKey),
            number if number == Self::DeleteRegistryValue as u64 => Ok(Self::DeleteRegistryValue),
            number if number == Self::WriteRegistryValue as u64 => Ok(Self::WriteRegistryValue),
            number => Err(number),
        }
    }
}

/// A fixed-layout call record.
///
/// # Safety
///
/// Implementations must be `#[repr(C)]` structs consisting of a leading
/// [`Header`] followed by `u64` slots only, with `header`/`header_mut`
/// returning that leading header. The [`record!`] macro upholds this.
pub unsafe trait Record: Pod {
    /// The call number stamped into the header on issue.
    const NUM: Number;

    fn header(&self) -> &Header;

    fn header_mut(&mut self) -> &mut Header;

    /// The record as transport words.
    #[inline]
    fn words_mut(&mut self) -> &mut [u64] {
        bytemuck::cast_slice_mut(bytemuck::bytes_of_mut(self))
    }
}

/// Defines a call record: a struct named after its [`Number`] variant, with a
/// header and one `u64` slot per listed field, plus its [`Record`] impl.
macro_rules! record {
    ($($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident),* $(,)? })*) => {$(
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, ::bytemuck::Pod, ::bytemuck::Zeroable,
        )]
        #[repr(C)]
        pub struct $name {
            pub header: $crate::item::Header,
            $($(#[$fmeta])* pub $field: u64,)*
        }

        unsafe impl $crate::item::Record for $name {
            const NUM: $crate::item::Number = $crate::item::Number::$name;

            #[inline]
            fn header(&self) -> &$crate::item::Header {
                &self.header
            }

            #[inline]
            fn header_mut(&mut self) -> &mut $crate::item::Header {
                &mut self.header
            }
        }
    )*};
}

pub(crate) use record;
