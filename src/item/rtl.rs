// SPDX-License-Identifier: Apache-2.0

//! Records of the legacy and path-based convenience surface.
//!
//! The `Rtl*` records wrap the private NT4-era RTL entry points; the
//! path-based calls take `RTL_REGISTRY_*` roots and NUL-terminated wide
//! strings instead of descriptors.

use super::record;

record! {
    /// `RtlpNtCreateKey` call record.
    RtlCreateKey {
        retkey,
        access,
        attr,
        title_index,
        class,
        options,
        dispos,
    }

    /// `RtlpNtOpenKey` call record.
    RtlOpenKey {
        retkey,
        access,
        attr,
    }

    /// `RtlpNtMakeTemporaryKey` call record.
    RtlMakeTemporaryKey {
        key,
    }

    /// `RtlpNtEnumerateSubKey` call record.
    RtlEnumerateSubKey {
        key,
        /// Guest address of the output name descriptor.
        out,
        index,
    }

    /// `RtlpNtQueryValueKey` call record; queries the default value.
    RtlQueryValueKey {
        key,
        /// Guest address of the value type word, or null.
        result_type,
        dest,
        /// Guest address of the in/out length word, or null.
        result_len,
        /// Unidentified in the wrapped interface; passed through untouched.
        reserved,
    }

    /// `RtlpNtSetValueKey` call record; sets the default value.
    RtlSetValueKey {
        key,
        value_type,
        data,
        count,
    }

    /// `RtlOpenCurrentUser` call record.
    OpenCurrentUser {
        access,
        /// The opened handle on return.
        retkey,
    }

    /// `RtlFormatCurrentUserKeyPath` call record.
    FormatCurrentUserKeyPath {
        /// Guest address of the caller-allocated in/out path descriptor.
        path,
    }

    /// `RtlQueryRegistryValues` call record.
    QueryRegistryValues {
        relative_to,
        path,
        /// Guest address of the query table; opaque to the shim, since the
        /// table embeds guest callback pointers.
        query_table,
        context,
        environment,
    }

    /// `RtlCheckRegistryKey` call record.
    CheckRegistryKey {
        relative_to,
        path,
    }

    /// `RtlDeleteRegistryValue` call record.
    DeleteRegistryValue {
        relative_to,
        path,
        name,
    }

    /// `RtlWriteRegistryValue` call record.
    WriteRegistryValue {
        relative_to,
        path,
        name,
        value_type,
        data,
        length,
    }
}
