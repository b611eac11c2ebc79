// SPDX-License-Identifier: Apache-2.0

//! Records of value-level calls.

use super::record;

record! {
    /// `NtDeleteValueKey` call record.
    DeleteValueKey {
        key,
        /// Guest address of the value name descriptor.
        name,
    }

    /// `NtEnumerateValueKey` call record.
    EnumerateValueKey {
        key,
        index,
        info_class,
        info,
        length,
        result_len,
    }

    /// `NtQueryValueKey` call record.
    QueryValueKey {
        key,
        /// Guest address of the value name descriptor, or null.
        name,
        info_class,
        info,
        length,
        result_len,
    }

    /// `NtSetValueKey` call record.
    SetValueKey {
        key,
        name,
        title_index,
        value_type,
        /// Guest address of the value data.
        data,
        count,
    }

    /// `NtQueryMultipleValueKey` call record.
    QueryMultipleValueKey {
        key,
        /// Guest address of the value entry array.
        entries,
        count,
        /// Guest address of the shared data buffer.
        buffer,
        length,
        /// Guest address of the required length word, or null.
        result_len,
    }

    /// `NtQueryLicenseValue` call record.
    QueryLicenseValue {
        name,
        /// Guest address of the value type word, or null.
        result_type,
        data,
        length,
        result_len,
    }
}
