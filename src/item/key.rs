// SPDX-License-Identifier: Apache-2.0

//! Records of key creation, opening and key-level maintenance calls.

use super::record;

record! {
    /// `NtCreateKey` call record.
    CreateKey {
        /// The created handle on return.
        retkey,
        access,
        /// Guest address of the object attribute block.
        attr,
        title_index,
        /// Guest address of the class string descriptor, or null.
        class,
        options,
        /// Guest address of the disposition word, or null.
        dispos,
    }

    /// `NtCreateKeyTransacted` call record.
    CreateKeyTransacted {
        retkey,
        access,
        attr,
        title_index,
        class,
        options,
        transacted,
        dispos,
    }

    /// `NtOpenKey` call record.
    OpenKey {
        retkey,
        access,
        attr,
    }

    /// `NtOpenKeyEx` call record.
    OpenKeyEx {
        retkey,
        access,
        attr,
        options,
    }

    /// `NtOpenKeyTransacted` call record.
    OpenKeyTransacted {
        retkey,
        access,
        attr,
        transaction,
    }

    /// `NtOpenKeyTransactedEx` call record.
    OpenKeyTransactedEx {
        retkey,
        access,
        attr,
        options,
        transaction,
    }

    /// `NtDeleteKey` call record.
    DeleteKey {
        key,
    }

    /// `NtRenameKey` call record.
    RenameKey {
        key,
        /// Guest address of the new name descriptor.
        name,
    }

    /// `NtFlushKey` call record.
    FlushKey {
        key,
    }

    /// `NtEnumerateKey` call record.
    EnumerateKey {
        key,
        index,
        info_class,
        /// Guest address of the info buffer.
        info,
        length,
        /// Guest address of the result length word, or null.
        result_len,
    }

    /// `NtQueryKey` call record.
    QueryKey {
        key,
        info_class,
        info,
        length,
        result_len,
    }

    /// `NtSetInformationKey` call record.
    SetInformationKey {
        key,
        info_class,
        info,
        length,
    }
}
