// SPDX-License-Identifier: Apache-2.0

//! Records of hive maintenance calls.

use super::record;

record! {
    /// `NtLoadKey` call record.
    LoadKey {
        /// Guest address of the target key attribute block.
        key,
        /// Guest address of the hive file attribute block.
        file,
    }

    /// `NtLoadKey2` call record.
    LoadKey2 {
        key,
        file,
        flags,
    }

    /// `NtSaveKey` call record.
    SaveKey {
        key,
        /// An open file handle to save into.
        file,
    }

    /// `NtRestoreKey` call record.
    RestoreKey {
        key,
        file,
        flags,
    }

    /// `NtReplaceKey` call record.
    ReplaceKey {
        /// Guest address of the replacement hive file attribute block.
        new_file,
        key,
        /// Guest address of the backup destination attribute block.
        old_file,
    }

    /// `NtUnloadKey` call record.
    UnloadKey {
        key,
    }
}
