// SPDX-License-Identifier: Apache-2.0

//! Records of change notification calls.
//!
//! The APC routine and context slots are guest function and data addresses;
//! the shim never interprets them, it hands them to the host environment,
//! which owns guest code invocation.

use super::record;

record! {
    /// `NtNotifyChangeKey` call record.
    NotifyChangeKey {
        key,
        event,
        apc_routine,
        apc_context,
        /// Guest address of the I/O status block.
        iosb,
        filter,
        subtree,
        buffer,
        length,
        asynchronous,
    }

    /// `NtNotifyChangeMultipleKeys` call record.
    NotifyChangeMultipleKeys {
        key,
        count,
        /// Guest address of the subordinate attribute block array.
        subordinates,
        event,
        apc_routine,
        apc_context,
        iosb,
        filter,
        subtree,
        buffer,
        length,
        asynchronous,
    }
}
