// SPDX-License-Identifier: Apache-2.0

//! The host-facing registry backend interface.

use core::mem::size_of;

use alloc::vec;
use alloc::vec::Vec;

use crate::mem::GuestPtr;
use crate::nt::{
    AccessMask, CreateOptions, Handle, IoStatus, KeyBasicHeader, KeyInfo, KeySetInfo,
    KeyValueInfo, KeyValuePartialHeader, NotifyFilter, ObjectFlags, Status, WideString, REG_NONE,
};
use crate::Result;

/// An object attribute block resolved out of guest memory.
///
/// `name` is `None` when the block carried a null name pointer. The security
/// descriptor and quality-of-service fields stay guest addresses; no wrapped
/// call is known to pass them, so they cross the seam untranslated for a
/// backend that can reach guest memory itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectAttributes {
    pub root: Handle,
    pub name: Option<WideString>,
    pub flags: ObjectFlags,
    pub security_descriptor: GuestPtr,
    pub security_qos: GuestPtr,
}

/// Outcome of a successful key creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Created {
    pub key: Handle,
    /// [`REG_CREATED_NEW_KEY`](crate::nt::REG_CREATED_NEW_KEY) or
    /// [`REG_OPENED_EXISTING_KEY`](crate::nt::REG_OPENED_EXISTING_KEY).
    pub disposition: u32,
}

/// Outcome of an information query that fills a caller buffer.
///
/// `result_len` is the required buffer length where the backend knows it,
/// which includes the buffer-too-small statuses; `None` leaves the caller's
/// length cell untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoReply {
    pub status: Status,
    pub result_len: Option<u32>,
}

/// Outcome of a raw value query.
///
/// When `result_len` is `Some`, `value_type` is valid as well and both out
/// cells of the call are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueReply {
    pub status: Status,
    pub value_type: u32,
    pub result_len: Option<u32>,
}

/// Outcome of a change-notification request.
///
/// `iosb` is the completed I/O status for a request the backend finished
/// synchronously; an asynchronous backend leaves it `None` and completes the
/// guest's status block through the emulator core later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotifyReply {
    pub status: Status,
    pub iosb: Option<IoStatus>,
}

/// Parameters of a change-notification request.
///
/// The APC routine, APC context and change buffer are guest addresses the
/// host must not dereference; they identify the request back to the guest on
/// completion.
#[derive(Clone, Copy, Debug)]
pub struct NotifyRequest {
    pub key: Handle,
    pub event: Handle,
    pub apc_routine: GuestPtr,
    pub apc_context: GuestPtr,
    pub filter: NotifyFilter,
    pub subtree: bool,
    pub buffer: GuestPtr,
    pub length: u32,
    pub asynchronous: bool,
}

/// One entry of a multiple-value query in host representation.
///
/// The backend fills `data_length`, `data_offset` and `value_type`; the name
/// is resolved on the way in and never written back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueEntry {
    pub name: WideString,
    pub data_length: u32,
    pub data_offset: u32,
    pub value_type: u32,
}

/// Path argument of the path-based convenience calls.
///
/// With [`RTL_REGISTRY_HANDLE`](crate::nt::RTL_REGISTRY_HANDLE) the path
/// argument carries an open key handle instead of a string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RtlPath {
    Handle(Handle),
    Path(WideString),
}

/// The native registry subsystem as the marshalling layer sees it.
///
/// Implementations own handle and key lifetimes; this crate only converts
/// arguments and results across the width boundary. Methods that fill caller
/// buffers receive them as host views of guest memory and report statuses
/// through reply structs, since a required length may accompany a failure.
/// Everything else returns either a bare [`Status`] or a [`Result`] whose
/// error is the failing status.
///
/// Provided methods cover the calls the wrapped interfaces themselves funnel
/// into simpler ones, transactions included; a backend with real transaction
/// or notification-fan-out support overrides them.
pub trait Registry {
    /// Creates or opens a key, as `NtCreateKey`.
    fn create_key(
        &mut self,
        access: AccessMask,
        attr: &ObjectAttributes,
        title_index: u32,
        class: Option<WideString>,
        options: CreateOptions,
    ) -> Result<Created>;

    /// Creates or opens a key within a transaction, as `NtCreateKeyTransacted`.
    ///
    /// The default ignores the transaction and forwards to
    /// [`create_key`](Self::create_key).
    fn create_key_transacted(
        &mut self,
        access: AccessMask,
        attr: &ObjectAttributes,
        title_index: u32,
        class: Option<WideString>,
        options: CreateOptions,
        transaction: Handle,
    ) -> Result<Created> {
        let _ = transaction;
        self.create_key(access, attr, title_index, class, options)
    }

    /// Opens a key, as `NtOpenKey`.
    fn open_key(&mut self, access: AccessMask, attr: &ObjectAttributes) -> Result<Handle>;

    /// Opens a key with open options, as `NtOpenKeyEx`.
    ///
    /// The default drops the options and forwards to
    /// [`open_key`](Self::open_key).
    fn open_key_ex(
        &mut self,
        access: AccessMask,
        attr: &ObjectAttributes,
        options: CreateOptions,
    ) -> Result<Handle> {
        let _ = options;
        self.open_key(access, attr)
    }

    /// Opens a key within a transaction, as `NtOpenKeyTransacted`.
    fn open_key_transacted(
        &mut self,
        access: AccessMask,
        attr: &ObjectAttributes,
        transaction: Handle,
    ) -> Result<Handle> {
        let _ = transaction;
        self.open_key(access, attr)
    }

    /// Opens a key within a transaction with open options, as
    /// `NtOpenKeyTransactedEx`.
    fn open_key_transacted_ex(
        &mut self,
        access: AccessMask,
        attr: &ObjectAttributes,
        options: CreateOptions,
        transaction: Handle,
    ) -> Result<Handle> {
        let _ = transaction;
        self.open_key_ex(access, attr, options)
    }

    /// Deletes a key, as `NtDeleteKey`.
    fn delete_key(&mut self, key: Handle) -> Status;

    /// Renames a key, as `NtRenameKey`.
    fn rename_key(&mut self, key: Handle, name: WideString) -> Status;

    /// Flushes a key to stable storage, as `NtFlushKey`.
    fn flush_key(&mut self, key: Handle) -> Status;

    /// Marks a key volatile, as `RtlpNtMakeTemporaryKey`.
    fn make_temporary_key(&mut self, key: Handle) -> Status;

    /// Enumerates a subkey by index into `info`, as `NtEnumerateKey`.
    fn enumerate_key(
        &mut self,
        key: Handle,
        index: u32,
        class: KeyInfo,
        info: &mut [u8],
    ) -> InfoReply;

    /// Queries key information into `info`, as `NtQueryKey`.
    fn query_key(&mut self, key: Handle, class: KeyInfo, info: &mut [u8]) -> InfoReply;

    /// Sets key information from `info`, as `NtSetInformationKey`.
    fn set_information_key(&mut self, key: Handle, class: KeySetInfo, info: &[u8]) -> Status;

    /// Queries a value into `info`, as `NtQueryValueKey`.
    ///
    /// A `None` or empty name addresses the key's default value.
    fn query_value(
        &mut self,
        key: Handle,
        name: Option<WideString>,
        class: KeyValueInfo,
        info: &mut [u8],
    ) -> InfoReply;

    /// Enumerates a value by index into `info`, as `NtEnumerateValueKey`.
    fn enumerate_value(
        &mut self,
        key: Handle,
        index: u32,
        class: KeyValueInfo,
        info: &mut [u8],
    ) -> InfoReply;

    /// Sets a value, as `NtSetValueKey`.
    ///
    /// A `None` or empty name addresses the key's default value.
    fn set_value(
        &mut self,
        key: Handle,
        name: Option<WideString>,
        title_index: u32,
        value_type: u32,
        data: &[u8],
    ) -> Status;

    /// Deletes a value, as `NtDeleteValueKey`.
    fn delete_value(&mut self, key: Handle, name: WideString) -> Status;

    /// Queries several values at once, as `NtQueryMultipleValueKey`.
    ///
    /// `entries` arrive with names resolved; the backend fills their data
    /// fields and packs the data into `buffer`, reporting the total required
    /// length through the reply.
    fn query_multiple_values(
        &mut self,
        key: Handle,
        entries: &mut [ValueEntry],
        buffer: &mut [u8],
    ) -> InfoReply;

    /// Queries a license value by name, as `NtQueryLicenseValue`.
    fn query_license_value(&mut self, name: WideString, data: &mut [u8]) -> ValueReply;

    /// Queries the unnamed default value raw, as the query half of
    /// `RtlpNtQueryValueKey`.
    ///
    /// The default funnels through [`query_value`](Self::query_value) with
    /// [`KeyValueInfo::Partial`] and copies the data out when it fits `dest`.
    fn query_default_value(&mut self, key: Handle, dest: &mut [u8]) -> ValueReply {
        let header_len = size_of::<KeyValuePartialHeader>();
        let mut info = vec![0u8; header_len + dest.len()];
        let reply = self.query_value(key, None, KeyValueInfo::Partial, &mut info);
        if reply.status != Status::SUCCESS && reply.status != Status::BUFFER_OVERFLOW {
            return ValueReply {
                status: reply.status,
                value_type: REG_NONE,
                result_len: None,
            };
        }
        let header: KeyValuePartialHeader = bytemuck::pod_read_unaligned(&info[..header_len]);
        if reply.status == Status::SUCCESS {
            let len = (header.data_length as usize).min(dest.len());
            dest[..len].copy_from_slice(&info[header_len..header_len + len]);
        }
        ValueReply {
            status: reply.status,
            value_type: header.value_type,
            result_len: Some(header.data_length),
        }
    }

    /// Returns the name of a subkey by index, as the enumeration half of
    /// `RtlpNtEnumerateSubKey`.
    ///
    /// The default funnels through [`enumerate_key`](Self::enumerate_key)
    /// with [`KeyInfo::Basic`] and peels the name out of the information
    /// record, growing the scratch buffer once if the first pass overflows.
    fn enumerate_sub_key(&mut self, key: Handle, index: u32) -> Result<WideString> {
        let header_len = size_of::<KeyBasicHeader>();
        let mut info = vec![0u8; header_len + 64];
        let mut reply = self.enumerate_key(key, index, KeyInfo::Basic, &mut info);
        if reply.status == Status::BUFFER_OVERFLOW || reply.status == Status::BUFFER_TOO_SMALL {
            if let Some(required) = reply.result_len {
                info.resize(required as usize, 0);
                reply = self.enumerate_key(key, index, KeyInfo::Basic, &mut info);
            }
        }
        if reply.status != Status::SUCCESS {
            return Err(reply.status);
        }
        let header: KeyBasicHeader = bytemuck::pod_read_unaligned(&info[..header_len]);
        let len = (header.name_length as usize).min(info.len() - header_len) / 2 * 2;
        let mut units = Vec::with_capacity(len / 2);
        for pair in info[header_len..header_len + len].chunks_exact(2) {
            units.push(u16::from_ne_bytes([pair[0], pair[1]]));
        }
        Ok(units.into())
    }

    /// Sets the unnamed default value, as `RtlpNtSetValueKey`.
    fn rtl_set_value_key(&mut self, key: Handle, value_type: u32, data: &[u8]) -> Status {
        self.set_value(key, None, 0, value_type, data)
    }

    /// Creates or opens a key through the legacy RTL door, as
    /// `RtlpNtCreateKey`.
    fn rtl_create_key(
        &mut self,
        access: AccessMask,
        attr: &ObjectAttributes,
        title_index: u32,
        class: Option<WideString>,
        options: CreateOptions,
    ) -> Result<Created> {
        self.create_key(access, attr, title_index, class, options)
    }

    /// Opens a key through the legacy RTL door, as `RtlpNtOpenKey`.
    fn rtl_open_key(&mut self, access: AccessMask, attr: &ObjectAttributes) -> Result<Handle> {
        self.open_key(access, attr)
    }

    /// Returns the registry path of the current user's root key, as the
    /// formatting half of `RtlFormatCurrentUserKeyPath`.
    fn current_user_key_path(&mut self) -> Result<WideString>;

    /// Opens the current user's root key, as `RtlOpenCurrentUser`.
    ///
    /// The default creates the key under its formatted path, which also
    /// covers the first ever use of a fresh user profile.
    fn open_current_user(&mut self, access: AccessMask) -> Result<Handle> {
        let attr = ObjectAttributes {
            root: Handle::NULL,
            name: Some(self.current_user_key_path()?),
            flags: ObjectFlags::CASE_INSENSITIVE,
            security_descriptor: GuestPtr::NULL,
            security_qos: GuestPtr::NULL,
        };
        self.create_key(access, &attr, 0, None, CreateOptions::empty())
            .map(|created| created.key)
    }

    /// Loads a hive file under a key path, as `NtLoadKey` and `NtLoadKey2`.
    fn load_key(&mut self, subkey: &ObjectAttributes, file: &ObjectAttributes, flags: u32)
        -> Status;

    /// Saves a key's subtree into an open file, as `NtSaveKey`.
    fn save_key(&mut self, key: Handle, file: Handle) -> Status;

    /// Restores a key's subtree from an open file, as `NtRestoreKey`.
    fn restore_key(&mut self, key: Handle, file: Handle, flags: u32) -> Status;

    /// Replaces a key's backing hive file, as `NtReplaceKey`.
    fn replace_key(
        &mut self,
        new_file: &ObjectAttributes,
        key: Handle,
        old_file: &ObjectAttributes,
    ) -> Status;

    /// Unloads a hive, as `NtUnloadKey`.
    fn unload_key(&mut self, subkey: &ObjectAttributes) -> Status;

    /// Requests change notification on a key, as `NtNotifyChangeKey`.
    fn notify_change_key(&mut self, request: NotifyRequest) -> NotifyReply;

    /// Requests change notification on a key and subordinate objects, as
    /// `NtNotifyChangeMultipleKeys`.
    ///
    /// The default handles the degenerate no-subordinates form and refuses
    /// the rest.
    fn notify_change_multiple_keys(
        &mut self,
        request: NotifyRequest,
        subordinates: &[ObjectAttributes],
    ) -> NotifyReply {
        if subordinates.is_empty() {
            return self.notify_change_key(request);
        }
        NotifyReply {
            status: Status::NOT_IMPLEMENTED,
            iosb: None,
        }
    }

    /// Runs a registry query table, as `RtlQueryRegistryValues`.
    ///
    /// The table embeds guest callback pointers that cannot execute on this
    /// side of the boundary, so the default refuses the call; a backend that
    /// shares an address space with the guest may walk the table itself.
    fn query_registry_values(
        &mut self,
        relative_to: u32,
        path: RtlPath,
        query_table: GuestPtr,
        context: GuestPtr,
        environment: GuestPtr,
    ) -> Status {
        let _ = (relative_to, path, query_table, context, environment);
        Status::NOT_IMPLEMENTED
    }

    /// Checks that a key exists under a well-known root, as
    /// `RtlCheckRegistryKey`.
    fn check_registry_key(&mut self, relative_to: u32, path: RtlPath) -> Status;

    /// Deletes a value addressed by path, as `RtlDeleteRegistryValue`.
    fn delete_registry_value(&mut self, relative_to: u32, path: RtlPath, name: WideString)
        -> Status;

    /// Writes a value addressed by path, as `RtlWriteRegistryValue`.
    fn write_registry_value(
        &mut self,
        relative_to: u32,
        path: RtlPath,
        name: WideString,
        value_type: u32,
        data: &[u8],
    ) -> Status;
}
