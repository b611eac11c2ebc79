// SPDX-License-Identifier: Apache-2.0

//! Guest-side call packing and result unpacking.

use super::Platform;
use crate::item::{self, Header, Record};
use crate::mem::GuestPtr;
use crate::nt::{AccessMask, CreateOptions, Handle, NotifyFilter, Status};
use crate::Result;

/// Guest-side handler of wrapped registry calls.
///
/// One provided method per wrapped call. Each packs its arguments into the
/// call's record per the slot widening rules, issues the record through
/// [`dispatch`](Self::dispatch) and unpacks any out-scalars. Methods return
/// the NT status of the call; faults in the thunk itself (null argument
/// blocks, unwritable out-pointers, a failed transport) surface as the
/// matching status without reaching the native registry.
///
/// Calls that return a handle do so through a guest out-pointer, checked for
/// null before anything is packed and written unconditionally afterwards,
/// like the interfaces they wrap.
pub trait Handler: Platform {
    /// Hands a packed record to the host and blocks until it has executed.
    ///
    /// The transport behind this method belongs to the emulator core. In
    /// tests it is typically implemented by running [`crate::host::execute`]
    /// on the words directly.
    fn dispatch(&mut self, call: &mut [u64]) -> Result<()>;

    /// Issues one call: stamps the header, dispatches the record and reads
    /// the resulting status back out of it.
    #[inline]
    fn issue<T: Record>(&mut self, call: &mut T) -> Status {
        *call.header_mut() = Header {
            num: T::NUM as u64,
            // A host that never touches the record leaves a sane failure.
            status: Status::NOT_IMPLEMENTED.to_slot(),
        };
        if let Err(fault) = self.dispatch(call.words_mut()) {
            return fault;
        }
        Status::from_slot(call.header().status)
    }

    /// Creates or opens a key, as `NtCreateKey`.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn create_key(
        &mut self,
        retkey: GuestPtr,
        access: AccessMask,
        attr: GuestPtr,
        title_index: u32,
        class: GuestPtr,
        options: CreateOptions,
        dispos: GuestPtr,
    ) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::key::CreateKey {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
            title_index: title_index.into(),
            class: class.raw(),
            options: options.bits().into(),
            dispos: dispos.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Creates or opens a key within a transaction, as `NtCreateKeyTransacted`.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn create_key_transacted(
        &mut self,
        retkey: GuestPtr,
        access: AccessMask,
        attr: GuestPtr,
        title_index: u32,
        class: GuestPtr,
        options: CreateOptions,
        transacted: Handle,
        dispos: GuestPtr,
    ) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::key::CreateKeyTransacted {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
            title_index: title_index.into(),
            class: class.raw(),
            options: options.bits().into(),
            transacted: transacted.raw(),
            dispos: dispos.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Opens a key, as `NtOpenKey`.
    #[inline]
    fn open_key(&mut self, retkey: GuestPtr, access: AccessMask, attr: GuestPtr) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::key::OpenKey {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Opens a key with open options, as `NtOpenKeyEx`.
    #[inline]
    fn open_key_ex(
        &mut self,
        retkey: GuestPtr,
        access: AccessMask,
        attr: GuestPtr,
        options: CreateOptions,
    ) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::key::OpenKeyEx {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
            options: options.bits().into(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Opens a key within a transaction, as `NtOpenKeyTransacted`.
    #[inline]
    fn open_key_transacted(
        &mut self,
        retkey: GuestPtr,
        access: AccessMask,
        attr: GuestPtr,
        transaction: Handle,
    ) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::key::OpenKeyTransacted {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
            transaction: transaction.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Opens a key within a transaction with open options, as
    /// `NtOpenKeyTransactedEx`.
    #[inline]
    fn open_key_transacted_ex(
        &mut self,
        retkey: GuestPtr,
        access: AccessMask,
        attr: GuestPtr,
        options: CreateOptions,
        transaction: Handle,
    ) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::key::OpenKeyTransactedEx {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
            options: options.bits().into(),
            transaction: transaction.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Deletes a key, as `NtDeleteKey`.
    #[inline]
    fn delete_key(&mut self, key: Handle) -> Status {
        self.issue(&mut item::key::DeleteKey {
            header: Header::default(),
            key: key.raw(),
        })
    }

    /// Renames a key, as `NtRenameKey`.
    #[inline]
    fn rename_key(&mut self, key: Handle, name: GuestPtr) -> Status {
        self.issue(&mut item::key::RenameKey {
            header: Header::default(),
            key: key.raw(),
            name: name.raw(),
        })
    }

    /// Flushes a key to stable storage, as `NtFlushKey`.
    #[inline]
    fn flush_key(&mut self, key: Handle) -> Status {
        self.issue(&mut item::key::FlushKey {
            header: Header::default(),
            key: key.raw(),
        })
    }

    /// Enumerates a subkey by index, as `NtEnumerateKey`.
    ///
    /// The info class travels raw; the host side validates it.
    #[inline]
    fn enumerate_key(
        &mut self,
        key: Handle,
        index: u32,
        info_class: u32,
        info: GuestPtr,
        length: u32,
        result_len: GuestPtr,
    ) -> Status {
        self.issue(&mut item::key::EnumerateKey {
            header: Header::default(),
            key: key.raw(),
            index: index.into(),
            info_class: info_class.into(),
            info: info.raw(),
            length: length.into(),
            result_len: result_len.raw(),
        })
    }

    /// Queries key information, as `NtQueryKey`.
    #[inline]
    fn query_key(
        &mut self,
        key: Handle,
        info_class: u32,
        info: GuestPtr,
        length: u32,
        result_len: GuestPtr,
    ) -> Status {
        self.issue(&mut item::key::QueryKey {
            header: Header::default(),
            key: key.raw(),
            info_class: info_class.into(),
            info: info.raw(),
            length: length.into(),
            result_len: result_len.raw(),
        })
    }

    /// Sets key information, as `NtSetInformationKey`.
    #[inline]
    fn set_information_key(
        &mut self,
        key: Handle,
        info_class: u32,
        info: GuestPtr,
        length: u32,
    ) -> Status {
        self.issue(&mut item::key::SetInformationKey {
            header: Header::default(),
            key: key.raw(),
            info_class: info_class.into(),
            info: info.raw(),
            length: length.into(),
        })
    }

    /// Deletes a value, as `NtDeleteValueKey`.
    #[inline]
    fn delete_value_key(&mut self, key: Handle, name: GuestPtr) -> Status {
        self.issue(&mut item::value::DeleteValueKey {
            header: Header::default(),
            key: key.raw(),
            name: name.raw(),
        })
    }

    /// Enumerates a value by index, as `NtEnumerateValueKey`.
    #[inline]
    fn enumerate_value_key(
        &mut self,
        key: Handle,
        index: u32,
        info_class: u32,
        info: GuestPtr,
        length: u32,
        result_len: GuestPtr,
    ) -> Status {
        self.issue(&mut item::value::EnumerateValueKey {
            header: Header::default(),
            key: key.raw(),
            index: index.into(),
            info_class: info_class.into(),
            info: info.raw(),
            length: length.into(),
            result_len: result_len.raw(),
        })
    }

    /// Queries a value by name, as `NtQueryValueKey`.
    #[inline]
    fn query_value_key(
        &mut self,
        key: Handle,
        name: GuestPtr,
        info_class: u32,
        info: GuestPtr,
        length: u32,
        result_len: GuestPtr,
    ) -> Status {
        self.issue(&mut item::value::QueryValueKey {
            header: Header::default(),
            key: key.raw(),
            name: name.raw(),
            info_class: info_class.into(),
            info: info.raw(),
            length: length.into(),
            result_len: result_len.raw(),
        })
    }

    /// Sets a value, as `NtSetValueKey`.
    #[inline]
    fn set_value_key(
        &mut self,
        key: Handle,
        name: GuestPtr,
        title_index: u32,
        value_type: u32,
        data: GuestPtr,
        count: u32,
    ) -> Status {
        self.issue(&mut item::value::SetValueKey {
            header: Header::default(),
            key: key.raw(),
            name: name.raw(),
            title_index: title_index.into(),
            value_type: value_type.into(),
            data: data.raw(),
            count: count.into(),
        })
    }

    /// Queries several values at once, as `NtQueryMultipleValueKey`.
    ///
    /// `length` is the data buffer capacity by value; the required length
    /// comes back through `result_len`.
    #[inline]
    fn query_multiple_value_key(
        &mut self,
        key: Handle,
        entries: GuestPtr,
        count: u32,
        buffer: GuestPtr,
        length: u32,
        result_len: GuestPtr,
    ) -> Status {
        self.issue(&mut item::value::QueryMultipleValueKey {
            header: Header::default(),
            key: key.raw(),
            entries: entries.raw(),
            count: count.into(),
            buffer: buffer.raw(),
            length: length.into(),
            result_len: result_len.raw(),
        })
    }

    /// Queries a license value by name, as `NtQueryLicenseValue`.
    #[inline]
    fn query_license_value(
        &mut self,
        name: GuestPtr,
        result_type: GuestPtr,
        data: GuestPtr,
        length: u32,
        result_len: GuestPtr,
    ) -> Status {
        self.issue(&mut item::value::QueryLicenseValue {
            header: Header::default(),
            name: name.raw(),
            result_type: result_type.raw(),
            data: data.raw(),
            length: length.into(),
            result_len: result_len.raw(),
        })
    }

    /// Loads a hive under a key, as `NtLoadKey`.
    #[inline]
    fn load_key(&mut self, key: GuestPtr, file: GuestPtr) -> Status {
        self.issue(&mut item::hive::LoadKey {
            header: Header::default(),
            key: key.raw(),
            file: file.raw(),
        })
    }

    /// Loads a hive under a key with flags, as `NtLoadKey2`.
    #[inline]
    fn load_key2(&mut self, key: GuestPtr, file: GuestPtr, flags: u32) -> Status {
        self.issue(&mut item::hive::LoadKey2 {
            header: Header::default(),
            key: key.raw(),
            file: file.raw(),
            flags: flags.into(),
        })
    }

    /// Saves a key's subtree into an open file, as `NtSaveKey`.
    #[inline]
    fn save_key(&mut self, key: Handle, file: Handle) -> Status {
        self.issue(&mut item::hive::SaveKey {
            header: Header::default(),
            key: key.raw(),
            file: file.raw(),
        })
    }

    /// Restores a key's subtree from an open file, as `NtRestoreKey`.
    #[inline]
    fn restore_key(&mut self, key: Handle, file: Handle, flags: u32) -> Status {
        self.issue(&mut item::hive::RestoreKey {
            header: Header::default(),
            key: key.raw(),
            file: file.raw(),
            flags: flags.into(),
        })
    }

    /// Replaces a key's backing hive file, as `NtReplaceKey`.
    #[inline]
    fn replace_key(&mut self, new_file: GuestPtr, key: Handle, old_file: GuestPtr) -> Status {
        self.issue(&mut item::hive::ReplaceKey {
            header: Header::default(),
            new_file: new_file.raw(),
            key: key.raw(),
            old_file: old_file.raw(),
        })
    }

    /// Unloads a hive, as `NtUnloadKey`.
    #[inline]
    fn unload_key(&mut self, key: GuestPtr) -> Status {
        self.issue(&mut item::hive::UnloadKey {
            header: Header::default(),
            key: key.raw(),
        })
    }

    /// Requests change notification on a key, as `NtNotifyChangeKey`.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn notify_change_key(
        &mut self,
        key: Handle,
        event: Handle,
        apc_routine: GuestPtr,
        apc_context: GuestPtr,
        iosb: GuestPtr,
        filter: NotifyFilter,
        subtree: bool,
        buffer: GuestPtr,
        length: u32,
        asynchronous: bool,
    ) -> Status {
        self.issue(&mut item::notify::NotifyChangeKey {
            header: Header::default(),
            key: key.raw(),
            event: event.raw(),
            apc_routine: apc_routine.raw(),
            apc_context: apc_context.raw(),
            iosb: iosb.raw(),
            filter: filter.bits().into(),
            subtree: subtree.into(),
            buffer: buffer.raw(),
            length: length.into(),
            asynchronous: asynchronous.into(),
        })
    }

    /// Requests change notification on a key and subordinate objects, as
    /// `NtNotifyChangeMultipleKeys`.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn notify_change_multiple_keys(
        &mut self,
        key: Handle,
        count: u32,
        subordinates: GuestPtr,
        event: Handle,
        apc_routine: GuestPtr,
        apc_context: GuestPtr,
        iosb: GuestPtr,
        filter: NotifyFilter,
        subtree: bool,
        buffer: GuestPtr,
        length: u32,
        asynchronous: bool,
    ) -> Status {
        self.issue(&mut item::notify::NotifyChangeMultipleKeys {
            header: Header::default(),
            key: key.raw(),
            count: count.into(),
            subordinates: subordinates.raw(),
            event: event.raw(),
            apc_routine: apc_routine.raw(),
            apc_context: apc_context.raw(),
            iosb: iosb.raw(),
            filter: filter.bits().into(),
            subtree: subtree.into(),
            buffer: buffer.raw(),
            length: length.into(),
            asynchronous: asynchronous.into(),
        })
    }

    /// Creates or opens a key through the legacy RTL door, as
    /// `RtlpNtCreateKey`.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn rtl_create_key(
        &mut self,
        retkey: GuestPtr,
        access: AccessMask,
        attr: GuestPtr,
        title_index: u32,
        class: GuestPtr,
        options: CreateOptions,
        dispos: GuestPtr,
    ) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::rtl::RtlCreateKey {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
            title_index: title_index.into(),
            class: class.raw(),
            options: options.bits().into(),
            dispos: dispos.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Opens a key through the legacy RTL door, as `RtlpNtOpenKey`.
    #[inline]
    fn rtl_open_key(&mut self, retkey: GuestPtr, access: AccessMask, attr: GuestPtr) -> Status {
        if retkey.is_null() || attr.is_null() {
            return Status::ACCESS_VIOLATION;
        }
        let mut call = item::rtl::RtlOpenKey {
            header: Header::default(),
            retkey: 0,
            access: access.bits().into(),
            attr: attr.raw(),
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Marks a key volatile, as `RtlpNtMakeTemporaryKey`.
    #[inline]
    fn rtl_make_temporary_key(&mut self, key: Handle) -> Status {
        self.issue(&mut item::rtl::RtlMakeTemporaryKey {
            header: Header::default(),
            key: key.raw(),
        })
    }

    /// Enumerates a subkey name into a caller descriptor, as
    /// `RtlpNtEnumerateSubKey`.
    #[inline]
    fn rtl_enumerate_sub_key(&mut self, key: Handle, out: GuestPtr, index: u32) -> Status {
        self.issue(&mut item::rtl::RtlEnumerateSubKey {
            header: Header::default(),
            key: key.raw(),
            out: out.raw(),
            index: index.into(),
        })
    }

    /// Queries the default value raw, as `RtlpNtQueryValueKey`.
    ///
    /// `result_len` carries the destination capacity in and the value length
    /// out.
    #[inline]
    fn rtl_query_value_key(
        &mut self,
        key: Handle,
        result_type: GuestPtr,
        dest: GuestPtr,
        result_len: GuestPtr,
        reserved: GuestPtr,
    ) -> Status {
        self.issue(&mut item::rtl::RtlQueryValueKey {
            header: Header::default(),
            key: key.raw(),
            result_type: result_type.raw(),
            dest: dest.raw(),
            result_len: result_len.raw(),
            reserved: reserved.raw(),
        })
    }

    /// Sets the default value, as `RtlpNtSetValueKey`.
    #[inline]
    fn rtl_set_value_key(
        &mut self,
        key: Handle,
        value_type: u32,
        data: GuestPtr,
        count: u32,
    ) -> Status {
        self.issue(&mut item::rtl::RtlSetValueKey {
            header: Header::default(),
            key: key.raw(),
            value_type: value_type.into(),
            data: data.raw(),
            count: count.into(),
        })
    }

    /// Opens the current user's root key, as `RtlOpenCurrentUser`.
    #[inline]
    fn open_current_user(&mut self, access: AccessMask, retkey: GuestPtr) -> Status {
        let mut call = item::rtl::OpenCurrentUser {
            header: Header::default(),
            access: access.bits().into(),
            retkey: 0,
        };
        let status = self.issue(&mut call);
        if let Err(fault) = self.store_handle(retkey, Handle::from_raw(call.retkey)) {
            return fault;
        }
        status
    }

    /// Formats the current user's registry path into a caller descriptor, as
    /// `RtlFormatCurrentUserKeyPath`.
    ///
    /// The descriptor is in/out here: the caller supplies the buffer and its
    /// `maximum_length`, unlike the wrapped interface, whose callee-side
    /// allocation cannot cross the process boundary.
    #[inline]
    fn format_current_user_key_path(&mut self, path: GuestPtr) -> Status {
        self.issue(&mut item::rtl::FormatCurrentUserKeyPath {
            header: Header::default(),
            path: path.raw(),
        })
    }

    /// Runs a registry query table, as `RtlQueryRegistryValues`.
    #[inline]
    fn query_registry_values(
        &mut self,
        relative_to: u32,
        path: GuestPtr,
        query_table: GuestPtr,
        context: GuestPtr,
        environment: GuestPtr,
    ) -> Status {
        self.issue(&mut item::rtl::QueryRegistryValues {
            header: Header::default(),
            relative_to: relative_to.into(),
            path: path.raw(),
            query_table: query_table.raw(),
            context: context.raw(),
            environment: environment.raw(),
        })
    }

    /// Checks that a key exists, as `RtlCheckRegistryKey`.
    #[inline]
    fn check_registry_key(&mut self, relative_to: u32, path: GuestPtr) -> Status {
        self.issue(&mut item::rtl::CheckRegistryKey {
            header: Header::default(),
            relative_to: relative_to.into(),
            path: path.raw(),
        })
    }

    /// Deletes a value by path, as `RtlDeleteRegistryValue`.
    #[inline]
    fn delete_registry_value(
        &mut self,
        relative_to: u32,
        path: GuestPtr,
        name: GuestPtr,
    ) -> Status {
        self.issue(&mut item::rtl::DeleteRegistryValue {
            header: Header::default(),
            relative_to: relative_to.into(),
            path: path.raw(),
            name: name.raw(),
        })
    }

    /// Writes a value by path, as `RtlWriteRegistryValue`.
    #[inline]
    fn write_registry_value(
        &mut self,
        relative_to: u32,
        path: GuestPtr,
        name: GuestPtr,
        value_type: u32,
        data: GuestPtr,
        length: u32,
    ) -> Status {
        self.issue(&mut item::rtl::WriteRegistryValue {
            header: Header::default(),
            relative_to: relative_to.into(),
            path: path.raw(),
            name: name.raw(),
            value_type: value_type.into(),
            data: data.raw(),
            length: length.into(),
        })
    }
}
