// SPDX-License-Identifier: Apache-2.0

//! Host-side execution of guest registry calls.
//!
//! [`execute`] is the single entry point: the emulator core hands it the
//! record words its transport produced, and the status of the call comes
//! back through the record's status slot, marshalling faults included. The
//! per-call conversion lives in the submodules, grouped like the records
//! they unpack; the actual registry semantics stay behind [`Registry`].

mod hive;
mod key;
mod notify;
mod registry;
mod rtl;
mod value;
mod xlate;

pub use registry::{
    Created, InfoReply, NotifyReply, NotifyRequest, ObjectAttributes, Registry, RtlPath,
    ValueEntry, ValueReply,
};

use crate::item::{Number, Record, HEADER_WORDS};
use crate::mem::{GuestMemory, GuestPtr};
use crate::nt::Status;
use crate::Result;

/// Everything one call execution may touch.
///
/// The registry backend and the guest memory view are disjoint borrows, so a
/// handler can hold buffer views of guest memory across a backend call.
pub struct Context<'a, R, M> {
    pub registry: &'a mut R,
    pub mem: &'a mut M,
}

impl<'a, R: Registry, M: GuestMemory> Context<'a, R, M> {
    pub fn new(registry: &'a mut R, mem: &'a mut M) -> Self {
        Self { registry, mem }
    }
}

/// Executes one packed call record in place.
///
/// An unrecognized call number fails the call with
/// [`Status::NOT_IMPLEMENTED`] rather than the host; the guest-side call
/// numbers may outgrow a host. A record too short for its call fails with
/// [`Status::INFO_LENGTH_MISMATCH`].
pub fn execute<R: Registry, M: GuestMemory>(ctx: &mut Context<'_, R, M>, call: &mut [u64]) {
    if call.len() < HEADER_WORDS {
        log::warn!("call record of {} words is short of a header", call.len());
        return;
    }
    let num = match Number::try_from(call[0]) {
        Ok(num) => num,
        Err(raw) => {
            log::warn!("unrecognized call number {raw:#x}");
            call[1] = Status::NOT_IMPLEMENTED.to_slot();
            return;
        }
    };

    log::trace!("executing {num:?}");
    let result = match num {
        Number::CreateKey => record_mut(call).and_then(|c| key::create_key(ctx, c)),
        Number::CreateKeyTransacted => {
            record_mut(call).and_then(|c| key::create_key_transacted(ctx, c))
        }
        Number::OpenKey => record_mut(call).and_then(|c| key::open_key(ctx, c)),
        Number::OpenKeyEx => record_mut(call).and_then(|c| key::open_key_ex(ctx, c)),
        Number::OpenKeyTransacted => {
            record_mut(call).and_then(|c| key::open_key_transacted(ctx, c))
        }
        Number::OpenKeyTransactedEx => {
            record_mut(call).and_then(|c| key::open_key_transacted_ex(ctx, c))
        }
        Number::DeleteKey => record_mut(call).and_then(|c| key::delete_key(ctx, c)),
        Number::RenameKey => record_mut(call).and_then(|c| key::rename_key(ctx, c)),
        Number::FlushKey => record_mut(call).and_then(|c| key::flush_key(ctx, c)),
        Number::EnumerateKey => record_mut(call).and_then(|c| key::enumerate_key(ctx, c)),
        Number::QueryKey => record_mut(call).and_then(|c| key::query_key(ctx, c)),
        Number::SetInformationKey => {
            record_mut(call).and_then(|c| key::set_information_key(ctx, c))
        }
        Number::DeleteValueKey => record_mut(call).and_then(|c| value::delete_value_key(ctx, c)),
        Number::EnumerateValueKey => {
            record_mut(call).and_then(|c| value::enumerate_value_key(ctx, c))
        }
        Number::QueryValueKey => record_mut(call).and_then(|c| value::query_value_key(ctx, c)),
        Number::SetValueKey => record_mut(call).and_then(|c| value::set_value_key(ctx, c)),
        Number::QueryMultipleValueKey => {
            record_mut(call).and_then(|c| value::query_multiple_value_key(ctx, c))
        }
        Number::QueryLicenseValue => {
            record_mut(call).and_then(|c| value::query_license_value(ctx, c))
        }
        Number::LoadKey => record_mut(call).and_then(|c| hive::load_key(ctx, c)),
        Number::LoadKey2 => record_mut(call).and_then(|c| hive::load_key2(ctx, c)),
        Number::SaveKey => record_mut(call).and_then(|c| hive::save_key(ctx, c)),
        Number::RestoreKey => record_mut(call).and_then(|c| hive::restore_key(ctx, c)),
        Number::ReplaceKey => record_mut(call).and_then(|c| hive::replace_key(ctx, c)),
        Number::UnloadKey => record_mut(call).and_then(|c| hive::unload_key(ctx, c)),
        Number::NotifyChangeKey => {
            record_mut(call).and_then(|c| notify::notify_change_key(ctx, c))
        }
        Number::NotifyChangeMultipleKeys => {
            record_mut(call).and_then(|c| notify::notify_change_multiple_keys(ctx, c))
        }
        Number::RtlCreateKey => record_mut(call).and_then(|c| rtl::rtl_create_key(ctx, c)),
        Number::RtlOpenKey => record_mut(call).and_then(|c| rtl::rtl_open_key(ctx, c)),
        Number::RtlMakeTemporaryKey => {
            record_mut(call).and_then(|c| rtl::rtl_make_temporary_key(ctx, c))
        }
        Number::RtlEnumerateSubKey => {
            record_mut(call).and_then(|c| rtl::rtl_enumerate_sub_key(ctx, c))
        }
        Number::RtlQueryValueKey => {
            record_mut(call).and_then(|c| rtl::rtl_query_value_key(ctx, c))
        }
        Number::RtlSetValueKey => record_mut(call).and_then(|c| rtl::rtl_set_value_key(ctx, c)),
        Number::OpenCurrentUser => record_mut(call).and_then(|c| rtl::open_current_user(ctx, c)),
        Number::FormatCurrentUserKeyPath => {
            record_mut(call).and_then(|c| rtl::format_current_user_key_path(ctx, c))
        }
        Number::QueryRegistryValues => {
            record_mut(call).and_then(|c| rtl::query_registry_values(ctx, c))
        }
        Number::CheckRegistryKey => {
            record_mut(call).and_then(|c| rtl::check_registry_key(ctx, c))
        }
        Number::DeleteRegistryValue => {
            record_mut(call).and_then(|c| rtl::delete_registry_value(ctx, c))
        }
        Number::WriteRegistryValue => {
            record_mut(call).and_then(|c| rtl::write_registry_value(ctx, c))
        }
    };

    // Marshalling faults become the call's status like any other failure.
    let status = match result {
        Ok(status) | Err(status) => status,
    };
    call[1] = status.to_slot();
}

/// Views the raw call words as a typed record.
fn record_mut<T: Record>(call: &mut [u64]) -> Result<&mut T> {
    bytemuck::try_from_bytes_mut(bytemuck::cast_slice_mut(call))
        .map_err(|_| Status::INFO_LENGTH_MISMATCH)
}

/// The caller's information buffer, or an empty view for a zero length.
///
/// A null pointer with a nonzero length faults like any other bad address.
fn info_buffer<M: GuestMemory>(mem: &mut M, ptr: GuestPtr, length: u32) -> Result<&mut [u8]> {
    match length as usize {
        0 => Ok(&mut []),
        len => mem.bytes_mut(ptr, len),
    }
}

/// Stores a reply's required length through an optional guest out-cell and
/// surfaces its status.
fn put_result_len<M: GuestMemory>(
    mem: &mut M,
    result_len: u64,
    reply: registry::InfoReply,
) -> Result<Status> {
    if let (Some(len), Some(ptr)) = (reply.result_len, GuestPtr::new(result_len).nonnull()) {
        mem.write(ptr, &len)?;
    }
    Ok(reply.status)
}

/// Stores a value reply's type and length through optional guest out-cells
/// and surfaces its status.
fn put_value_reply<M: GuestMemory>(
    mem: &mut M,
    result_type: u64,
    result_len: u64,
    reply: registry::ValueReply,
) -> Result<Status> {
    if let Some(len) = reply.result_len {
        if let Some(ptr) = GuestPtr::new(result_type).nonnull() {
            mem.write(ptr, &reply.value_type)?;
        }
        if let Some(ptr) = GuestPtr::new(result_len).nonnull() {
            mem.write(ptr, &len)?;
        }
    }
    Ok(reply.status)
}
