// SPDX-License-Identifier: Apache-2.0

//! Runtime-library door and path-based convenience calls.

use super::registry::Registry;
use super::{xlate, Context};
use crate::item;
use crate::mem::{GuestMemory, GuestPtr};
use crate::nt::{AccessMask, CreateOptions, Handle, Status};
use crate::Result;

pub(super) fn rtl_create_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::RtlCreateKey,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    let class = xlate::read_name_opt(ctx.mem, GuestPtr::new(c.class))?;
    let created = match ctx.registry.rtl_create_key(
        AccessMask::from_bits_retain(c.access as u32),
        &attr,
        c.title_index as u32,
        class,
        CreateOptions::from_bits_retain(c.options as u32),
    ) {
        Ok(created) => created,
        Err(status) => return Ok(status),
    };
    c.retkey = created.key.raw();
    if let Some(dispos) = GuestPtr::new(c.dispos).nonnull() {
        ctx.mem.write(dispos, &created.disposition)?;
    }
    Ok(Status::SUCCESS)
}

pub(super) fn rtl_open_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::RtlOpenKey,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    match ctx
        .registry
        .rtl_open_key(AccessMask::from_bits_retain(c.access as u32), &attr)
    {
        Ok(key) => {
            c.retkey = key.raw();
            Ok(Status::SUCCESS)
        }
        Err(status) => Ok(status),
    }
}

pub(super) fn rtl_make_temporary_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::RtlMakeTemporaryKey,
) -> Result<Status> {
    Ok(ctx.registry.make_temporary_key(Handle::from_raw(c.key)))
}

pub(super) fn rtl_enumerate_sub_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::RtlEnumerateSubKey,
) -> Result<Status> {
    let out = GuestPtr::new(c.out);
    let desc = xlate::read_unicode_string(ctx.mem, out)?;
    match ctx
        .registry
        .enumerate_sub_key(Handle::from_raw(c.key), c.index as u32)
    {
        // The descriptor's length is the capacity here, not maximum_length.
        Ok(name) => xlate::write_name_back(ctx.mem, out, &desc, desc.length, &name),
        Err(status) => Ok(status),
    }
}

pub(super) fn rtl_query_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::RtlQueryValueKey,
) -> Result<Status> {
    // The length cell is in/out: capacity on the way in, data length out.
    let capacity = match GuestPtr::new(c.result_len).nonnull() {
        Some(ptr) => ctx.mem.read::<u32>(ptr)?,
        None => 0,
    };
    let dest = super::info_buffer(ctx.mem, GuestPtr::new(c.dest), capacity)?;
    let reply = ctx.registry.query_default_value(Handle::from_raw(c.key), dest);
    super::put_value_reply(ctx.mem, c.result_type, c.result_len, reply)
}

pub(super) fn rtl_set_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::RtlSetValueKey,
) -> Result<Status> {
    let data = match c.count as u32 as usize {
        0 => &[][..],
        len => ctx.mem.bytes(GuestPtr::new(c.data), len)?,
    };
    Ok(ctx
        .registry
        .rtl_set_value_key(Handle::from_raw(c.key), c.value_type as u32, data))
}

pub(super) fn open_current_user<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::OpenCurrentUser,
) -> Result<Status> {
    match ctx
        .registry
        .open_current_user(AccessMask::from_bits_retain(c.access as u32))
    {
        Ok(key) => {
            c.retkey = key.raw();
            Ok(Status::SUCCESS)
        }
        Err(status) => Ok(status),
    }
}

pub(super) fn format_current_user_key_path<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::FormatCurrentUserKeyPath,
) -> Result<Status> {
    let path = GuestPtr::new(c.path);
    let desc = xlate::read_unicode_string(ctx.mem, path)?;
    match ctx.registry.current_user_key_path() {
        Ok(value) => xlate::write_name_back(ctx.mem, path, &desc, desc.maximum_length, &value),
        Err(status) => Ok(status),
    }
}

pub(super) fn query_registry_values<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::QueryRegistryValues,
) -> Result<Status> {
    let relative_to = c.relative_to as u32;
    let path = xlate::read_rtl_path(ctx.mem, relative_to, c.path)?;
    Ok(ctx.registry.query_registry_values(
        relative_to,
        path,
        GuestPtr::new(c.query_table),
        GuestPtr::new(c.context),
        GuestPtr::new(c.environment),
    ))
}

pub(super) fn check_registry_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::CheckRegistryKey,
) -> Result<Status> {
    let relative_to = c.relative_to as u32;
    let path = xlate::read_rtl_path(ctx.mem, relative_to, c.path)?;
    Ok(ctx.registry.check_registry_key(relative_to, path))
}

pub(super) fn delete_registry_value<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::DeleteRegistryValue,
) -> Result<Status> {
    let relative_to = c.relative_to as u32;
    let path = xlate::read_rtl_path(ctx.mem, relative_to, c.path)?;
    let name = ctx.mem.read_wide_cstr(GuestPtr::new(c.name))?.into();
    Ok(ctx.registry.delete_registry_value(relative_to, path, name))
}

pub(super) fn write_registry_value<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::rtl::WriteRegistryValue,
) -> Result<Status> {
    let relative_to = c.relative_to as u32;
    let path = xlate::read_rtl_path(ctx.mem, relative_to, c.path)?;
    let name = ctx.mem.read_wide_cstr(GuestPtr::new(c.name))?.into();
    let data = match c.length as u32 as usize {
        0 => &[][..],
        len => ctx.mem.bytes(GuestPtr::new(c.data), len)?,
    };
    Ok(ctx
        .registry
        .write_registry_value(relative_to, path, name, c.value_type as u32, data))
}
