// SPDX-License-Identifier: Apache-2.0

//! Key creation, lookup and maintenance calls.

use super::registry::Registry;
use super::{xlate, Context};
use crate::item;
use crate::mem::{GuestMemory, GuestPtr};
use crate::nt::{AccessMask, CreateOptions, Handle, KeyInfo, KeySetInfo, Status};
use crate::Result;

pub(super) fn create_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::CreateKey,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    let class = xlate::read_name_opt(ctx.mem, GuestPtr::new(c.class))?;
    let created = match ctx.registry.create_key(
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

pub(super) fn create_key_transacted<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::CreateKeyTransacted,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    let class = xlate::read_name_opt(ctx.mem, GuestPtr::new(c.class))?;
    let created = match ctx.registry.create_key_transacted(
        AccessMask::from_bits_retain(c.access as u32),
        &attr,
        c.title_index as u32,
        class,
        CreateOptions::from_bits_retain(c.options as u32),
        Handle::from_raw(c.transacted),
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

pub(super) fn open_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::OpenKey,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    match ctx
        .registry
        .open_key(AccessMask::from_bits_retain(c.access as u32), &attr)
    {
        Ok(key) => {
            c.retkey = key.raw();
            Ok(Status::SUCCESS)
        }
        Err(status) => Ok(status),
    }
}

pub(super) fn open_key_ex<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::OpenKeyEx,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    match ctx.registry.open_key_ex(
        AccessMask::from_bits_retain(c.access as u32),
        &attr,
        CreateOptions::from_bits_retain(c.options as u32),
    ) {
        Ok(key) => {
            c.retkey = key.raw();
            Ok(Status::SUCCESS)
        }
        Err(status) => Ok(status),
    }
}

pub(super) fn open_key_transacted<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::OpenKeyTransacted,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    match ctx.registry.open_key_transacted(
        AccessMask::from_bits_retain(c.access as u32),
        &attr,
        Handle::from_raw(c.transaction),
    ) {
        Ok(key) => {
            c.retkey = key.raw();
            Ok(Status::SUCCESS)
        }
        Err(status) => Ok(status),
    }
}

pub(super) fn open_key_transacted_ex<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::OpenKeyTransactedEx,
) -> Result<Status> {
    let attr = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.attr))?;
    match ctx.registry.open_key_transacted_ex(
        AccessMask::from_bits_retain(c.access as u32),
        &attr,
        CreateOptions::from_bits_retain(c.options as u32),
        Handle::from_raw(c.transaction),
    ) {
        Ok(key) => {
            c.retkey = key.raw();
            Ok(Status::SUCCESS)
        }
        Err(status) => Ok(status),
    }
}

pub(super) fn delete_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::DeleteKey,
) -> Result<Status> {
    Ok(ctx.registry.delete_key(Handle::from_raw(c.key)))
}

pub(super) fn rename_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::RenameKey,
) -> Result<Status> {
    let name = xlate::read_name(ctx.mem, GuestPtr::new(c.name))?;
    Ok(ctx.registry.rename_key(Handle::from_raw(c.key), name))
}

pub(super) fn flush_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::FlushKey,
) -> Result<Status> {
    Ok(ctx.registry.flush_key(Handle::from_raw(c.key)))
}

pub(super) fn enumerate_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::EnumerateKey,
) -> Result<Status> {
    let class = KeyInfo::try_from(c.info_class as u32).map_err(|_| Status::INVALID_PARAMETER)?;
    let info = super::info_buffer(ctx.mem, GuestPtr::new(c.info), c.length as u32)?;
    let reply = ctx
        .registry
        .enumerate_key(Handle::from_raw(c.key), c.index as u32, class, info);
    super::put_result_len(ctx.mem, c.result_len, reply)
}

pub(super) fn query_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::QueryKey,
) -> Result<Status> {
    let class = KeyInfo::try_from(c.info_class as u32).map_err(|_| Status::INVALID_PARAMETER)?;
    let info = super::info_buffer(ctx.mem, GuestPtr::new(c.info), c.length as u32)?;
    let reply = ctx.registry.query_key(Handle::from_raw(c.key), class, info);
    super::put_result_len(ctx.mem, c.result_len, reply)
}

pub(super) fn set_information_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::key::SetInformationKey,
) -> Result<Status> {
    let class = KeySetInfo::try_from(c.info_class as u32).map_err(|_| Status::INVALID_PARAMETER)?;
    let info = match c.length as u32 as usize {
        0 => &[][..],
        len => ctx.mem.bytes(GuestPtr::new(c.info), len)?,
    };
    Ok(ctx
        .registry
        .set_information_key(Handle::from_raw(c.key), class, info))
}
