// SPDX-License-Identifier: Apache-2.0

//! Value query and mutation calls.

use super::registry::Registry;
use super::{xlate, Context};
use crate::item;
use crate::mem::{GuestMemory, GuestPtr};
use crate::nt::{Handle, KeyValueInfo, Status};
use crate::Result;

pub(super) fn delete_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::value::DeleteValueKey,
) -> Result<Status> {
    let name = xlate::read_name(ctx.mem, GuestPtr::new(c.name))?;
    Ok(ctx.registry.delete_value(Handle::from_raw(c.key), name))
}

pub(super) fn enumerate_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::value::EnumerateValueKey,
) -> Result<Status> {
    let class =
        KeyValueInfo::try_from(c.info_class as u32).map_err(|_| Status::INVALID_PARAMETER)?;
    let info = super::info_buffer(ctx.mem, GuestPtr::new(c.info), c.length as u32)?;
    let reply = ctx
        .registry
        .enumerate_value(Handle::from_raw(c.key), c.index as u32, class, info);
    super::put_result_len(ctx.mem, c.result_len, reply)
}

pub(super) fn query_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::value::QueryValueKey,
) -> Result<Status> {
    let class =
        KeyValueInfo::try_from(c.info_class as u32).map_err(|_| Status::INVALID_PARAMETER)?;
    let name = xlate::read_name_opt(ctx.mem, GuestPtr::new(c.name))?;
    let info = super::info_buffer(ctx.mem, GuestPtr::new(c.info), c.length as u32)?;
    let reply = ctx
        .registry
        .query_value(Handle::from_raw(c.key), name, class, info);
    super::put_result_len(ctx.mem, c.result_len, reply)
}

pub(super) fn set_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::value::SetValueKey,
) -> Result<Status> {
    let name = xlate::read_name_opt(ctx.mem, GuestPtr::new(c.name))?;
    let data = match c.count as u32 as usize {
        0 => &[][..],
        len => ctx.mem.bytes(GuestPtr::new(c.data), len)?,
    };
    Ok(ctx.registry.set_value(
        Handle::from_raw(c.key),
        name,
        c.title_index as u32,
        c.value_type as u32,
        data,
    ))
}

pub(super) fn query_multiple_value_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::value::QueryMultipleValueKey,
) -> Result<Status> {
    let mut entries =
        xlate::read_value_entries(ctx.mem, GuestPtr::new(c.entries), c.count as u32)?;
    let buffer = super::info_buffer(ctx.mem, GuestPtr::new(c.buffer), c.length as u32)?;
    let reply = ctx
        .registry
        .query_multiple_values(Handle::from_raw(c.key), &mut entries, buffer);
    if reply.status.is_success() {
        xlate::write_value_entries(ctx.mem, GuestPtr::new(c.entries), &entries)?;
    }
    super::put_result_len(ctx.mem, c.result_len, reply)
}

pub(super) fn query_license_value<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::value::QueryLicenseValue,
) -> Result<Status> {
    let name = xlate::read_name(ctx.mem, GuestPtr::new(c.name))?;
    let data = super::info_buffer(ctx.mem, GuestPtr::new(c.data), c.length as u32)?;
    let reply = ctx.registry.query_license_value(name, data);
    super::put_value_reply(ctx.mem, c.result_type, c.result_len, reply)
}
