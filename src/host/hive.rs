// SPDX-License-Identifier: Apache-2.0

//! Hive load, save and restore calls.

use super::registry::Registry;
use super::{xlate, Context};
use crate::item;
use crate::mem::{GuestMemory, GuestPtr};
use crate::nt::{Handle, Status};
use crate::Result;

pub(super) fn load_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::hive::LoadKey,
) -> Result<Status> {
    let subkey = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.key))?;
    let file = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.file))?;
    Ok(ctx.registry.load_key(&subkey, &file, 0))
}

pub(super) fn load_key2<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::hive::LoadKey2,
) -> Result<Status> {
    let subkey = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.key))?;
    let file = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.file))?;
    Ok(ctx.registry.load_key(&subkey, &file, c.flags as u32))
}

pub(super) fn save_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::hive::SaveKey,
) -> Result<Status> {
    Ok(ctx
        .registry
        .save_key(Handle::from_raw(c.key), Handle::from_raw(c.file)))
}

pub(super) fn restore_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::hive::RestoreKey,
) -> Result<Status> {
    Ok(ctx.registry.restore_key(
        Handle::from_raw(c.key),
        Handle::from_raw(c.file),
        c.flags as u32,
    ))
}

pub(super) fn replace_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::hive::ReplaceKey,
) -> Result<Status> {
    let new_file = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.new_file))?;
    let old_file = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.old_file))?;
    Ok(ctx
        .registry
        .replace_key(&new_file, Handle::from_raw(c.key), &old_file))
}

pub(super) fn unload_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::hive::UnloadKey,
) -> Result<Status> {
    let subkey = xlate::read_object_attributes(ctx.mem, GuestPtr::new(c.key))?;
    Ok(ctx.registry.unload_key(&subkey))
}
