// SPDX-License-Identifier: Apache-2.0

//! Change-notification calls.
//!
//! The APC routine and context slots stay guest addresses end to end; the
//! backend hands them back to the emulator core on completion, which is the
//! only side that can run guest code.

use super::registry::{NotifyReply, NotifyRequest, Registry};
use super::{xlate, Context};
use crate::item;
use crate::mem::{GuestMemory, GuestPtr};
use crate::nt::{Handle, NotifyFilter, Status};
use crate::Result;

pub(super) fn notify_change_key<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::notify::NotifyChangeKey,
) -> Result<Status> {
    let request = NotifyRequest {
        key: Handle::from_raw(c.key),
        event: Handle::from_raw(c.event),
        apc_routine: GuestPtr::new(c.apc_routine),
        apc_context: GuestPtr::new(c.apc_context),
        filter: NotifyFilter::from_bits_retain(c.filter as u32),
        subtree: c.subtree != 0,
        buffer: GuestPtr::new(c.buffer),
        length: c.length as u32,
        asynchronous: c.asynchronous != 0,
    };
    let reply = ctx.registry.notify_change_key(request);
    finish(ctx.mem, c.iosb, reply)
}

pub(super) fn notify_change_multiple_keys<R: Registry, M: GuestMemory>(
    ctx: &mut Context<'_, R, M>,
    c: &mut item::notify::NotifyChangeMultipleKeys,
) -> Result<Status> {
    let subordinates = xlate::read_object_attributes_array(
        ctx.mem,
        GuestPtr::new(c.subordinates),
        c.count as u32,
    )?;
    let request = NotifyRequest {
        key: Handle::from_raw(c.key),
        event: Handle::from_raw(c.event),
        apc_routine: GuestPtr::new(c.apc_routine),
        apc_context: GuestPtr::new(c.apc_context),
        filter: NotifyFilter::from_bits_retain(c.filter as u32),
        subtree: c.subtree != 0,
        buffer: GuestPtr::new(c.buffer),
        length: c.length as u32,
        asynchronous: c.asynchronous != 0,
    };
    let reply = ctx
        .registry
        .notify_change_multiple_keys(request, &subordinates);
    finish(ctx.mem, c.iosb, reply)
}

fn finish<M: GuestMemory>(mem: &mut M, iosb: u64, reply: NotifyReply) -> Result<Status> {
    if let (Some(done), Some(ptr)) = (reply.iosb, GuestPtr::new(iosb).nonnull()) {
        xlate::write_io_status(mem, ptr, done)?;
    }
    Ok(reply.status)
}
