// SPDX-License-Identifier: Apache-2.0

//! Record-level behavior of the host dispatcher.

use super::TestHandler;

use hiveport::guest::Handler;
use hiveport::host::{self, Context};
use hiveport::item::Number;
use hiveport::nt::{AccessMask, UnicodeString64};
use hiveport::{GuestMemory, GuestPtr, Handle, Status, Width};

fn run_raw(t: &mut TestHandler, call: &mut [u64]) {
    let mut ctx = Context::new(&mut t.registry, &mut t.ram);
    host::execute(&mut ctx, call);
}

#[test]
fn an_unknown_number_reports_not_implemented() {
    let mut t = TestHandler::new(Width::W64);
    let mut call = [0x7fu64, 0, 0, 0];
    run_raw(&mut t, &mut call);
    assert_eq!(Status::from_slot(call[1]), Status::NOT_IMPLEMENTED);
}

#[test]
fn a_runt_record_is_left_alone() {
    let mut t = TestHandler::new(Width::W64);
    // One word cannot hold a header, so there is nowhere to report to.
    let mut call = [Number::FlushKey as u64];
    run_raw(&mut t, &mut call);
    assert_eq!(call, [Number::FlushKey as u64]);
}

#[test]
fn a_missized_record_reports_the_length_mismatch() {
    let mut t = TestHandler::new(Width::W64);
    // A flush record carries exactly one argument word; five words is some
    // other call's shape.
    let mut call = [Number::FlushKey as u64, 0, 0x2c, 0, 0];
    run_raw(&mut t, &mut call);
    assert_eq!(Status::from_slot(call[1]), Status::INFO_LENGTH_MISMATCH);
    // The argument words are untouched.
    assert_eq!(call[2], 0x2c);
}

#[test]
fn a_misaligned_name_faults_as_the_call_status() {
    let mut t = TestHandler::new(Width::W64);
    let key = t.make_key("\\Registry\\Machine\\Software\\Angles");
    // A descriptor whose buffer sits at an odd guest address.
    let desc = t.ram.alloc(16, 8);
    t.ram
        .write(
            desc,
            &UnicodeString64 {
                length: 4,
                maximum_length: 4,
                pad: [0; 4],
                buffer: 0xf001,
            },
        )
        .unwrap();
    assert_eq!(t.rename_key(key, desc), Status::DATATYPE_MISALIGNMENT);
}

#[test]
fn an_unreadable_argument_faults_as_the_call_status() {
    let mut t = TestHandler::new(Width::W64);
    let key = t.make_key("\\Registry\\Machine\\Software\\Angles");
    // Far beyond the end of guest memory.
    assert_eq!(
        t.rename_key(key, GuestPtr::new(0xffff_0000)),
        Status::ACCESS_VIOLATION
    );
}

#[test]
fn an_unwritable_out_cell_surfaces_as_a_fault() {
    let mut t = TestHandler::new(Width::W64);
    t.registry.seed_key("\\Registry\\Machine\\Software");
    let attr = t
        .ram
        .put_object_attributes(Handle::NULL, "\\Registry\\Machine\\Software");
    let cell = GuestPtr::new(0xffff_0000);
    assert_eq!(t.open_key(cell, AccessMask::READ, attr), Status::ACCESS_VIOLATION);
}
