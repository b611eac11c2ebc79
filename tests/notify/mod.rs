// SPDX-License-Identifier: Apache-2.0

//! Change-notification calls.

use super::{run_both, TestHandler};

use hiveport::guest::Handler;
use hiveport::nt::{IoStatusBlock32, IoStatusBlock64, NotifyFilter};
use hiveport::{GuestMemory, GuestPtr, Handle, Status, Width};

#[test]
fn a_synchronous_watch_completes_the_status_block() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Watched");
        let iosb = t.ram.alloc(16, 8);
        let status = t.notify_change_key(
            key,
            Handle::from_raw(0x5c),
            GuestPtr::NULL,
            GuestPtr::NULL,
            iosb,
            NotifyFilter::NAME | NotifyFilter::LAST_SET,
            true,
            GuestPtr::NULL,
            0,
            false,
        );
        assert_eq!(status, Status::SUCCESS);

        let request = t.registry.last_notify.unwrap();
        assert_eq!(request.filter, NotifyFilter::NAME | NotifyFilter::LAST_SET);
        assert_eq!(request.event.raw(), 0x5c);
        assert!(request.subtree);
        assert!(!request.asynchronous);

        match t.ram.width() {
            Width::W32 => {
                let raw: IoStatusBlock32 = t.ram.read(iosb).unwrap();
                assert_eq!(raw.status, 0);
                assert_eq!(raw.information, 0);
            }
            Width::W64 => {
                let raw: IoStatusBlock64 = t.ram.read(iosb).unwrap();
                assert_eq!(Status::from_slot(raw.status), Status::SUCCESS);
                assert_eq!(raw.information, 0);
            }
        }
    });
}

#[test]
fn an_asynchronous_watch_leaves_the_status_block_alone() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Watched");
        let iosb = t.ram.alloc(16, 8);
        t.ram.write(iosb, &u64::MAX).unwrap();
        let status = t.notify_change_key(
            key,
            Handle::NULL,
            GuestPtr::NULL,
            GuestPtr::NULL,
            iosb,
            NotifyFilter::NAME,
            false,
            GuestPtr::NULL,
            0,
            true,
        );
        assert_eq!(status, Status::PENDING);
        // Completion belongs to the emulator core later; nothing is written
        // now.
        assert_eq!(t.ram.read::<u64>(iosb).unwrap(), u64::MAX);
    });
}

#[test]
fn apc_slots_stay_guest_addresses() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Watched");
        let iosb = t.ram.alloc(16, 8);
        let status = t.notify_change_key(
            key,
            Handle::NULL,
            GuestPtr::new(0x7700_1234),
            GuestPtr::new(0x7700_5678),
            iosb,
            NotifyFilter::ATTRIBUTES,
            false,
            GuestPtr::new(0x7700_9000),
            0x80,
            true,
        );
        assert_eq!(status, Status::PENDING);
        let request = t.registry.last_notify.unwrap();
        assert_eq!(request.apc_routine.raw(), 0x7700_1234);
        assert_eq!(request.apc_context.raw(), 0x7700_5678);
        assert_eq!(request.buffer.raw(), 0x7700_9000);
        assert_eq!(request.length, 0x80);
    });
}

#[test]
fn multiple_keys_degenerates_to_a_single_watch() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Watched");
        let iosb = t.ram.alloc(16, 8);
        let status = t.notify_change_multiple_keys(
            key,
            0,
            GuestPtr::NULL,
            Handle::NULL,
            GuestPtr::NULL,
            GuestPtr::NULL,
            iosb,
            NotifyFilter::LAST_SET,
            false,
            GuestPtr::NULL,
            0,
            false,
        );
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(t.registry.last_notify.unwrap().filter, NotifyFilter::LAST_SET);

        // With subordinates the backend refuses the fan-out.
        let subordinate = t
            .ram
            .put_object_attributes(Handle::NULL, "\\Registry\\Machine\\Other");
        let status = t.notify_change_multiple_keys(
            key,
            1,
            subordinate,
            Handle::NULL,
            GuestPtr::NULL,
            GuestPtr::NULL,
            iosb,
            NotifyFilter::LAST_SET,
            false,
            GuestPtr::NULL,
            0,
            false,
        );
        assert_eq!(status, Status::NOT_IMPLEMENTED);
    });
}
