// SPDX-License-Identifier: Apache-2.0

//! Hive maintenance calls. The fake backend records the converted arguments,
//! so these tests pin down exactly what crosses the boundary.

use super::{run_both, TestHandler};

use hiveport::guest::Handler;
use hiveport::nt::{REG_FORCE_RESTORE, REG_REFRESH_HIVE};
use hiveport::{Handle, Status, Width};

#[test]
fn load_converts_both_attribute_blocks() {
    run_both(|t| {
        let subkey = t
            .ram
            .put_object_attributes(Handle::NULL, "\\Registry\\Machine\\Mounted");
        let file = t
            .ram
            .put_object_attributes(Handle::NULL, "\\??\\C:\\hives\\mounted.dat");
        assert_eq!(t.load_key(subkey, file), Status::SUCCESS);
        assert_eq!(
            t.registry.log,
            ["load \\Registry\\Machine\\Mounted from \\??\\C:\\hives\\mounted.dat flags 0x0"]
        );
    });
}

#[test]
fn load_with_flags_carries_them() {
    run_both(|t| {
        let subkey = t
            .ram
            .put_object_attributes(Handle::NULL, "\\Registry\\Machine\\Mounted");
        let file = t
            .ram
            .put_object_attributes(Handle::NULL, "\\??\\C:\\hives\\mounted.dat");
        assert_eq!(t.load_key2(subkey, file, REG_REFRESH_HIVE), Status::SUCCESS);
        assert_eq!(
            t.registry.log,
            ["load \\Registry\\Machine\\Mounted from \\??\\C:\\hives\\mounted.dat flags 0x2"]
        );
    });
}

#[test]
fn save_restore_replace_pass_handles_and_flags() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\System");
        let file = Handle::from_raw(0x1c);
        assert_eq!(t.save_key(key, file), Status::SUCCESS);
        assert_eq!(t.restore_key(key, file, REG_FORCE_RESTORE), Status::SUCCESS);

        let new_file = t
            .ram
            .put_object_attributes(Handle::NULL, "\\??\\C:\\hives\\new.dat");
        let old_file = t
            .ram
            .put_object_attributes(Handle::NULL, "\\??\\C:\\hives\\old.dat");
        assert_eq!(t.replace_key(new_file, key, old_file), Status::SUCCESS);

        assert_eq!(
            t.registry.log,
            [
                "save \\Registry\\Machine\\System to file 0x1c",
                "restore \\Registry\\Machine\\System from file 0x1c flags 0x8",
                "replace \\Registry\\Machine\\System with \\??\\C:\\hives\\new.dat \
                 keeping \\??\\C:\\hives\\old.dat",
            ]
        );
    });
}

#[test]
fn unload_retires_the_mounted_key() {
    run_both(|t| {
        t.registry.seed_key("\\Registry\\Machine\\Mounted");
        let subkey = t
            .ram
            .put_object_attributes(Handle::NULL, "\\Registry\\Machine\\Mounted");
        assert_eq!(t.unload_key(subkey), Status::SUCCESS);
        assert!(!t.registry.key_exists("\\Registry\\Machine\\Mounted"));
        assert_eq!(t.unload_key(subkey), Status::OBJECT_NAME_NOT_FOUND);
    });
}

#[test]
fn a_narrow_guest_widens_file_handles() {
    let mut t = TestHandler::new(Width::W32);
    let key = t.make_key("\\Registry\\Machine\\System");
    // The 32-bit handle sign-extends before it reaches the backend.
    let file = Handle::from_guest32(0xffff_fff7);
    assert_eq!(t.save_key(key, file), Status::SUCCESS);
    assert_eq!(
        t.registry.log,
        ["save \\Registry\\Machine\\System to file 0xfffffffffffffff7"]
    );
}
