// SPDX-License-Identifier: Apache-2.0

//! The path-based convenience calls and legacy RTL doors.

use super::{run_both, wide, TestHandler, USER_PATH};

use hiveport::guest::Handler;
use hiveport::nt::{
    AccessMask, CreateOptions, REG_DWORD, REG_SZ, RTL_REGISTRY_ABSOLUTE, RTL_REGISTRY_HANDLE,
    RTL_REGISTRY_USER,
};
use hiveport::{GuestMemory, GuestPtr, Handle, Status, Width};

#[test]
fn the_legacy_doors_create_and_open() {
    run_both(|t| {
        let attr = t
            .ram
            .put_object_attributes(Handle::NULL, "\\Registry\\Machine\\Legacy");
        let cell = t.handle_cell();
        let status = t.rtl_create_key(
            cell,
            AccessMask::ALL_ACCESS,
            attr,
            0,
            GuestPtr::NULL,
            CreateOptions::empty(),
            GuestPtr::NULL,
        );
        assert_eq!(status, Status::SUCCESS);
        assert!(t.registry.key_exists("\\Registry\\Machine\\Legacy"));

        assert_eq!(t.rtl_open_key(cell, AccessMask::READ, attr), Status::SUCCESS);
        assert_eq!(
            t.registry.path_of(t.stored_handle(cell)),
            Some("\\Registry\\Machine\\Legacy")
        );
    });
}

#[test]
fn make_temporary_marks_the_key_volatile() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Software\\Fleeting");
        assert_eq!(t.rtl_make_temporary_key(key), Status::SUCCESS);
        assert!(t.registry.is_volatile("\\Registry\\Machine\\Software\\Fleeting"));
    });
}

#[test]
fn sub_key_names_come_back_through_the_descriptor() {
    run_both(|t| {
        let base = t.make_key("\\Registry\\Machine\\Software\\Base");
        t.make_key("\\Registry\\Machine\\Software\\Base\\Child");

        // The descriptor's length doubles as the capacity on the way in.
        let out = t.ram.put_unicode_string("xxxxxxxxxxxxxxxx", 0);
        assert_eq!(t.rtl_enumerate_sub_key(base, out, 0), Status::SUCCESS);
        assert_eq!(t.ram.read_string(out), "Child");
        assert_eq!(t.rtl_enumerate_sub_key(base, out, 1), Status::NO_MORE_ENTRIES);
    });
}

#[test]
fn a_cramped_descriptor_reports_the_required_length() {
    run_both(|t| {
        let base = t.make_key("\\Registry\\Machine\\Software\\Base");
        t.make_key("\\Registry\\Machine\\Software\\Base\\Considerable");

        let out = t.ram.put_unicode_string("xxx", 0);
        assert_eq!(t.rtl_enumerate_sub_key(base, out, 0), Status::BUFFER_TOO_SMALL);
        // The length cell reports what the name needs; the buffer is intact.
        assert_eq!(
            t.ram.read::<u16>(out).unwrap() as usize,
            "Considerable".len() * 2
        );
    });
}

#[test]
fn the_default_value_reads_back_raw() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Software\\Plain");
        let payload = wide("ready");
        let data = t.ram.put_bytes(&payload);
        assert_eq!(
            t.rtl_set_value_key(key, REG_SZ, data, payload.len() as u32),
            Status::SUCCESS
        );
        assert_eq!(
            t.registry.value_of("\\Registry\\Machine\\Software\\Plain", ""),
            Some((REG_SZ, payload.clone()))
        );

        let result_type = t.ram.alloc(4, 4);
        let dest = t.ram.alloc(0x20, 8);
        let result_len = t.ram.alloc(4, 4);
        t.ram.write(result_len, &0x20u32).unwrap();
        let status = t.rtl_query_value_key(key, result_type, dest, result_len, GuestPtr::NULL);
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(t.ram.read::<u32>(result_type).unwrap(), REG_SZ);
        assert_eq!(t.ram.read::<u32>(result_len).unwrap() as usize, payload.len());
        assert_eq!(t.ram.bytes(dest, payload.len()).unwrap(), payload);

        // A cramped destination still reports the type and value length.
        t.ram.write(result_len, &4u32).unwrap();
        let status = t.rtl_query_value_key(key, result_type, dest, result_len, GuestPtr::NULL);
        assert_eq!(status, Status::BUFFER_OVERFLOW);
        assert_eq!(t.ram.read::<u32>(result_type).unwrap(), REG_SZ);
        assert_eq!(t.ram.read::<u32>(result_len).unwrap() as usize, payload.len());
    });
}

#[test]
fn open_current_user_creates_the_profile_root() {
    run_both(|t| {
        let cell = t.handle_cell();
        assert_eq!(
            t.open_current_user(AccessMask::ALL_ACCESS, cell),
            Status::SUCCESS
        );
        let handle = t.stored_handle(cell);
        assert_eq!(t.registry.path_of(handle), Some(USER_PATH));
        assert!(t.registry.key_exists(USER_PATH));
    });
}

#[test]
fn the_user_path_formats_into_a_caller_descriptor() {
    run_both(|t| {
        let path = t.ram.put_string_buffer(0x60);
        assert_eq!(t.format_current_user_key_path(path), Status::SUCCESS);
        assert_eq!(t.ram.read_string(path), USER_PATH);

        let cramped = t.ram.put_string_buffer(8);
        assert_eq!(
            t.format_current_user_key_path(cramped),
            Status::BUFFER_TOO_SMALL
        );
        assert_eq!(
            t.ram.read::<u16>(cramped).unwrap() as usize,
            USER_PATH.len() * 2
        );
    });
}

#[test]
fn existence_checks_take_both_path_forms() {
    run_both(|t| {
        t.registry.seed_key("\\Registry\\Machine\\Software\\Present");
        let path = t.ram.put_wide_cstr("\\Registry\\Machine\\Software\\Present");
        assert_eq!(t.check_registry_key(RTL_REGISTRY_ABSOLUTE, path), Status::SUCCESS);

        let missing = t.ram.put_wide_cstr("\\Registry\\Machine\\Software\\Missing");
        assert_eq!(
            t.check_registry_key(RTL_REGISTRY_ABSOLUTE, missing),
            Status::OBJECT_NAME_NOT_FOUND
        );

        // With the handle bit the path argument carries an open handle.
        let key = t.make_key("\\Registry\\Machine\\Software\\Held");
        let status = t.check_registry_key(RTL_REGISTRY_HANDLE, GuestPtr::new(key.raw()));
        assert_eq!(status, Status::SUCCESS);
    });
}

#[test]
fn user_relative_paths_resolve_under_the_profile() {
    run_both(|t| {
        t.registry.seed_key(USER_PATH);
        t.registry.seed_key(&format!("{USER_PATH}\\Console"));
        let path = t.ram.put_wide_cstr("Console");
        assert_eq!(t.check_registry_key(RTL_REGISTRY_USER, path), Status::SUCCESS);
    });
}

#[test]
fn path_addressed_values_write_and_delete() {
    run_both(|t| {
        t.registry.seed_key("\\Registry\\Machine\\Software\\Roaming");
        let path = t.ram.put_wide_cstr("\\Registry\\Machine\\Software\\Roaming");
        let name = t.ram.put_wide_cstr("Level");
        let data = t.ram.put_bytes(&5u32.to_ne_bytes());

        let status =
            t.write_registry_value(RTL_REGISTRY_ABSOLUTE, path, name, REG_DWORD, data, 4);
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(
            t.registry
                .value_of("\\Registry\\Machine\\Software\\Roaming", "Level"),
            Some((REG_DWORD, 5u32.to_ne_bytes().to_vec()))
        );

        assert_eq!(
            t.delete_registry_value(RTL_REGISTRY_ABSOLUTE, path, name),
            Status::SUCCESS
        );
        assert_eq!(
            t.registry
                .value_of("\\Registry\\Machine\\Software\\Roaming", "Level"),
            None
        );
    });
}

#[test]
fn a_narrow_guest_can_pass_a_handle_as_the_path() {
    let mut t = TestHandler::new(Width::W32);
    let key = t.make_key("\\Registry\\Machine\\Software\\Held");
    // The handle travels through the 32-bit path slot and widens on arrival.
    let status = t.check_registry_key(RTL_REGISTRY_HANDLE, GuestPtr::new(key.raw()));
    assert_eq!(status, Status::SUCCESS);
}

#[test]
fn query_tables_are_refused() {
    run_both(|t| {
        t.registry.seed_key("\\Registry\\Machine\\Software");
        let path = t.ram.put_wide_cstr("\\Registry\\Machine\\Software");
        let table = t.ram.alloc(0x40, 8);
        let status = t.query_registry_values(
            RTL_REGISTRY_ABSOLUTE,
            path,
            table,
            GuestPtr::NULL,
            GuestPtr::NULL,
        );
        assert_eq!(status, Status::NOT_IMPLEMENTED);
    });
}
