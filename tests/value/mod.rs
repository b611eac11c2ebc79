// SPDX-License-Identifier: Apache-2.0

//! Value calls, the multiple-value query included.

use std::mem::size_of;

use super::{run_both, wide, TestHandler};

use hiveport::guest::Handler;
use hiveport::nt::{
    KeyValueBasicHeader, KeyValueEntry32, KeyValueEntry64, KeyValueInfo, KeyValuePartialHeader,
    REG_BINARY, REG_DWORD, REG_SZ,
};
use hiveport::{GuestMemory, GuestPtr, Status, Width};

#[test]
fn set_then_query_round_trips_data() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Software\\Values");
        let payload = wide("C:\\hive");
        let name = t.ram.put_unicode_string("Path", 0);
        let data = t.ram.put_bytes(&payload);
        let status = t.set_value_key(key, name, 0, REG_SZ, data, payload.len() as u32);
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(
            t.registry
                .value_of("\\Registry\\Machine\\Software\\Values", "Path"),
            Some((REG_SZ, payload.clone()))
        );

        let info = t.ram.alloc(0x60, 8);
        let result_len = t.ram.alloc(4, 4);
        let status = t.query_value_key(
            key,
            name,
            KeyValueInfo::Partial as u32,
            info,
            0x60,
            result_len,
        );
        assert_eq!(status, Status::SUCCESS);
        let header: KeyValuePartialHeader = t.ram.read(info).unwrap();
        assert_eq!(header.value_type, REG_SZ);
        assert_eq!(header.data_length as usize, payload.len());
        let at = GuestPtr::new(info.raw() + size_of::<KeyValuePartialHeader>() as u64);
        assert_eq!(t.ram.bytes(at, payload.len()).unwrap(), payload);
        assert_eq!(
            t.ram.read::<u32>(result_len).unwrap() as usize,
            size_of::<KeyValuePartialHeader>() + payload.len()
        );
    });
}

#[test]
fn a_null_name_addresses_the_default_value() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Software\\Default");
        let data = t.ram.put_bytes(&7u32.to_ne_bytes());
        assert_eq!(
            t.set_value_key(key, GuestPtr::NULL, 0, REG_DWORD, data, 4),
            Status::SUCCESS
        );
        assert_eq!(
            t.registry
                .value_of("\\Registry\\Machine\\Software\\Default", ""),
            Some((REG_DWORD, 7u32.to_ne_bytes().to_vec()))
        );
    });
}

#[test]
fn query_rejects_unknowns() {
    run_both(|t| {
        let key = t.make_key("\\Registry\\Machine\\Software\\Empty");
        let name = t.ram.put_unicode_string("Absent", 0);
        let info = t.ram.alloc(0x40, 8);
        assert_eq!(
            t.query_value_key(
                key,
                name,
                KeyValueInfo::Partial as u32,
                info,
                0x40,
                GuestPtr::NULL,
            ),
            Status::OBJECT_NAME_NOT_FOUND
        );
        assert_eq!(
            t.query_value_key(key, name, 9, info, 0x40, GuestPtr::NULL),
            Status::INVALID_PARAMETER
        );
    });
}

#[test]
fn a_short_buffer_reports_the_required_length() {
    run_both(|t| {
        let path = "\\Registry\\Machine\\Software\\Short";
        let key = t.make_key(path);
        t.registry.seed_value(path, "Blob", REG_BINARY, &[0xa5; 8]);

        let name = t.ram.put_unicode_string("Blob", 0);
        let info = t.ram.alloc(0x40, 8);
        let result_len = t.ram.alloc(4, 4);
        let status = t.query_value_key(
            key,
            name,
            KeyValueInfo::Partial as u32,
            info,
            16,
            result_len,
        );
        assert_eq!(status, Status::BUFFER_OVERFLOW);
        assert_eq!(
            t.ram.read::<u32>(result_len).unwrap() as usize,
            size_of::<KeyValuePartialHeader>() + 8
        );
    });
}

#[test]
fn enumerate_walks_values_by_index() {
    run_both(|t| {
        let path = "\\Registry\\Machine\\Software\\Listy";
        let key = t.make_key(path);
        t.registry.seed_value(path, "First", REG_DWORD, &1u32.to_ne_bytes());
        t.registry.seed_value(path, "Second", REG_DWORD, &2u32.to_ne_bytes());

        let info = t.ram.alloc(0x40, 8);
        let result_len = t.ram.alloc(4, 4);
        for (index, name) in ["First", "Second"].into_iter().enumerate() {
            let status = t.enumerate_value_key(
                key,
                index as u32,
                KeyValueInfo::Basic as u32,
                info,
                0x40,
                result_len,
            );
            assert_eq!(status, Status::SUCCESS);
            let header: KeyValueBasicHeader = t.ram.read(info).unwrap();
            assert_eq!(header.name_length as usize, name.len() * 2);
            let at = GuestPtr::new(info.raw() + size_of::<KeyValueBasicHeader>() as u64);
            assert_eq!(t.ram.bytes(at, name.len() * 2).unwrap(), wide(name));
        }
        assert_eq!(
            t.enumerate_value_key(key, 2, KeyValueInfo::Basic as u32, info, 0x40, result_len),
            Status::NO_MORE_ENTRIES
        );
    });
}

#[test]
fn delete_removes_a_value() {
    run_both(|t| {
        let path = "\\Registry\\Machine\\Software\\Prunable";
        let key = t.make_key(path);
        t.registry.seed_value(path, "Stale", REG_DWORD, &[0; 4]);
        let name = t.ram.put_unicode_string("Stale", 0);
        assert_eq!(t.delete_value_key(key, name), Status::SUCCESS);
        assert_eq!(t.registry.value_of(path, "Stale"), None);
        assert_eq!(t.delete_value_key(key, name), Status::OBJECT_NAME_NOT_FOUND);
    });
}

fn put_entries(t: &mut TestHandler, names: &[GuestPtr]) -> GuestPtr {
    match t.ram.width() {
        Width::W32 => {
            let stride = size_of::<KeyValueEntry32>();
            let at = t.ram.alloc(names.len() * stride, 4);
            for (index, name) in names.iter().enumerate() {
                t.ram
                    .write(
                        GuestPtr::new(at.raw() + (index * stride) as u64),
                        &KeyValueEntry32 {
                            value_name: name.raw() as u32,
                            data_length: 0,
                            data_offset: 0,
                            value_type: 0,
                        },
                    )
                    .unwrap();
            }
            at
        }
        Width::W64 => {
            let stride = size_of::<KeyValueEntry64>();
            let at = t.ram.alloc(names.len() * stride, 8);
            for (index, name) in names.iter().enumerate() {
                t.ram
                    .write(
                        GuestPtr::new(at.raw() + (index * stride) as u64),
                        &KeyValueEntry64 {
                            value_name: name.raw(),
                            data_length: 0,
                            data_offset: 0,
                            value_type: 0,
                            pad: [0; 4],
                        },
                    )
                    .unwrap();
            }
            at
        }
    }
}

/// Reads back the out-fields of entry `index`: length, offset, type.
fn entry_back(t: &TestHandler, entries: GuestPtr, index: usize) -> (u32, u32, u32) {
    match t.ram.width() {
        Width::W32 => {
            let at = GuestPtr::new(entries.raw() + (index * size_of::<KeyValueEntry32>()) as u64);
            let raw: KeyValueEntry32 = t.ram.read(at).unwrap();
            (raw.data_length, raw.data_offset, raw.value_type)
        }
        Width::W64 => {
            let at = GuestPtr::new(entries.raw() + (index * size_of::<KeyValueEntry64>()) as u64);
            let raw: KeyValueEntry64 = t.ram.read(at).unwrap();
            (raw.data_length, raw.data_offset, raw.value_type)
        }
    }
}

#[test]
fn multiple_values_pack_into_one_buffer() {
    run_both(|t| {
        let path = "\\Registry\\Machine\\Software\\Multi";
        let key = t.make_key(path);
        t.registry.seed_value(path, "Ver", REG_DWORD, &9u32.to_ne_bytes());
        t.registry.seed_value(path, "Tag", REG_BINARY, &[1, 2, 3, 4, 5, 6]);

        let ver = t.ram.put_unicode_string("Ver", 0);
        let tag = t.ram.put_unicode_string("Tag", 0);
        let entries = put_entries(t, &[ver, tag]);

        let buffer = t.ram.alloc(0x20, 8);
        let result_len = t.ram.alloc(4, 4);
        let status = t.query_multiple_value_key(key, entries, 2, buffer, 0x20, result_len);
        assert_eq!(status, Status::SUCCESS);

        // Entries come back with type, length and packed offsets filled in.
        assert_eq!(entry_back(t, entries, 0), (4, 0, REG_DWORD));
        assert_eq!(entry_back(t, entries, 1), (6, 4, REG_BINARY));
        assert_eq!(t.ram.bytes(buffer, 4).unwrap(), 9u32.to_ne_bytes());
        assert_eq!(
            t.ram.bytes(GuestPtr::new(buffer.raw() + 4), 6).unwrap(),
            [1, 2, 3, 4, 5, 6]
        );
        assert_eq!(t.ram.read::<u32>(result_len).unwrap(), 12);
    });
}

#[test]
fn multiple_values_fail_whole_on_a_missing_name() {
    run_both(|t| {
        let path = "\\Registry\\Machine\\Software\\Partial";
        let key = t.make_key(path);
        t.registry.seed_value(path, "Here", REG_DWORD, &[1, 0, 0, 0]);

        let here = t.ram.put_unicode_string("Here", 0);
        let gone = t.ram.put_unicode_string("Gone", 0);
        let entries = put_entries(t, &[here, gone]);
        let buffer = t.ram.alloc(0x20, 8);
        let status =
            t.query_multiple_value_key(key, entries, 2, buffer, 0x20, GuestPtr::NULL);
        assert_eq!(status, Status::OBJECT_NAME_NOT_FOUND);
        // Nothing was written back.
        assert_eq!(entry_back(t, entries, 0), (0, 0, 0));
    });
}

#[test]
fn license_values_cross_with_type_and_length() {
    run_both(|t| {
        t.registry
            .seed_license("Kernel-ProductInfo", REG_DWORD, &1u32.to_ne_bytes());
        let name = t.ram.put_unicode_string("Kernel-ProductInfo", 0);
        let result_type = t.ram.alloc(4, 4);
        let data = t.ram.alloc(4, 4);
        let result_len = t.ram.alloc(4, 4);

        let status = t.query_license_value(name, result_type, data, 4, result_len);
        assert_eq!(status, Status::SUCCESS);
        assert_eq!(t.ram.read::<u32>(result_type).unwrap(), REG_DWORD);
        assert_eq!(t.ram.read::<u32>(result_len).unwrap(), 4);
        assert_eq!(t.ram.read::<u32>(data).unwrap(), 1);

        // Too small still reports the type and required length.
        let status = t.query_license_value(name, result_type, data, 2, result_len);
        assert_eq!(status, Status::BUFFER_TOO_SMALL);
        assert_eq!(t.ram.read::<u32>(result_len).unwrap(), 4);

        let missing = t.ram.put_unicode_string("Kernel-MissingInfo", 0);
        let status = t.query_license_value(missing, result_type, data, 4, result_len);
        assert_eq!(status, Status::OBJECT_NAME_NOT_FOUND);
    });
}
