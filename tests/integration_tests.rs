//! Integration tests for affs-edit, built against hand-assembled ADF
//! fixtures rather than real disk captures.

use affs_edit::*;
use chrono::{TimeZone, Utc};

/// Build a blank DD image, stamp the boot block for `fs_type`, and hand-
/// assemble a minimal but fully self-consistent root + bitmap pair at
/// blocks 880/881 (root block number for a DD floppy is `num_sectors /
/// 2`, matching `Volume::root_block`).
fn setup_volume(fs_type: FsType) -> Volume {
    setup_volume_with_clock(fs_type, Box::new(SystemClock))
}

fn setup_volume_with_clock(fs_type: FsType, clock: Box<dyn Clock>) -> Volume {
    // Lets `RUST_LOG=debug cargo test -- --nocapture` surface the
    // mutation trace emitted by `makedir`/`delete`.
    let _ = env_logger::try_init();

    let image = Image::new(true);
    let mut volume = Volume::with_clock(image, clock);
    volume.initialize(fs_type, false, false).unwrap();

    let root = volume.root_block();
    let bitmap_block_num = root.block() + 1;

    {
        let img = volume.image_mut();
        let mut sec = img.sector_mut(root.block()).unwrap();
        sec.set_i32_at(HDR_PRIMARY_TYPE, T_HEADER).unwrap();
        // Unlike directory/file headers, a root block's `header_key` is
        // unused and conventionally 0, not a self-reference.
        sec.set_u32_at(HDR_HEADER_KEY, 0).unwrap();
        sec.set_u32_at(HDR_HASHTABLE_SIZE, HASH_TABLE_SIZE as u32).unwrap();
        sec.set_i32_at(BLOCK_SIZE - HDR_SEC_TYPE_NEG, ST_ROOT).unwrap();
    }
    root.header.set_name(volume.image_mut(), "Workbench").unwrap();
    root.set_bitmap_flag(volume.image_mut(), BM_VALID).unwrap();
    root.set_bitmap_page0(volume.image_mut(), bitmap_block_num).unwrap();

    // Mark every bit free, then carve out the two blocks this fixture
    // already uses (root + bitmap itself).
    {
        let mut sec = volume.image_mut().sector_mut(bitmap_block_num).unwrap();
        for word in 0..((BLOCK_SIZE - 4) / 4) {
            sec.set_u32_at(4 + word * 4, 0xFFFF_FFFF).unwrap();
        }
    }
    let bitmap = BitmapBlock::new(bitmap_block_num);
    bitmap.mark_block_used(volume.image_mut(), root.block()).unwrap();
    bitmap.mark_block_used(volume.image_mut(), bitmap_block_num).unwrap();

    root.header.update_checksum(volume.image_mut()).unwrap();
    volume
}

fn frozen_volume(fs_type: FsType, at: chrono::DateTime<Utc>) -> Volume {
    setup_volume_with_clock(fs_type, Box::new(FrozenClock(at)))
}

#[test]
fn uninitialized_image_has_no_filesystem() {
    let volume = Volume::new(Image::new(true));
    assert!(matches!(volume.filesystem_type(), Err(AffsError::NotDos)));
}

#[test]
fn uninitialized_volume_root_primary_type_reads_zero() {
    let image = Image::new(true);
    let root = RootBlock::new(image.num_sectors() / 2);
    assert!(!affs_edit::block::boot::is_dos(&image));
    assert_eq!(root.header.primary_type(&image).unwrap(), 0);
}

/// Hand-assembles a "Workbench1.3"-shaped OFS fixture and checks every
/// pinned field/value.
#[test]
fn workbench_fixture_pinned_fields() {
    let at = Utc.with_ymd_and_hms(1989, 8, 17, 18, 21, 31).unwrap();
    let mut volume = frozen_volume(FsType::Ofs, at);
    let root = volume.root_block();

    root.header.set_name(volume.image_mut(), "Workbench1.3").unwrap();
    root.header.update_last_modification_time(volume.image_mut(), &FrozenClock(at)).unwrap();
    root.header.update_checksum(volume.image_mut()).unwrap();

    assert_eq!(volume.filesystem_type().unwrap(), FsType::Ofs);
    assert_eq!(
        affs_edit::boot_checksum(volume.image().image_bytes()),
        affs_edit::read_u32_be(volume.image().image_bytes(), 4)
    );
    assert_eq!(root.header.primary_type(volume.image()).unwrap(), T_HEADER);
    assert_eq!(root.header.secondary_type(volume.image()).unwrap(), ST_ROOT);
    assert_eq!(root.header.header_key(volume.image()).unwrap(), 0);
    assert_eq!(root.name(volume.image()).unwrap(), "Workbench1.3");
    assert_eq!(root.header.last_modification_time(volume.image()).unwrap(), AmigaTime::from_datetime(at));
    assert_eq!(root.header.hashtable_size(volume.image()).unwrap(), 0x48);
    assert!(root.bitmap_valid(volume.image()).unwrap());
    assert_eq!(
        root.header.stored_checksum(volume.image()).unwrap(),
        root.header.computed_checksum(volume.image()).unwrap()
    );

    // Scenario 4: allocating the first free block removes it from the
    // free list and leaves the bitmap self-consistent.
    let (free0, _used0) = root.block_allocation(volume.image()).unwrap();
    root.allocate_block(volume.image_mut(), free0[0]).unwrap();
    let (free1, _used1) = root.block_allocation(volume.image()).unwrap();
    assert!(!free1.contains(&free0[0]));
    let bitmap = root.bitmap_block0(volume.image()).unwrap();
    assert_eq!(
        bitmap.stored_checksum(volume.image()).unwrap(),
        bitmap.computed_checksum(volume.image()).unwrap()
    );
}

#[test]
fn setup_fixture_is_internally_consistent() {
    let volume = setup_volume(FsType::Ffs);
    let root = volume.root_block();
    assert_eq!(volume.filesystem_type().unwrap(), FsType::Ffs);
    assert!(root.bitmap_valid(volume.image()).unwrap());
    assert_eq!(
        root.header.stored_checksum(volume.image()).unwrap(),
        root.header.computed_checksum(volume.image()).unwrap()
    );
    let bitmap = root.bitmap_block0(volume.image()).unwrap();
    assert_eq!(
        bitmap.stored_checksum(volume.image()).unwrap(),
        bitmap.computed_checksum(volume.image()).unwrap()
    );
    assert_eq!(root.name(volume.image()).unwrap(), "Workbench");
    assert!(volume.list_dir(root.header).unwrap().is_empty());
}

#[test]
fn makedir_creates_entry_and_refreshes_checksums() {
    let mut volume = setup_volume(FsType::Ffs);
    let block = volume.makedir("Tools").unwrap();

    let root = volume.root_block();
    let entries = volume.list_dir(root.header).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Tools");
    assert_eq!(entries[0].block, block);
    assert!(entries[0].is_directory);

    let dir = HeaderBlock::new(block);
    assert!(dir.is_directory(volume.image()).unwrap());
    assert_eq!(dir.parent(volume.image()).unwrap(), root.block());
    assert_eq!(
        dir.stored_checksum(volume.image()).unwrap(),
        dir.computed_checksum(volume.image()).unwrap()
    );
    assert_eq!(
        root.header.stored_checksum(volume.image()).unwrap(),
        root.header.computed_checksum(volume.image()).unwrap()
    );

    let bitmap = root.bitmap_block0(volume.image()).unwrap();
    assert!(!bitmap.is_free(volume.image(), block).unwrap());
}

#[test]
fn makedir_nested_path_resolves_through_parent() {
    let mut volume = setup_volume(FsType::Ffs);
    volume.makedir("Tools").unwrap();
    let inner = volume.makedir("Tools/Editors").unwrap();

    let resolved = volume.header_for_path("Tools/Editors").unwrap();
    assert_eq!(resolved.block, inner);
    assert_eq!(resolved.name(volume.image()).unwrap(), "Editors");
}

#[test]
fn makedir_missing_parent_is_not_found() {
    let mut volume = setup_volume(FsType::Ffs);
    let err = volume.makedir("Missing/Child").unwrap_err();
    assert!(matches!(err, AffsError::NotFound(_)));
}

#[test]
fn makedir_root_path_is_invalid_argument() {
    let mut volume = setup_volume(FsType::Ffs);
    assert!(matches!(volume.makedir("/"), Err(AffsError::InvalidArgument(_))));
}

#[test]
fn makedir_stamps_timestamps_from_injected_clock() {
    let at = Utc.with_ymd_and_hms(2023, 11, 26, 11, 32, 0).unwrap();
    let mut volume = frozen_volume(FsType::Ffs, at);
    let block = volume.makedir("Tools").unwrap();

    let dir = HeaderBlock::new(block);
    assert_eq!(dir.last_modification_time(volume.image()).unwrap(), AmigaTime::new(16765, 692, 0));

    let root = volume.root_block();
    assert_eq!(
        root.last_disk_modification_time(volume.image()).unwrap(),
        AmigaTime::new(16765, 692, 0)
    );
}

#[test]
fn delete_removes_entry_and_frees_block() {
    let mut volume = setup_volume(FsType::Ffs);
    let block = volume.makedir("Tools").unwrap();
    volume.delete("Tools", false).unwrap();

    let root = volume.root_block();
    assert!(volume.list_dir(root.header).unwrap().is_empty());
    assert!(matches!(volume.header_for_path("Tools"), Err(AffsError::NotFound(_))));

    let bitmap = root.bitmap_block0(volume.image()).unwrap();
    assert!(bitmap.is_free(volume.image(), block).unwrap());
}

#[test]
fn delete_non_empty_directory_requires_recursive() {
    let mut volume = setup_volume(FsType::Ffs);
    volume.makedir("Tools").unwrap();
    volume.makedir("Tools/Editors").unwrap();

    assert!(matches!(volume.delete("Tools", false), Err(AffsError::DirNotEmpty)));
}

#[test]
fn delete_recursive_on_non_empty_directory_is_unimplemented() {
    let mut volume = setup_volume(FsType::Ffs);
    volume.makedir("Tools").unwrap();
    volume.makedir("Tools/Editors").unwrap();

    assert!(matches!(volume.delete("Tools", true), Err(AffsError::Unimplemented(_))));
}

#[test]
fn delete_empty_directory_with_recursive_true_still_succeeds() {
    let mut volume = setup_volume(FsType::Ffs);
    volume.makedir("Tools").unwrap();
    assert!(volume.delete("Tools", true).is_ok());
}

#[test]
fn makedir_then_delete_then_makedir_reuses_freed_block() {
    let mut volume = setup_volume(FsType::Ffs);
    let first = volume.makedir("Tools").unwrap();
    volume.delete("Tools", false).unwrap();
    let second = volume.makedir("Utilities").unwrap();
    assert_eq!(first, second);
}

#[test]
fn two_entries_hashing_to_distinct_slots_coexist() {
    let mut volume = setup_volume(FsType::Ffs);
    volume.makedir("Tools").unwrap();
    volume.makedir("Devs").unwrap();

    let root = volume.root_block();
    let mut names: Vec<String> = volume.list_dir(root.header).unwrap().into_iter().map(|e| e.name).collect();
    names.sort();
    assert_eq!(names, vec!["Devs".to_string(), "Tools".to_string()]);
}

#[test]
fn hashtable_entry_out_of_range_on_non_root_directory() {
    let mut volume = setup_volume(FsType::Ffs);
    let block = volume.makedir("Tools").unwrap();
    let dir = HeaderBlock::new(block);
    assert_eq!(dir.hashtable_size(volume.image()).unwrap(), HASH_TABLE_SIZE);
    assert!(matches!(
        dir.hashtable_entry_at(volume.image(), HASH_TABLE_SIZE),
        Err(AffsError::OutOfRange)
    ));
}

#[test]
fn allocate_already_allocated_block_fails() {
    let mut volume = setup_volume(FsType::Ffs);
    let root = volume.root_block();
    let (free, _used) = root.block_allocation(volume.image()).unwrap();
    let candidate = free[0];
    root.allocate_block(volume.image_mut(), candidate).unwrap();
    assert!(matches!(
        root.allocate_block(volume.image_mut(), candidate),
        Err(AffsError::AlreadyAllocated(_))
    ));
}

#[test]
fn block_allocation_excludes_root_and_bitmap() {
    let volume = setup_volume(FsType::Ffs);
    let root = volume.root_block();
    let (_free, used) = root.block_allocation(volume.image()).unwrap();
    assert!(used.contains(&root.block()));
    assert!(used.contains(&(root.block() + 1)));
}

#[test]
fn name_exceeding_max_len_is_rejected() {
    let mut image = Image::new(true);
    let header = HeaderBlock::new(10);
    let too_long = "a".repeat(MAX_NAME_LEN + 1);
    assert!(matches!(
        header.set_name(&mut image, &too_long),
        Err(AffsError::InvalidArgument(_))
    ));
    let exact = "a".repeat(MAX_NAME_LEN);
    assert!(header.set_name(&mut image, &exact).is_ok());
    assert_eq!(header.name(&image).unwrap(), exact);
}

/// Hand-assembles a file header and a chain of OFS data blocks, links
/// the header into the root's hash table, and reads it back through
/// `Volume::file_data`.
#[test]
fn file_data_assembles_ofs_data_blocks() {
    let mut volume = setup_volume(FsType::Ofs);
    let root = volume.root_block();

    let file_block = 10u32;
    let data_block = 11u32;
    let payload = b"hello, amiga";

    {
        let img = volume.image_mut();
        {
            let mut sec = img.sector_mut(file_block).unwrap();
            sec.set_i32_at(HDR_PRIMARY_TYPE, T_HEADER).unwrap();
            sec.set_u32_at(HDR_HEADER_KEY, file_block).unwrap();
            sec.set_u32_at(HDR_HIGH_SEQ, 1).unwrap();
            sec.set_u32_at(BLOCK_SIZE - HDR_FILE_DATABLK_NEG, data_block).unwrap();
            sec.set_u32_at(BLOCK_SIZE - HDR_FILE_SIZE_NEG, payload.len() as u32).unwrap();
            sec.set_i32_at(BLOCK_SIZE - HDR_SEC_TYPE_NEG, ST_FILE).unwrap();
        }
        let header = HeaderBlock::new(file_block);
        header.set_name(img, "greeting").unwrap();
        header.set_parent(img, root.block()).unwrap();
        header.update_checksum(img).unwrap();

        {
            let mut sec = img.sector_mut(data_block).unwrap();
            sec.set_u32_at(0, T_DATA as u32).unwrap();
            sec.set_u32_at(4, file_block).unwrap();
            sec.set_u32_at(8, 1).unwrap();
            sec.set_u32_at(12, payload.len() as u32).unwrap();
            sec.set_bytes_at(OFS_DATA_HEADER_SIZE, payload).unwrap();
        }
    }

    let idx = hash_name_512(b"greeting");
    root.header.append_hashtable_entry_at(volume.image_mut(), idx, file_block).unwrap();
    root.header.update_checksum(volume.image_mut()).unwrap();

    let data = volume.file_data("greeting").unwrap();
    assert_eq!(&data, payload);
}

#[test]
fn file_data_on_a_directory_is_wrong_role() {
    let mut volume = setup_volume(FsType::Ffs);
    volume.makedir("Tools").unwrap();
    assert!(matches!(volume.file_data("Tools"), Err(AffsError::WrongRole(_, _))));
}

#[test]
fn image_roundtrip_preserves_bytes_when_untouched() {
    let volume = setup_volume(FsType::Ffs);
    let bytes = volume.image().image_bytes().to_vec();
    let reloaded = Image::from_bytes(bytes.clone()).unwrap();
    assert_eq!(reloaded.image_bytes(), bytes.as_slice());
}

#[test]
fn boot_checksum_self_consistent_after_initialize() {
    let volume = setup_volume(FsType::Ofs);
    assert_eq!(volume.filesystem_type().unwrap(), FsType::Ofs);
}
