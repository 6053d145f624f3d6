//! Layout constants for the ADF block formats.

/// Logical block size in bytes (floppy ADF images only).
pub const BLOCK_SIZE: usize = 512;

/// Boot block size in bytes (checksum covers this span).
pub const BOOT_BLOCK_SIZE: usize = 1024;

/// Hash table size (entries per non-root header block).
pub const HASH_TABLE_SIZE: usize = 72;

/// Maximum data block pointers per file header.
pub const MAX_DATABLK: usize = 72;

/// Maximum filename length in bytes.
pub const MAX_NAME_LEN: usize = 30;

/// Maximum comment length in bytes.
pub const MAX_COMMENT_LEN: usize = 79;

/// Bitmap pages listed in the root block.
pub const BM_PAGES_ROOT_SIZE: usize = 25;

/// Standard DD floppy sector count (880 KiB).
pub const FLOPPY_DD_SECTORS: u32 = 1760;

/// Standard HD floppy sector count (1.76 MiB).
pub const FLOPPY_HD_SECTORS: u32 = 3520;

/// DD image size in bytes.
pub const DD_IMAGE_SIZE: usize = FLOPPY_DD_SECTORS as usize * BLOCK_SIZE;

/// HD image size in bytes.
pub const HD_IMAGE_SIZE: usize = FLOPPY_HD_SECTORS as usize * BLOCK_SIZE;

/// Blocks reserved at the start of every image (boot block spans these).
pub const RESERVED_BLOCKS: u32 = 2;

// Filesystem type flag (byte 3 of the boot block).
/// Original File System.
pub const DOSFS_OFS: u8 = 0;
/// Fast File System.
pub const DOSFS_FFS: u8 = 1;
/// International mode (case-insensitive hash for accented characters).
pub const DOSFS_INTL: u8 = 2;
/// Directory cache mode (implies international).
pub const DOSFS_DIRCACHE: u8 = 4;

// Primary block types.
/// Header block primary type (root, directory, or file).
pub const T_HEADER: i32 = 2;
/// Data block primary type (OFS only).
pub const T_DATA: i32 = 8;

// Secondary types (stored at block_size - 4).
/// Root block secondary type.
pub const ST_ROOT: i32 = 1;
/// Directory secondary type.
pub const ST_DIR: i32 = 2;
/// Soft link secondary type.
pub const ST_LSOFT: i32 = 3;
/// Hard link to directory secondary type.
pub const ST_LDIR: i32 = 4;
/// File secondary type.
pub const ST_FILE: i32 = -3;
/// Hard link to file secondary type.
pub const ST_LFILE: i32 = -4;

/// Value of the root block's `bitmap_flag` when the bitmap is authoritative.
pub const BM_VALID: i32 = -1;

/// OFS data block payload size (488 B after the 24 B header).
pub const OFS_DATA_SIZE: usize = 488;

/// FFS data block payload size (the full 512 B block).
pub const FFS_DATA_SIZE: usize = BLOCK_SIZE;

// Header block field offsets, measured from the start of the block.
/// `primary_type` field offset.
pub const HDR_PRIMARY_TYPE: usize = 0;
/// `header_key` field offset.
pub const HDR_HEADER_KEY: usize = 4;
/// `high_seq` field offset.
pub const HDR_HIGH_SEQ: usize = 8;
/// `hashtable_size` field offset (root only).
pub const HDR_HASHTABLE_SIZE: usize = 12;
/// `first_data` field offset (files only).
pub const HDR_FIRST_DATA: usize = 16;
/// `checksum` field offset.
pub const HDR_CHECKSUM: usize = 20;
/// First hash table slot offset.
pub const HDR_HASHTABLE: usize = 24;

// Header block field offsets, measured from the end of the block (negative).
/// `bitmap_flag` offset from end (root).
pub const HDR_BITMAP_FLAG_NEG: usize = 200;
/// `bitmap_pages[0]` offset from end (root).
pub const HDR_BITMAP_PAGES_NEG: usize = 196;
/// File size (`byte_size`) offset from end (files).
pub const HDR_FILE_SIZE_NEG: usize = 188;
/// First file data-block pointer offset from end (files; descending order).
pub const HDR_FILE_DATABLK_NEG: usize = 204;
/// Comment length byte offset from end.
pub const HDR_COMMENT_LEN_NEG: usize = 184;
/// Last modification time offset from end (3 x u32).
pub const HDR_LAST_MOD_TIME_NEG: usize = 92;
/// `name_len` byte offset from end.
pub const HDR_NAME_LEN_NEG: usize = 80;
/// Last disk modification time offset from end (root, 3 x u32).
pub const HDR_DISK_MOD_TIME_NEG: usize = 40;
/// Filesystem creation time offset from end (root, 3 x u32).
pub const HDR_FS_CREATION_TIME_NEG: usize = 28;
/// `next_hash` field offset from end.
pub const HDR_NEXT_HASH_NEG: usize = 16;
/// `parent` field offset from end.
pub const HDR_PARENT_NEG: usize = 12;
/// `ext` field offset from end.
pub const HDR_EXT_NEG: usize = 8;
/// `secondary_type` field offset from end.
pub const HDR_SEC_TYPE_NEG: usize = 4;

/// OFS data block header size (24 B) preceding the payload.
pub const OFS_DATA_HEADER_SIZE: usize = 24;
