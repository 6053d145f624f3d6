//! Field accessors and mutators shared by root, directory, and file
//! header blocks.
//!
//! A `HeaderBlock` is a thin handle around a block number; every
//! operation re-materializes a `Sector`/`SectorMut` from the `Image`
//! passed in, rather than holding a borrow across calls.
//! The root/directory/file role union is a runtime check on
//! `secondary_type`, not an inheritance hierarchy.

use crate::checksum::header_checksum;
use crate::constants::*;
use crate::date::{AmigaTime, Clock};
use crate::error::{AffsError, Result};
use crate::hash::{hash_name_512, names_equal};
use crate::image::Image;

const fn from_end(n: usize) -> usize {
    BLOCK_SIZE - n
}

/// A handle to a header block (root, directory, or file) identified by
/// its block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderBlock {
    /// The block number this handle addresses.
    pub block: u32,
}

impl HeaderBlock {
    /// Create a handle for `block`.
    #[inline]
    pub const fn new(block: u32) -> Self {
        Self { block }
    }

    /// `primary_type` field (offset 0; must be 2 for a valid header).
    pub fn primary_type(&self, image: &Image) -> Result<i32> {
        image.sector(self.block)?.i32_at(HDR_PRIMARY_TYPE)
    }

    /// `secondary_type` field (offset `block_size - 4`).
    pub fn secondary_type(&self, image: &Image) -> Result<i32> {
        image.sector(self.block)?.i32_at(from_end(HDR_SEC_TYPE_NEG))
    }

    /// `header_key` field (offset 4). Equal to `self.block` for
    /// directory/file headers; conventionally 0 and unused on the root
    /// block.
    pub fn header_key(&self, image: &Image) -> Result<u32> {
        image.sector(self.block)?.u32_at(HDR_HEADER_KEY)
    }

    /// `parent` field (offset `block_size - 12`).
    pub fn parent(&self, image: &Image) -> Result<u32> {
        image.sector(self.block)?.u32_at(from_end(HDR_PARENT_NEG))
    }

    /// Set the `parent` field.
    pub fn set_parent(&self, image: &mut Image, parent_block: u32) -> Result<()> {
        image
            .sector_mut(self.block)?
            .set_u32_at(from_end(HDR_PARENT_NEG), parent_block)
    }

    /// `next_hash` field (offset `block_size - 16`).
    pub fn next_hash(&self, image: &Image) -> Result<u32> {
        image.sector(self.block)?.u32_at(from_end(HDR_NEXT_HASH_NEG))
    }

    /// Set the `next_hash` field.
    pub fn set_next_hash(&self, image: &mut Image, next: u32) -> Result<()> {
        image
            .sector_mut(self.block)?
            .set_u32_at(from_end(HDR_NEXT_HASH_NEG), next)
    }

    /// Decode the entry name. Truncates silently if the stored
    /// `name_len` exceeds 30.
    pub fn name(&self, image: &Image) -> Result<String> {
        let sec = image.sector(self.block)?;
        let len = (sec.byte_at(from_end(HDR_NAME_LEN_NEG))? as usize).min(MAX_NAME_LEN);
        let start = from_end(HDR_NAME_LEN_NEG) + 1;
        let mut bytes = Vec::with_capacity(len);
        for i in 0..len {
            bytes.push(sec.byte_at(start + i)?);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the entry name. Names of exactly 30 bytes round-trip
    /// without truncation; 31 or more bytes is `InvalidArgument`.
    pub fn set_name(&self, image: &mut Image, name: &str) -> Result<()> {
        let bytes = name.as_bytes();
        if bytes.len() > MAX_NAME_LEN {
            return Err(AffsError::InvalidArgument(format!(
                "name {name:?} exceeds {MAX_NAME_LEN} bytes"
            )));
        }
        let mut sec = image.sector_mut(self.block)?;
        sec.set_byte_at(from_end(HDR_NAME_LEN_NEG), bytes.len() as u8)?;
        sec.set_bytes_at(from_end(HDR_NAME_LEN_NEG) + 1, bytes)
    }

    /// Decode the comment field (offset `block_size - 184`).
    pub fn comment(&self, image: &Image) -> Result<String> {
        let sec = image.sector(self.block)?;
        let len = (sec.byte_at(from_end(HDR_COMMENT_LEN_NEG))? as usize).min(MAX_COMMENT_LEN);
        let start = from_end(HDR_COMMENT_LEN_NEG) + 1;
        let mut bytes = Vec::with_capacity(len);
        for i in 0..len {
            bytes.push(sec.byte_at(start + i)?);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// `last_modification_time` (3 x u32 at offset `block_size - 92`).
    pub fn last_modification_time(&self, image: &Image) -> Result<AmigaTime> {
        let sec = image.sector(self.block)?;
        let base = from_end(HDR_LAST_MOD_TIME_NEG);
        Ok(AmigaTime::new(
            sec.u32_at(base)?,
            sec.u32_at(base + 4)?,
            sec.u32_at(base + 8)?,
        ))
    }

    /// Stamp `last_modification_time` with the current time from `clock`.
    pub fn update_last_modification_time(&self, image: &mut Image, clock: &dyn Clock) -> Result<()> {
        let t = AmigaTime::from_datetime(clock.now());
        let base = from_end(HDR_LAST_MOD_TIME_NEG);
        let mut sec = image.sector_mut(self.block)?;
        sec.set_u32_at(base, t.days)?;
        sec.set_u32_at(base + 4, t.mins)?;
        sec.set_u32_at(base + 8, t.ticks)
    }

    /// Number of hash-table slots: the stored value for the root block,
    /// or the constant 72 for every other header.
    pub fn hashtable_size(&self, image: &Image) -> Result<usize> {
        if self.secondary_type(image)? == ST_ROOT {
            Ok(image.sector(self.block)?.u32_at(HDR_HASHTABLE_SIZE)? as usize)
        } else {
            Ok(HASH_TABLE_SIZE)
        }
    }

    /// Read hash-table slot `i`. `i >= size` is `OutOfRange`.
    pub fn hashtable_entry_at(&self, image: &Image, i: usize) -> Result<u32> {
        if i >= self.hashtable_size(image)? {
            return Err(AffsError::OutOfRange);
        }
        image.sector(self.block)?.u32_at(HDR_HASHTABLE + i * 4)
    }

    fn set_hashtable_entry_at(&self, image: &mut Image, i: usize, value: u32) -> Result<()> {
        image
            .sector_mut(self.block)?
            .set_u32_at(HDR_HASHTABLE + i * 4, value)
    }

    /// Append `blocknum` to the hash chain rooted at slot `i`.
    ///
    /// If the slot is empty, `blocknum` is stored directly (this block's
    /// own checksum is refreshed). Otherwise the chain is walked via
    /// `next_hash` to its tail, whose `next_hash` is set to `blocknum`
    /// (the tail's own checksum is refreshed). `blocknum`'s `next_hash`
    /// is left as-is; callers must ensure a freshly initialized block
    /// already carries `next_hash == 0`.
    pub fn append_hashtable_entry_at(&self, image: &mut Image, i: usize, blocknum: u32) -> Result<()> {
        let head = self.hashtable_entry_at(image, i)?;
        if head == 0 {
            self.set_hashtable_entry_at(image, i, blocknum)?;
            self.update_checksum(image)?;
            return Ok(());
        }
        let mut current = HeaderBlock::new(head);
        loop {
            let next = current.next_hash(image)?;
            if next == 0 {
                break;
            }
            current = HeaderBlock::new(next);
        }
        current.set_next_hash(image, blocknum)?;
        current.update_checksum(image)
    }

    /// Unlink `blocknum` from the hash chain rooted at slot `i`.
    ///
    /// If `blocknum` is the slot's head, the slot is overwritten with
    /// `blocknum`'s `next_hash` and this block's checksum is refreshed.
    /// Otherwise the chain is walked tracking the previous block; the
    /// previous block's `next_hash` is rewritten to skip `blocknum` and
    /// its checksum is refreshed. Failing to find `blocknum` on the
    /// chain is `ChainCorrupt`.
    pub fn delete_hashtable_entry_at(&self, image: &mut Image, i: usize, blocknum: u32) -> Result<()> {
        let head = self.hashtable_entry_at(image, i)?;
        if head == blocknum {
            let next = HeaderBlock::new(blocknum).next_hash(image)?;
            self.set_hashtable_entry_at(image, i, next)?;
            self.update_checksum(image)?;
            return Ok(());
        }
        let mut prev = HeaderBlock::new(head);
        loop {
            if prev.block == 0 {
                return Err(AffsError::ChainCorrupt(blocknum));
            }
            let next = prev.next_hash(image)?;
            if next == blocknum {
                let skip_to = HeaderBlock::new(blocknum).next_hash(image)?;
                prev.set_next_hash(image, skip_to)?;
                return prev.update_checksum(image);
            }
            if next == 0 {
                return Err(AffsError::ChainCorrupt(blocknum));
            }
            prev = HeaderBlock::new(next);
        }
    }

    /// Find a child header by name, walking the hash chain rooted at
    /// `hash_name(name)`. `NotFound` if the chain ends without a match.
    pub fn find_header(&self, image: &Image, name: &str) -> Result<HeaderBlock> {
        let idx = hash_name_512(name.as_bytes());
        let mut current = self.hashtable_entry_at(image, idx)?;
        while current != 0 {
            let candidate = HeaderBlock::new(current);
            if names_equal(candidate.name(image)?.as_bytes(), name.as_bytes()) {
                return Ok(candidate);
            }
            current = candidate.next_hash(image)?;
        }
        Err(AffsError::NotFound(name.to_string()))
    }

    /// `true` if every hash-table slot is empty.
    pub fn is_directory_empty(&self, image: &Image) -> Result<bool> {
        for i in 0..self.hashtable_size(image)? {
            if self.hashtable_entry_at(image, i)? != 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Classify `secondary_type` into the full role union (root,
    /// directory, file, and the hard/soft-link variants), or `None` for
    /// a value outside that set.
    pub fn entry_type(&self, image: &Image) -> Result<Option<crate::types::EntryType>> {
        Ok(crate::types::EntryType::from_sec_type(self.secondary_type(image)?))
    }

    /// `true` if this header is a directory-like role: a plain
    /// directory or a hard link to one (not root).
    pub fn is_directory(&self, image: &Image) -> Result<bool> {
        Ok(matches!(self.entry_type(image)?, Some(t) if t.is_dir()) && self.secondary_type(image)? != ST_ROOT)
    }

    /// `true` if this header is a file-like role: a plain file or a
    /// hard link to one.
    pub fn is_file(&self, image: &Image) -> Result<bool> {
        Ok(matches!(self.entry_type(image)?, Some(t) if t.is_file()))
    }

    /// `true` if `secondary_type == 1` (root).
    pub fn is_root(&self, image: &Image) -> Result<bool> {
        Ok(self.secondary_type(image)? == ST_ROOT)
    }

    /// Initialize this block as an empty directory: zero the sector,
    /// write `primary_type`, `header_key`, `secondary_type`, `name`,
    /// `parent`, stamp the current time, and refresh the checksum.
    pub fn init_directory(&self, image: &mut Image, name: &str, parent_block: u32, clock: &dyn Clock) -> Result<()> {
        if name.as_bytes().len() > MAX_NAME_LEN {
            return Err(AffsError::InvalidArgument(format!(
                "name {name:?} exceeds {MAX_NAME_LEN} bytes"
            )));
        }
        {
            let mut sec = image.sector_mut(self.block)?;
            sec.clear_data();
            sec.set_i32_at(HDR_PRIMARY_TYPE, T_HEADER)?;
            sec.set_u32_at(HDR_HEADER_KEY, self.block)?;
            sec.set_i32_at(from_end(HDR_SEC_TYPE_NEG), ST_DIR)?;
        }
        self.set_name(image, name)?;
        self.set_parent(image, parent_block)?;
        self.update_last_modification_time(image, clock)?;
        self.update_checksum(image)
    }

    /// `high_seq`: count of data-block pointers stored in this header
    /// (files only).
    pub fn high_seq(&self, image: &Image) -> Result<u32> {
        Ok(image.sector(self.block)?.u32_at(HDR_HIGH_SEQ)? )
    }

    /// `file_size` (`byte_size`), offset `block_size - 188` (files only).
    pub fn file_size(&self, image: &Image) -> Result<u32> {
        image.sector(self.block)?.u32_at(from_end(HDR_FILE_SIZE_NEG))
    }

    /// Data-block pointers for this file header, highest slot first (the
    /// first data block is the highest address in the shared hash-table
    /// slot array).
    pub fn data_blocks(&self, image: &Image) -> Result<Vec<u32>> {
        let count = self.high_seq(image)? as usize;
        let sec = image.sector(self.block)?;
        let mut out = Vec::with_capacity(count);
        for idx in 0..count {
            out.push(sec.u32_at(from_end(HDR_FILE_DATABLK_NEG) - idx * 4)?);
        }
        Ok(out)
    }

    /// Recompute and store this block's checksum (checksum field at
    /// offset 20).
    pub fn update_checksum(&self, image: &mut Image) -> Result<()> {
        let computed = {
            let sec = image.sector(self.block)?;
            header_checksum(sec.raw(), HDR_CHECKSUM)
        };
        image.sector_mut(self.block)?.set_u32_at(HDR_CHECKSUM, computed)
    }

    /// The checksum as stored on disk.
    pub fn stored_checksum(&self, image: &Image) -> Result<u32> {
        image.sector(self.block)?.u32_at(HDR_CHECKSUM)
    }

    /// The checksum as computed from the current block contents.
    pub fn computed_checksum(&self, image: &Image) -> Result<u32> {
        let sec = image.sector(self.block)?;
        Ok(header_checksum(sec.raw(), HDR_CHECKSUM))
    }
}
