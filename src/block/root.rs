//! Root-block extensions: bitmap flag/pointer, the free/used block scan,
//! and the two allocator primitives that flip a bitmap bit.

use crate::block::bitmap::BitmapBlock;
use crate::block::header::HeaderBlock;
use crate::constants::*;
use crate::date::{AmigaTime, Clock};
use crate::error::{AffsError, Result};
use crate::image::Image;

const fn from_end(n: usize) -> usize {
    BLOCK_SIZE - n
}

/// A handle to the root block, wrapping the shared header-block
/// accessors with root-only extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootBlock {
    /// The underlying header-block handle.
    pub header: HeaderBlock,
}

impl RootBlock {
    /// Create a handle for the root block at `block`.
    #[inline]
    pub const fn new(block: u32) -> Self {
        Self {
            header: HeaderBlock::new(block),
        }
    }

    /// The root block's own number.
    #[inline]
    pub const fn block(&self) -> u32 {
        self.header.block
    }

    /// `bitmap_flag` (offset `block_size - 200`); `true` iff the bitmap
    /// is current and authoritative (value == -1).
    pub fn bitmap_flag(&self, image: &Image) -> Result<i32> {
        image.sector(self.block())?.i32_at(from_end(HDR_BITMAP_FLAG_NEG))
    }

    /// `true` if `bitmap_flag() == -1`.
    pub fn bitmap_valid(&self, image: &Image) -> Result<bool> {
        Ok(self.bitmap_flag(image)? == BM_VALID)
    }

    /// Set `bitmap_flag`.
    pub fn set_bitmap_flag(&self, image: &mut Image, value: i32) -> Result<()> {
        image
            .sector_mut(self.block())?
            .set_i32_at(from_end(HDR_BITMAP_FLAG_NEG), value)
    }

    /// The first bitmap-page pointer (`bitmap_pages[0]`), offset
    /// `block_size - 196`.
    pub fn bitmap_page0(&self, image: &Image) -> Result<u32> {
        image.sector(self.block())?.u32_at(from_end(HDR_BITMAP_PAGES_NEG))
    }

    /// Set `bitmap_pages[0]`.
    pub fn set_bitmap_page0(&self, image: &mut Image, block: u32) -> Result<()> {
        image
            .sector_mut(self.block())?
            .set_u32_at(from_end(HDR_BITMAP_PAGES_NEG), block)
    }

    /// The bitmap block referenced by `bitmap_pages[0]`.
    ///
    /// Only the first bitmap page is read; volumes needing more than
    /// one page (more than 4,064 bitmap bits in use) are out of scope.
    pub fn bitmap_block0(&self, image: &Image) -> Result<BitmapBlock> {
        Ok(BitmapBlock::new(self.bitmap_page0(image)?))
    }

    /// Scan the bitmap from block 2 upward, stopping once the block
    /// index exceeds `num_sectors`. Returns `(free, used)` block lists
    /// in ascending order.
    pub fn block_allocation(&self, image: &Image) -> Result<(Vec<u32>, Vec<u32>)> {
        let bitmap = self.bitmap_block0(image)?;
        let num_sectors = image.num_sectors();
        let mut free = Vec::new();
        let mut used = Vec::new();
        let mut block_idx = RESERVED_BLOCKS;
        while block_idx <= num_sectors {
            if bitmap.is_free(image, block_idx)? {
                free.push(block_idx);
            } else {
                used.push(block_idx);
            }
            block_idx += 1;
        }
        Ok((free, used))
    }

    /// Allocate block `n`: fail with `AlreadyAllocated` if its bit is
    /// already clear, else mark it used in the bitmap.
    pub fn allocate_block(&self, image: &mut Image, n: u32) -> Result<()> {
        let bitmap = self.bitmap_block0(image)?;
        if !bitmap.is_free(image, n)? {
            return Err(AffsError::AlreadyAllocated(n));
        }
        bitmap.mark_block_used(image, n)
    }

    /// Free block `n` in the bitmap.
    pub fn free_block(&self, image: &mut Image, n: u32) -> Result<()> {
        let bitmap = self.bitmap_block0(image)?;
        bitmap.mark_block_free(image, n)
    }

    /// Disk-alteration time (offset `block_size - 40`, 3 x u32).
    pub fn last_disk_modification_time(&self, image: &Image) -> Result<AmigaTime> {
        let sec = image.sector(self.block())?;
        let base = from_end(HDR_DISK_MOD_TIME_NEG);
        Ok(AmigaTime::new(sec.u32_at(base)?, sec.u32_at(base + 4)?, sec.u32_at(base + 8)?))
    }

    /// Stamp the disk-alteration time with the current time from `clock`.
    pub fn update_last_disk_modification_time(&self, image: &mut Image, clock: &dyn Clock) -> Result<()> {
        let t = AmigaTime::from_datetime(clock.now());
        let base = from_end(HDR_DISK_MOD_TIME_NEG);
        let mut sec = image.sector_mut(self.block())?;
        sec.set_u32_at(base, t.days)?;
        sec.set_u32_at(base + 4, t.mins)?;
        sec.set_u32_at(base + 8, t.ticks)
    }

    /// Filesystem creation time (offset `block_size - 28`, 3 x u32).
    pub fn filesystem_creation_time(&self, image: &Image) -> Result<AmigaTime> {
        let sec = image.sector(self.block())?;
        let base = from_end(HDR_FS_CREATION_TIME_NEG);
        Ok(AmigaTime::new(sec.u32_at(base)?, sec.u32_at(base + 4)?, sec.u32_at(base + 8)?))
    }

    /// The disk/volume name (delegates to the shared header accessor).
    pub fn name(&self, image: &Image) -> Result<String> {
        self.header.name(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_flag_valid_check() {
        let mut image = Image::new(true);
        let root = RootBlock::new(880);
        root.set_bitmap_flag(&mut image, -1).unwrap();
        assert!(root.bitmap_valid(&image).unwrap());
        root.set_bitmap_flag(&mut image, 0).unwrap();
        assert!(!root.bitmap_valid(&image).unwrap());
    }
}
