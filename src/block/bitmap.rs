//! The free-block bitmap: one word per 32 blocks, MSB-first within each
//! word. A naive LSB-first scheme would silently corrupt real disks.

use crate::checksum::bitmap_checksum;
use crate::constants::BLOCK_SIZE;
use crate::error::Result;
use crate::image::Image;

/// A handle to a bitmap block identified by its block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapBlock {
    /// The block number this handle addresses.
    pub block: u32,
}

/// Word offset (bytes) and bit mask for block `n` (n >= 2).
fn locate(n: u32) -> (usize, u32) {
    let wordnum = ((n - 2) / 32) as usize;
    let bitnum = (n - 2) % 32;
    let offset = (wordnum + 1) * 4;
    let mask = 0x8000_0000u32 >> bitnum;
    (offset, mask)
}

impl BitmapBlock {
    /// Create a handle for `block`.
    #[inline]
    pub const fn new(block: u32) -> Self {
        Self { block }
    }

    /// Mark block `n` used (bit cleared) and refresh the checksum.
    pub fn mark_block_used(&self, image: &mut Image, n: u32) -> Result<()> {
        let (offset, mask) = locate(n);
        let mut sec = image.sector_mut(self.block)?;
        let word = sec.u32_at(offset)?;
        sec.set_u32_at(offset, word & !mask)?;
        drop(sec);
        self.update_checksum(image)
    }

    /// Mark block `n` free (bit set) and refresh the checksum.
    pub fn mark_block_free(&self, image: &mut Image, n: u32) -> Result<()> {
        let (offset, mask) = locate(n);
        let mut sec = image.sector_mut(self.block)?;
        let word = sec.u32_at(offset)?;
        sec.set_u32_at(offset, word | mask)?;
        drop(sec);
        self.update_checksum(image)
    }

    /// `true` if block `n`'s bit is set (free).
    pub fn is_free(&self, image: &Image, n: u32) -> Result<bool> {
        let (offset, mask) = locate(n);
        let word = image.sector(self.block)?.u32_at(offset)?;
        Ok(word & mask != 0)
    }

    /// Recompute and store this block's checksum (offset 0).
    pub fn update_checksum(&self, image: &mut Image) -> Result<()> {
        let computed = self.computed_checksum(image)?;
        image.sector_mut(self.block)?.set_u32_at(0, computed)
    }

    /// The checksum as stored on disk.
    pub fn stored_checksum(&self, image: &Image) -> Result<u32> {
        image.sector(self.block)?.u32_at(0)
    }

    /// The checksum as computed from the current block contents.
    pub fn computed_checksum(&self, image: &Image) -> Result<u32> {
        let sec = image.sector(self.block)?;
        let buf: &[u8; BLOCK_SIZE] = sec.raw().try_into().expect("sector is BLOCK_SIZE bytes");
        Ok(bitmap_checksum(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_first_block() {
        // Block 2 is the lowest addressable block: word 0 (offset 4),
        // bit 31 (the MSB).
        let (offset, mask) = locate(2);
        assert_eq!(offset, 4);
        assert_eq!(mask, 0x8000_0000);
    }

    #[test]
    fn locate_last_bit_in_first_word() {
        // Block 33 is bit 0 (LSB) of word 0.
        let (offset, mask) = locate(33);
        assert_eq!(offset, 4);
        assert_eq!(mask, 0x0000_0001);
    }

    #[test]
    fn mark_used_then_free_round_trips() {
        let mut image = Image::new(true);
        let bm = BitmapBlock::new(880);
        image.sector_mut(880).unwrap().set_u32_at(4, 0xFFFF_FFFF).unwrap();
        assert!(bm.is_free(&image, 10).unwrap());
        bm.mark_block_used(&mut image, 10).unwrap();
        assert!(!bm.is_free(&image, 10).unwrap());
        assert_eq!(bm.stored_checksum(&image).unwrap(), bm.computed_checksum(&image).unwrap());
        bm.mark_block_free(&mut image, 10).unwrap();
        assert!(bm.is_free(&image, 10).unwrap());
        assert_eq!(bm.stored_checksum(&image).unwrap(), bm.computed_checksum(&image).unwrap());
    }
}
