//! The boot block: magic bytes, filesystem-variant flags, and the
//! 1024-byte checksum span.

use crate::checksum::boot_checksum;
use crate::constants::{BOOT_BLOCK_SIZE, DOSFS_DIRCACHE, DOSFS_FFS, DOSFS_INTL};
use crate::error::{AffsError, Result};
use crate::image::Image;
use crate::types::{FsFlags, FsType};

/// `true` if the first three bytes spell "DOS".
pub fn is_dos(image: &Image) -> bool {
    &image.boot_bytes()[0..3] == b"DOS"
}

/// The filesystem variant, derived from the flags byte's bit 0.
pub fn filesystem_type(image: &Image) -> Result<FsType> {
    if !is_dos(image) {
        return Err(AffsError::NotDos);
    }
    if image.boot_bytes()[3] & DOSFS_FFS != 0 {
        Ok(FsType::Ffs)
    } else {
        Ok(FsType::Ofs)
    }
}

/// The international/dircache flag bits, decoded from the flags byte.
pub fn flags(image: &Image) -> FsFlags {
    FsFlags::from_dos_type(image.boot_bytes()[3])
}

/// `true` if the international-mode bit is set.
pub fn is_international(image: &Image) -> bool {
    flags(image).intl
}

/// `true` if the dircache-mode bit is set.
pub fn is_dircache(image: &Image) -> bool {
    flags(image).dircache
}

/// Stamp the "DOS" magic and flags byte, then refresh the checksum. Does
/// not synthesize a full empty filesystem (root block, bitmap); that is
/// left to `Volume::makedir` and the fixture-building callers that lay
/// down a root block explicitly.
pub fn initialize(image: &mut Image, fs_type: FsType, is_international: bool, use_dircache: bool) -> Result<()> {
    let mut flags = match fs_type {
        FsType::Ofs => 0u8,
        FsType::Ffs => DOSFS_FFS,
    };
    flags |= if is_international && use_dircache {
        DOSFS_DIRCACHE
    } else if is_international {
        DOSFS_INTL
    } else {
        0
    };

    {
        let buf = image.boot_bytes_mut();
        buf[0] = b'D';
        buf[1] = b'O';
        buf[2] = b'S';
        buf[3] = flags;
    }
    update_checksum(image)
}

/// Recompute and store the boot-block checksum (offset 4).
pub fn update_checksum(image: &mut Image) -> Result<()> {
    let computed = computed_checksum(image);
    image.boot_bytes_mut()[4..8].copy_from_slice(&computed.to_be_bytes());
    Ok(())
}

/// The checksum as stored on disk.
pub fn stored_checksum(image: &Image) -> u32 {
    crate::checksum::read_u32_be(image.boot_bytes(), 4)
}

/// The checksum as computed from the current boot-block contents.
pub fn computed_checksum(image: &Image) -> u32 {
    boot_checksum(&image.boot_bytes()[..BOOT_BLOCK_SIZE])
}
