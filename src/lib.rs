//! # affs-edit
//!
//! A crate for reading and mutating the on-disk structures of an
//! AmigaDOS ADF floppy-disk filesystem image, supporting both the Old
//! File System (OFS) and Fast File System (FFS) variants.
//!
//! `affs-edit` treats a flat byte image as a hierarchical filesystem: it
//! locates the boot block and root directory, navigates directory hash
//! tables, assembles file contents from data-block chains, and mutates
//! the image (creating directories, deleting entries, maintaining the
//! free-block bitmap) while keeping every big-endian field and checksum
//! consistent.
//!
//! ## Layers
//!
//! - [`Image`]/[`Sector`]/[`SectorMut`]: the owned byte buffer and
//!   fixed-size sector views over it.
//! - [`block`]: typed decoders/encoders for the boot block, header
//!   blocks (root, directory, file roles), and the bitmap block.
//! - [`checksum`]: the boot-block and header/bitmap checksum algorithms.
//! - [`hash`]: the AmigaDOS directory-name hash.
//! - [`Volume`]: the top-level façade — path resolution, file-data
//!   assembly, directory creation, and deletion.
//!
//! ## Example
//!
//! ```
//! use affs_edit::{FsType, Image, Volume};
//!
//! let image = Image::new(true); // a blank DD (880 KiB) floppy image
//! let mut volume = Volume::new(image);
//! volume.initialize(FsType::Ffs, false, false).unwrap();
//! assert_eq!(volume.filesystem_type().unwrap(), FsType::Ffs);
//! ```
//!
//! ## Scope
//!
//! This crate does not implement: high-density-disk support beyond
//! sizing constants, hard-disk (RDB) partition tables, the "dircache"
//! extension blocks, the "international" case-folding hash variant,
//! growing file data (allocating new data blocks beyond the bitmap
//! primitive), or extension blocks for files larger than roughly 35 KiB.
//! These surface as [`AffsError::Unimplemented`] where they would
//! otherwise be silently approximated.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
mod checksum;
mod constants;
mod date;
mod error;
mod hash;
mod image;
mod types;
mod volume;

pub use block::{BitmapBlock, HeaderBlock, RootBlock};
pub use checksum::{bitmap_checksum, boot_checksum, header_checksum, read_i32_be, read_u16_be, read_u32_be};
pub use constants::*;
pub use date::{AmigaTime, Clock, FrozenClock, SystemClock};
pub use error::AffsError;
pub use hash::{hash_name, hash_name_512, names_equal};
pub use image::{Image, Sector, SectorMut};
pub use types::{EntryType, FsFlags, FsType};
pub use volume::{ListEntry, Volume};

/// Result type for volume operations.
pub type Result<T> = core::result::Result<T, AffsError>;
