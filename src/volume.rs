//! `Volume`: the top-level façade over an `Image`. Exposes path
//! resolution, file-data assembly, directory creation, and deletion,
//! coordinating allocator updates, hash-chain maintenance, and
//! timestamp/checksum refresh.

use log::{debug, trace};

use crate::block::{BitmapBlock, HeaderBlock, RootBlock};
use crate::block::boot;
use crate::constants::*;
use crate::date::{Clock, SystemClock};
use crate::error::{AffsError, Result};
use crate::image::Image;
use crate::types::FsType;

/// One entry yielded by `Volume::list_dir`.
#[derive(Debug, Clone)]
pub struct ListEntry {
    /// The entry's name.
    pub name: String,
    /// The entry's header-block number.
    pub block: u32,
    /// `true` if the entry is a directory.
    pub is_directory: bool,
}

/// The top-level façade over an `Image`.
pub struct Volume {
    image: Image,
    clock: Box<dyn Clock>,
}

/// Split `path` on `/`, discarding empty components. Uses `memchr` to
/// scan for separators rather than `str::split`, matching the
/// byte-scanning idiom the rest of this crate uses for path and name
/// handling.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut out = Vec::new();
    let mut start = 0usize;
    for pos in memchr::memchr_iter(b'/', bytes).chain(std::iter::once(bytes.len())) {
        if pos > start {
            out.push(&path[start..pos]);
        }
        start = pos + 1;
    }
    out
}

impl Volume {
    /// Wrap an `Image`, using the real system clock for timestamp
    /// stamping.
    pub fn new(image: Image) -> Self {
        Self::with_clock(image, Box::new(SystemClock))
    }

    /// Wrap an `Image` with an injected clock (for deterministic tests).
    pub fn with_clock(image: Image, clock: Box<dyn Clock>) -> Self {
        Self { image, clock }
    }

    /// Borrow the underlying image.
    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Borrow the underlying image mutably.
    #[inline]
    pub fn image_mut(&mut self) -> &mut Image {
        &mut self.image
    }

    /// Consume the volume, returning its image.
    #[inline]
    pub fn into_image(self) -> Image {
        self.image
    }

    /// Stamp the boot block's magic and flags byte. Does not synthesize
    /// a full empty filesystem (root block, bitmap); callers lay that
    /// down separately (see the fixture-building helpers in the
    /// integration tests).
    pub fn initialize(&mut self, fs_type: FsType, is_international: bool, use_dircache: bool) -> Result<()> {
        debug!("initialize: fs_type={fs_type:?} intl={is_international} dircache={use_dircache}");
        boot::initialize(&mut self.image, fs_type, is_international, use_dircache)
    }

    /// The filesystem variant derived from the boot block's flag bit.
    pub fn filesystem_type(&self) -> Result<FsType> {
        boot::filesystem_type(&self.image)
    }

    /// The root block, at `num_sectors / 2`.
    pub fn root_block(&self) -> RootBlock {
        RootBlock::new(self.image.num_sectors() / 2)
    }

    /// Split `path` on `/`, discarding empty components, walk from root,
    /// and resolve to a header block. `NotFound` on any missing
    /// component.
    pub fn header_for_path(&self, path: &str) -> Result<HeaderBlock> {
        let components = split_path(path);
        let mut current = self.root_block().header;
        for component in components {
            current = current.find_header(&self.image, component)?;
        }
        Ok(current)
    }

    /// One directory's entries as `(name, block, is_directory)` triples,
    /// reusing the same hash-chain walk `find_header` uses.
    pub fn list_dir(&self, dir: HeaderBlock) -> Result<Vec<ListEntry>> {
        let size = dir.hashtable_size(&self.image)?;
        let mut entries = Vec::new();
        for i in 0..size {
            let mut current = dir.hashtable_entry_at(&self.image, i)?;
            while current != 0 {
                let header = HeaderBlock::new(current);
                entries.push(ListEntry {
                    name: header.name(&self.image)?,
                    block: current,
                    is_directory: header.is_directory(&self.image)?,
                });
                current = header.next_hash(&self.image)?;
            }
        }
        Ok(entries)
    }

    /// Locate a file's header and assemble its data-block chain into a
    /// byte vector.
    pub fn file_data(&self, path: &str) -> Result<Vec<u8>> {
        let header = self.header_for_path(path)?;
        if !header.is_file(&self.image)? {
            return Err(AffsError::WrongRole(header.block, "file"));
        }
        let fs_type = self.filesystem_type()?;
        let file_size = header.file_size(&self.image)? as usize;
        let blocks = header.data_blocks(&self.image)?;
        let mut out = Vec::with_capacity(file_size);

        match fs_type {
            FsType::Ofs => {
                for block in blocks {
                    let sec = self.image.sector(block)?;
                    let data_size = sec.u32_at(12)? as usize;
                    out.extend_from_slice(&sec.raw()[OFS_DATA_HEADER_SIZE..OFS_DATA_HEADER_SIZE + data_size]);
                }
            }
            FsType::Ffs => {
                let mut remaining = file_size;
                for block in blocks {
                    let sec = self.image.sector(block)?;
                    let take = remaining.min(FFS_DATA_SIZE);
                    out.extend_from_slice(&sec.raw()[..take]);
                    remaining -= take;
                }
            }
        }
        Ok(out)
    }

    /// Create a new, empty directory at `path`.
    pub fn makedir(&mut self, path: &str) -> Result<u32> {
        let components = split_path(path);
        let (name, parent_components) = match components.split_last() {
            Some((name, rest)) => (*name, rest),
            None => return Err(AffsError::InvalidArgument("can't create /".to_string())),
        };

        let mut parent = self.root_block().header;
        for component in parent_components {
            parent = parent.find_header(&self.image, component)?;
        }

        let (free, _used) = self.root_block().block_allocation(&self.image)?;
        let new_block = *free.first().ok_or_else(|| AffsError::InvalidArgument("disk is full".to_string()))?;

        self.root_block().allocate_block(&mut self.image, new_block)?;
        trace!("makedir: allocated block {new_block} for {path:?}");

        let new_dir = HeaderBlock::new(new_block);
        new_dir.init_directory(&mut self.image, name, parent.block, self.clock.as_ref())?;

        let idx = crate::hash::hash_name_512(name.as_bytes());
        parent.append_hashtable_entry_at(&mut self.image, idx, new_block)?;
        debug!("makedir: linked block {new_block} into parent {} at hash slot {idx}", parent.block);

        parent.update_last_modification_time(&mut self.image, self.clock.as_ref())?;
        let root = self.root_block();
        root.update_last_disk_modification_time(&mut self.image, self.clock.as_ref())?;
        parent.update_checksum(&mut self.image)?;
        root.header.update_checksum(&mut self.image)?;

        Ok(new_block)
    }

    /// Delete the entry at `path`. Non-empty directories require
    /// `recursive`, which is not implemented.
    pub fn delete(&mut self, path: &str, recursive: bool) -> Result<()> {
        let components = split_path(path);
        let (name, parent_components) = match components.split_last() {
            Some((name, rest)) => (*name, rest),
            None => return Err(AffsError::InvalidArgument("can't delete /".to_string())),
        };

        let mut parent = self.root_block().header;
        for component in parent_components {
            parent = parent.find_header(&self.image, component)?;
        }
        let target = parent.find_header(&self.image, name)?;

        if target.is_directory(&self.image)? && !target.is_directory_empty(&self.image)? {
            if recursive {
                return Err(AffsError::Unimplemented(
                    "recursive directory delete is not implemented",
                ));
            }
            return Err(AffsError::DirNotEmpty);
        }

        let idx = crate::hash::hash_name_512(name.as_bytes());
        parent.delete_hashtable_entry_at(&mut self.image, idx, target.block)?;
        debug!("delete: unlinked block {} ({name:?}) from parent {}", target.block, parent.block);

        let root = self.root_block();
        if target.is_file(&self.image)? {
            for data_block in target.data_blocks(&self.image)? {
                root.free_block(&mut self.image, data_block)?;
            }
        }
        root.free_block(&mut self.image, target.block)?;

        parent.update_last_modification_time(&mut self.image, self.clock.as_ref())?;
        root.update_last_disk_modification_time(&mut self.image, self.clock.as_ref())?;
        parent.update_checksum(&mut self.image)?;
        root.header.update_checksum(&mut self.image)?;

        Ok(())
    }
}

/// Compute the free/used bitmap page referenced by `bitmap_pages[0]` of
/// the given root, as a convenience re-export for callers that only
/// need the bitmap handle without going through `Volume`.
pub fn bitmap_of(root: RootBlock, image: &Image) -> Result<BitmapBlock> {
    root.bitmap_block0(image)
}
