//! Error types for volume operations.

use thiserror::Error;

/// Errors raised while decoding or mutating an ADF image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AffsError {
    /// Image length does not match a known disk size (DD or HD).
    #[error("image length {0} does not match a known disk size")]
    BadImageSize(usize),

    /// Boot block magic is not "DOS".
    #[error("boot block does not carry the DOS signature")]
    NotDos,

    /// The filesystem variant is not OFS or FFS, or requires an
    /// unimplemented feature (dircache, international hash).
    #[error("unsupported filesystem variant")]
    UnsupportedFs,

    /// A byte or block index fell outside the image, or a hash-table
    /// index fell outside `[0, size)`.
    #[error("index out of range")]
    OutOfRange,

    /// A path component was not found in its parent's hash chain.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempted to allocate a block whose bitmap bit is already clear.
    #[error("block {0} is already allocated")]
    AlreadyAllocated(u32),

    /// A hash-chain walk ran off the end without finding the expected
    /// block.
    #[error("hash chain corrupt: block {0} not found on its chain")]
    ChainCorrupt(u32),

    /// Non-recursive delete attempted on a populated directory.
    #[error("directory is not empty")]
    DirNotEmpty,

    /// An empty path, an attempt to delete the root, or a malformed name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A feature this engine deliberately does not implement: recursive
    /// directory delete, file extension blocks, dircache, or the
    /// international hash variant.
    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    /// A stored checksum did not match the computed one.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// A header block's `secondary_type` did not match the role an
    /// operation expected (e.g. calling file-only accessors on a
    /// directory header).
    #[error("block {0} is not a {1}")]
    WrongRole(u32, &'static str),
}

/// Result type for volume operations.
pub type Result<T> = core::result::Result<T, AffsError>;
