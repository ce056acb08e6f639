use alloc::string::String;
use enough::StopReason;

use crate::limits::LimitExceeded;

/// Why a split or merge cannot proceed.
///
/// Every variant describes unsuitable caller input. None of them are
/// transient, so retrying with the same buffers always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum GeometryError {
    #[error("square {size}x{size} buffer is neither a horizontal nor a vertical strip")]
    AmbiguousOrientation { size: u32 },

    #[error("strip length {length} is not a multiple of its breadth {breadth}")]
    NotAMultiple { length: u32, breadth: u32 },

    #[error("a strip needs at least 2 tiles, got {tile_count}")]
    DegenerateStrip { tile_count: usize },

    #[error("tiles must be square, got {width}x{height}")]
    TilesNotSquare { width: u32, height: u32 },

    #[error("tile {index} does not match tile 0: {reason}")]
    InconsistentTiles { index: usize, reason: String },

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("tile size {0} is not a power of two")]
    NotPowerOfTwo(u32),

    #[error("geometry does not describe the given buffers: {0}")]
    GeometryMismatch(String),

    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),
}

/// Errors from buffer construction, strip transformations and the image codecs.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StripError {
    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StopReason> for StripError {
    fn from(r: StopReason) -> Self {
        StripError::Cancelled(r)
    }
}
