//! # zenstrip
//!
//! Split a strip of N equal tiles laid out side by side (or stacked) into N
//! separate images, and merge N equal images back into one strip. Typical
//! use: cube-map faces, sprite rows, texture atlases with one row or column.
//!
//! ## Strip engine
//!
//! - [`PixelBuffer`]: owned raw pixels with an explicit row stride.
//! - [`StripPolicy::validate_split`] / [`StripPolicy::validate_merge`]: check
//!   feasibility and derive a [`SplitGeometry`] or [`MergeGeometry`].
//! - [`split`] / [`merge`]: the pixel copies. Horizontal strips are copied
//!   row by row; vertical strips one contiguous block per tile.
//!
//! The engine never looks at channel meaning or color space. It fails with
//! typed errors and never logs, retries or returns partial output.
//!
//! ## Codecs
//!
//! Binary PNM (P5/P6/P7) and farbfeld always; uncompressed BMP with the
//! `bmp` feature; QOI with the `qoi` feature. Codecs report a [`PixelFormat`]
//! next to the decoded buffer.
//!
//! ## Usage
//!
//! ```no_run
//! use zenstrip::{DecodeRequest, EncodeRequest, StripPolicy, Unstoppable, split_image};
//! use zenstrip::pnm::PnmFormat;
//!
//! let data: &[u8] = &[]; // a 6:1 PAM strip of cube faces
//! let strip = DecodeRequest::new(data).decode(Unstoppable)?.into_image();
//! let faces = split_image(&strip, &StripPolicy::default())?;
//! for face in &faces.tiles {
//!     let bytes = EncodeRequest::pnm(PnmFormat::Pam).encode(&face.image, Unstoppable)?;
//!     # let _ = bytes;
//! }
//! # Ok::<(), zenstrip::StripError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod error;
mod geometry;
mod info;
mod limits;
mod merge;
mod pixel;
mod session;
mod split;

pub mod pnm;

#[cfg(feature = "bmp")]
mod bmp;

mod farbfeld;

#[cfg(feature = "qoi")]
mod qoi;

mod decode;
mod encode;

#[cfg(feature = "std")]
mod io;

// Re-exports
pub use buffer::{Image, PixelBuffer};
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::{EncodeRequest, TargetFormat};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{GeometryError, StripError};
pub use geometry::{
    MergeGeometry, SplitGeometry, StripOrientation, StripPolicy, validate_merge, validate_split,
};
pub use info::{ImageFormat, ImageInfo};
pub use limits::{LimitExceeded, Limits};
pub use merge::merge;
pub use pixel::{ColorSpace, PixelFormat, PixelLayout};
#[cfg(feature = "rgb")]
pub use pixel::StripPixel;
pub use session::{Entry, MERGED_DEFAULT_NAME, MergeQueue, SplitOutput, merge_images, split_image};
pub use split::split;

#[cfg(feature = "std")]
pub use io::{merged_image_path, read_image, write_image};
