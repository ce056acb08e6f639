use crate::error::StripError;
use crate::pixel::PixelLayout;

#[cfg(feature = "bmp")]
use crate::bmp;
use crate::encode::TargetFormat;
use crate::pnm::{self, PnmFormat};

/// Container format detected from magic bytes.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// PGM (P5), PPM (P6) or PAM (P7).
    Pnm(PnmFormat),
    /// Windows bitmap.
    Bmp,
    /// Farbfeld (RGBA 16-bit).
    Farbfeld,
    /// Quite OK Image format.
    Qoi,
}

impl ImageFormat {
    /// Identify the format from the first bytes of a file.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match data {
            [b'P', b'5', ..] => Some(Self::Pnm(PnmFormat::Pgm)),
            [b'P', b'6', ..] => Some(Self::Pnm(PnmFormat::Ppm)),
            [b'P', b'7', ..] => Some(Self::Pnm(PnmFormat::Pam)),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ if data.starts_with(b"farbfeld") => Some(Self::Farbfeld),
            _ if data.starts_with(b"qoif") => Some(Self::Qoi),
            _ => None,
        }
    }

    /// Where outputs derived from an image of this format are saved by
    /// default: the same format family, keeping alpha when `layout` has it.
    pub fn default_target(self, layout: PixelLayout) -> TargetFormat {
        match self {
            Self::Pnm(PnmFormat::Pam) => TargetFormat::Pnm(PnmFormat::Pam),
            Self::Pnm(_) if layout.has_alpha() => TargetFormat::Pnm(PnmFormat::Pam),
            Self::Pnm(f) => TargetFormat::Pnm(f),
            Self::Bmp => TargetFormat::Bmp {
                alpha: layout.has_alpha(),
            },
            Self::Farbfeld => TargetFormat::Farbfeld,
            Self::Qoi => TargetFormat::Qoi,
        }
    }
}

/// Dimensions and layout read from a header without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub native_layout: PixelLayout,
}

impl ImageInfo {
    /// Probe a header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, StripError> {
        match ImageFormat::detect(data).ok_or(StripError::UnrecognizedFormat)? {
            ImageFormat::Pnm(_) => pnm::probe_header(data),
            #[cfg(feature = "bmp")]
            ImageFormat::Bmp => bmp::probe_header(data),
            ImageFormat::Farbfeld => {
                let (width, height) = crate::farbfeld::decode::parse_header(data)?;
                Ok(Self {
                    width,
                    height,
                    format: ImageFormat::Farbfeld,
                    native_layout: PixelLayout::Rgba16,
                })
            }
            #[cfg(feature = "qoi")]
            ImageFormat::Qoi => crate::qoi::probe_header(data),
            #[allow(unreachable_patterns)]
            other => Err(StripError::UnsupportedVariant(alloc::format!(
                "{other:?} support is not compiled in"
            ))),
        }
    }
}
