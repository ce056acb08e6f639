use alloc::vec::Vec;
use enough::Stop;

use crate::buffer::Image;
use crate::error::StripError;
use crate::pnm::PnmFormat;

/// Output container for [`EncodeRequest`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Pnm(PnmFormat),
    /// Uncompressed BMP; 32-bit when `alpha`, else 24-bit.
    Bmp { alpha: bool },
    Farbfeld,
    /// Compressed, lossless, with alpha.
    Qoi,
}

impl TargetFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pnm(f) => f.extension(),
            Self::Bmp { .. } => "bmp",
            Self::Farbfeld => "ff",
            Self::Qoi => "qoi",
        }
    }

    /// Parse a file extension (case-insensitive, no dot). `bmp` maps to
    /// 32-bit BMP so alpha survives.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let eq = |s: &str| ext.eq_ignore_ascii_case(s);
        if eq("pgm") {
            Some(Self::Pnm(PnmFormat::Pgm))
        } else if eq("ppm") || eq("pnm") {
            Some(Self::Pnm(PnmFormat::Ppm))
        } else if eq("pam") {
            Some(Self::Pnm(PnmFormat::Pam))
        } else if eq("bmp") {
            Some(Self::Bmp { alpha: true })
        } else if eq("ff") || eq("farbfeld") {
            Some(Self::Farbfeld)
        } else if eq("qoi") {
            Some(Self::Qoi)
        } else {
            None
        }
    }
}

/// Encode request builder.
///
/// Encoders read rows through the buffer's stride, so padded buffers
/// encode without repacking. A layout the target cannot represent fails
/// with [`StripError::UnsupportedVariant`].
#[derive(Clone, Copy, Debug)]
pub struct EncodeRequest {
    target: TargetFormat,
}

impl EncodeRequest {
    pub fn new(target: TargetFormat) -> Self {
        Self { target }
    }

    pub fn pnm(format: PnmFormat) -> Self {
        Self::new(TargetFormat::Pnm(format))
    }

    pub fn bmp() -> Self {
        Self::new(TargetFormat::Bmp { alpha: false })
    }

    pub fn bmp_with_alpha() -> Self {
        Self::new(TargetFormat::Bmp { alpha: true })
    }

    pub fn farbfeld() -> Self {
        Self::new(TargetFormat::Farbfeld)
    }

    pub fn qoi() -> Self {
        Self::new(TargetFormat::Qoi)
    }

    pub fn target(&self) -> TargetFormat {
        self.target
    }

    pub fn encode(&self, image: &Image, stop: impl Stop) -> Result<Vec<u8>, StripError> {
        self.encode_dyn(image, &stop)
    }

    pub(crate) fn encode_dyn(&self, image: &Image, stop: &dyn Stop) -> Result<Vec<u8>, StripError> {
        match self.target {
            TargetFormat::Pnm(format) => crate::pnm::encode(image, format, stop),
            #[cfg(feature = "bmp")]
            TargetFormat::Bmp { alpha } => crate::bmp::encode(image, alpha, stop),
            TargetFormat::Farbfeld => crate::farbfeld::encode(image, stop),
            #[cfg(feature = "qoi")]
            TargetFormat::Qoi => crate::qoi::encode(image, stop),
            #[allow(unreachable_patterns)]
            other => Err(StripError::UnsupportedVariant(alloc::format!(
                "{other:?} support is not compiled in"
            ))),
        }
    }
}
