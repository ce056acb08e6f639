use enough::Stop;

use crate::buffer::Image;
use crate::error::StripError;
use crate::info::ImageFormat;
use crate::limits::Limits;

/// A decoded image and the container it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pub image: Image,
    pub format: ImageFormat,
}

impl DecodeOutput {
    pub fn into_image(self) -> Image {
        self.image
    }
}

/// Decode request builder.
///
/// ```no_run
/// use zenstrip::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // PNM/BMP/farbfeld/QOI bytes
/// let limits = Limits { max_pixels: Some(64 << 20), ..Default::default() };
/// let decoded = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// println!("{}x{} {:?}", decoded.image.width(), decoded.image.height(), decoded.format);
/// # Ok::<(), zenstrip::StripError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Detect the format and decode.
    ///
    /// Unreadable or unsupported data fails with a codec error such as
    /// [`StripError::UnrecognizedFormat`] or [`StripError::InvalidHeader`].
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, StripError> {
        let format = ImageFormat::detect(self.data).ok_or(StripError::UnrecognizedFormat)?;
        let image = match format {
            ImageFormat::Pnm(_) => crate::pnm::decode(self.data, self.limits, &stop)?,
            #[cfg(feature = "bmp")]
            ImageFormat::Bmp => crate::bmp::decode(self.data, self.limits, &stop)?,
            ImageFormat::Farbfeld => crate::farbfeld::decode(self.data, self.limits, &stop)?,
            #[cfg(feature = "qoi")]
            ImageFormat::Qoi => crate::qoi::decode(self.data, self.limits, &stop)?,
            #[allow(unreachable_patterns)]
            other => {
                return Err(StripError::UnsupportedVariant(alloc::format!(
                    "{other:?} support is not compiled in"
                )));
            }
        };
        Ok(DecodeOutput { image, format })
    }
}
