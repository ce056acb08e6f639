use alloc::string::String;

/// A configured [`Limits`] bound was crossed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("limit exceeded: {0}")]
pub struct LimitExceeded(pub String);

/// Resource limits for decoding and for merged strip output.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for output buffer allocation.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// No limits at all. Same as `Limits::default()`.
    pub const fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_memory_bytes: None,
        }
    }

    /// Whether every bound is unset.
    pub fn is_unbounded(&self) -> bool {
        *self == Self::none()
    }

    /// Check dimensions against limits.
    pub fn check(&self, width: u32, height: u32) -> Result<(), LimitExceeded> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub fn check_memory(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes > max_mem {
                return Err(LimitExceeded(alloc::format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// [`check`](Self::check) plus [`check_memory`](Self::check_memory) for
    /// a `width` x `height` buffer of `bytes_per_pixel`-byte pixels.
    pub fn check_image(
        &self,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
    ) -> Result<(), LimitExceeded> {
        self.check(width, height)?;
        self.check_memory(
            (u64::from(width) * u64::from(height)).saturating_mul(bytes_per_pixel as u64),
        )
    }
}
