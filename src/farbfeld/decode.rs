//! Farbfeld decoder.

use alloc::vec::Vec;
use enough::Stop;

use crate::buffer::try_alloc;
use crate::error::StripError;

pub(crate) const HEADER_LEN: usize = 16;

/// Parse farbfeld header, returning (width, height).
pub(crate) fn parse_header(data: &[u8]) -> Result<(u32, u32), StripError> {
    if data.len() < 8 || &data[0..8] != b"farbfeld" {
        return Err(StripError::UnrecognizedFormat);
    }
    if data.len() < HEADER_LEN {
        return Err(StripError::UnexpectedEof);
    }
    let width = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    let height = u32::from_be_bytes([data[12], data[13], data[14], data[15]]);

    if width == 0 || height == 0 {
        return Err(StripError::InvalidHeader(alloc::format!(
            "farbfeld dimensions {width}x{height} contain a zero"
        )));
    }
    Ok((width, height))
}

/// Big-endian RGBA16 samples → native-endian bytes.
pub(crate) fn decode_pixels(
    data: &[u8],
    width: u32,
    height: u32,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    let row_bytes = (width as usize)
        .checked_mul(8)
        .ok_or(StripError::DimensionsTooLarge { width, height })?;
    let input_bytes = row_bytes
        .checked_mul(height as usize)
        .ok_or(StripError::DimensionsTooLarge { width, height })?;

    let pixel_data = data
        .get(HEADER_LEN..HEADER_LEN + input_bytes)
        .ok_or(StripError::UnexpectedEof)?;

    let mut out = try_alloc(input_bytes)?;
    for (row_idx, row) in pixel_data.chunks_exact(row_bytes).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for pair in row.chunks_exact(2) {
            let val = u16::from_be_bytes([pair[0], pair[1]]);
            out.extend_from_slice(&val.to_ne_bytes());
        }
    }
    Ok(out)
}
