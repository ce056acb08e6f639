//! PNM header parsing and sample conversion.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use enough::Stop;

use super::{PnmFormat, PnmHeader};
use crate::buffer::try_alloc;
use crate::error::StripError;
use crate::pixel::PixelLayout;

/// Parse a P5, P6 or P7 header.
pub(crate) fn parse_header(data: &[u8]) -> Result<PnmHeader, StripError> {
    if data.len() < 2 || data[0] != b'P' {
        return Err(StripError::UnrecognizedFormat);
    }
    match data[1] {
        b'5' => parse_classic(data, PnmFormat::Pgm),
        b'6' => parse_classic(data, PnmFormat::Ppm),
        b'7' => parse_pam(data),
        b'1'..=b'4' => Err(StripError::UnsupportedVariant(
            "ASCII and bitmap PNM (P1-P4) are not supported".into(),
        )),
        _ => Err(StripError::UnrecognizedFormat),
    }
}

struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_u32(&mut self, what: &str) -> Result<u32, StripError> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while self.data.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        if start == self.pos {
            return if self.pos >= self.data.len() {
                Err(StripError::UnexpectedEof)
            } else {
                Err(StripError::InvalidHeader(format!("expected {what}")))
            };
        }
        parse_u32(&self.data[start..self.pos], what)
    }
}

fn parse_u32(digits: &[u8], what: &str) -> Result<u32, StripError> {
    let mut value: u32 = 0;
    for &d in digits {
        if !d.is_ascii_digit() {
            return Err(StripError::InvalidHeader(format!("{what} is not a number")));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(d - b'0')))
            .ok_or_else(|| StripError::InvalidHeader(format!("{what} overflows u32")))?;
    }
    Ok(value)
}

fn parse_classic(data: &[u8], format: PnmFormat) -> Result<PnmHeader, StripError> {
    let mut tokens = Tokens { data, pos: 2 };
    let width = tokens.next_u32("width")?;
    let height = tokens.next_u32("height")?;
    let maxval = tokens.next_u32("maxval")?;
    // Exactly one whitespace byte separates the header from the raster.
    match data.get(tokens.pos) {
        Some(b) if b.is_ascii_whitespace() => tokens.pos += 1,
        Some(_) => return Err(StripError::InvalidHeader("no whitespace after maxval".into())),
        None => return Err(StripError::UnexpectedEof),
    }
    let depth = if format == PnmFormat::Pgm { 1 } else { 3 };
    finish_header(format, width, height, maxval, depth, None, tokens.pos)
}

fn parse_pam(data: &[u8]) -> Result<PnmHeader, StripError> {
    let mut pos = 2;
    let (mut width, mut height, mut depth, mut maxval) = (None, None, None, None);
    let mut tupltype = String::new();
    loop {
        let rest = data.get(pos..).ok_or(StripError::UnexpectedEof)?;
        let line_len = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(StripError::UnexpectedEof)?;
        let line = trim_ascii(&rest[..line_len]);
        pos += line_len + 1;
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        let split = line
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(line.len());
        let (key, value) = (&line[..split], trim_ascii(&line[split..]));
        match key {
            b"ENDHDR" => break,
            b"WIDTH" => width = Some(parse_u32(value, "WIDTH")?),
            b"HEIGHT" => height = Some(parse_u32(value, "HEIGHT")?),
            b"DEPTH" => depth = Some(parse_u32(value, "DEPTH")?),
            b"MAXVAL" => maxval = Some(parse_u32(value, "MAXVAL")?),
            b"TUPLTYPE" => {
                if !tupltype.is_empty() {
                    tupltype.push(' ');
                }
                tupltype.push_str(&String::from_utf8_lossy(value));
            }
            other => {
                return Err(StripError::InvalidHeader(format!(
                    "unknown PAM header field {:?}",
                    String::from_utf8_lossy(other)
                )));
            }
        }
    }
    let missing = |field: &str| StripError::InvalidHeader(format!("PAM header lacks {field}"));
    finish_header(
        PnmFormat::Pam,
        width.ok_or_else(|| missing("WIDTH"))?,
        height.ok_or_else(|| missing("HEIGHT"))?,
        maxval.ok_or_else(|| missing("MAXVAL"))?,
        depth.ok_or_else(|| missing("DEPTH"))?,
        Some(tupltype),
        pos,
    )
}

fn finish_header(
    format: PnmFormat,
    width: u32,
    height: u32,
    maxval: u32,
    depth: u32,
    tupltype: Option<String>,
    data_offset: usize,
) -> Result<PnmHeader, StripError> {
    if width == 0 || height == 0 {
        return Err(StripError::InvalidHeader(format!(
            "zero dimension {width}x{height}"
        )));
    }
    if maxval == 0 || maxval > 65535 {
        return Err(StripError::InvalidHeader(format!("maxval {maxval} out of range")));
    }
    let wide = maxval > 255;
    let layout = match (depth, wide) {
        (1, false) => PixelLayout::Gray8,
        (1, true) => PixelLayout::Gray16,
        (3, false) => PixelLayout::Rgb8,
        (4, false) => PixelLayout::Rgba8,
        (4, true) => PixelLayout::Rgba16,
        _ => {
            return Err(StripError::UnsupportedVariant(format!(
                "{}-channel PNM with maxval {maxval}{}",
                depth,
                tupltype
                    .as_deref()
                    .map(|t| format!(" ({t})"))
                    .unwrap_or_default()
            )));
        }
    };
    Ok(PnmHeader {
        format,
        width,
        height,
        maxval,
        depth,
        layout,
        data_offset,
    })
}

fn trim_ascii(mut s: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = s {
        if first.is_ascii_whitespace() {
            s = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = s {
        if last.is_ascii_whitespace() {
            s = rest;
        } else {
            break;
        }
    }
    s
}

/// Convert raw samples to the header's layout: rescale maxval < 255 and
/// swap 16-bit big-endian samples to native endian.
pub(crate) fn decode_samples(
    raster: &[u8],
    header: &PnmHeader,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    let w = header.width as usize;
    let row_samples = w * header.depth as usize;
    let wide = header.maxval > 255;
    let src_row_bytes = row_samples * if wide { 2 } else { 1 };
    let maxval = header.maxval;

    let mut out = try_alloc(w * header.height as usize * header.layout.bytes_per_pixel())?;
    for (row_idx, row) in raster
        .chunks_exact(src_row_bytes)
        .take(header.height as usize)
        .enumerate()
    {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if wide {
            for pair in row.chunks_exact(2) {
                let v = u32::from(u16::from_be_bytes([pair[0], pair[1]]));
                let scaled = if maxval == 65535 {
                    v
                } else {
                    (v.min(maxval) * 65535 + maxval / 2) / maxval
                };
                out.extend_from_slice(&(scaled as u16).to_ne_bytes());
            }
        } else if maxval == 255 {
            out.extend_from_slice(row);
        } else {
            out.extend(
                row.iter()
                    .map(|&v| ((u32::from(v).min(maxval) * 255 + maxval / 2) / maxval) as u8),
            );
        }
    }
    Ok(out)
}
