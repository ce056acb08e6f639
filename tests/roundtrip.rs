use zenstrip::pnm::PnmFormat;
use zenstrip::*;

fn checkerboard(w: u32, h: u32, layout: PixelLayout, color_space: ColorSpace) -> Image {
    let bpp = layout.bytes_per_pixel();
    let mut pixels = vec![0u8; w as usize * h as usize * bpp];
    for y in 0..h as usize {
        for x in 0..w as usize {
            let off = (y * w as usize + x) * bpp;
            for c in 0..bpp {
                pixels[off + c] = if (x + y) % 2 == 0 {
                    200 + c as u8 * 10
                } else {
                    10 + c as u8 * 30
                };
            }
        }
    }
    let buffer = PixelBuffer::packed(w, h, bpp as u32, pixels).unwrap();
    Image::new(buffer, PixelFormat::new(layout, color_space)).unwrap()
}

fn decode(data: &[u8]) -> DecodeOutput {
    DecodeRequest::new(data).decode(Unstoppable).unwrap()
}

struct Cancelled;

impl Stop for Cancelled {
    fn check(&self) -> Result<(), StopReason> {
        Err(StopReason::Cancelled)
    }
}

// ── PNM ──────────────────────────────────────────────────────────────

#[test]
fn ppm_roundtrip_rgb8() {
    let image = checkerboard(4, 3, PixelLayout::Rgb8, ColorSpace::SRGB);
    let encoded = EncodeRequest::pnm(PnmFormat::Ppm)
        .encode(&image, Unstoppable)
        .unwrap();
    assert!(encoded.starts_with(b"P6\n4 3\n255\n"));

    let decoded = decode(&encoded);
    assert_eq!(decoded.format, ImageFormat::Pnm(PnmFormat::Ppm));
    assert_eq!(decoded.image.format.layout, PixelLayout::Rgb8);
    assert_eq!(decoded.image.format.color_space, ColorSpace::UNKNOWN);
    assert_eq!(decoded.image.buffer, image.buffer);
}

#[test]
fn pam_roundtrip_rgba8() {
    let pixels = vec![
        255, 0, 0, 255, // red
        0, 255, 0, 128, // green semi-transparent
        0, 0, 255, 0, // blue transparent
        128, 128, 128, 255, // gray
    ];
    let buffer = PixelBuffer::packed(2, 2, 4, pixels).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Rgba8, ColorSpace::SRGB)).unwrap();

    let encoded = EncodeRequest::pnm(PnmFormat::Pam)
        .encode(&image, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Rgba8);
    assert_eq!(decoded.buffer, image.buffer);
}

#[test]
fn pam_swizzles_bgra() {
    let buffer = PixelBuffer::packed(1, 1, 4, vec![10, 20, 30, 40]).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Bgra8, ColorSpace::SRGB)).unwrap();
    let encoded = EncodeRequest::pnm(PnmFormat::Pam)
        .encode(&image, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Rgba8);
    assert_eq!(decoded.buffer.as_bytes(), &[30, 20, 10, 40]);
}

#[test]
fn pgm_roundtrip_gray8() {
    let buffer = PixelBuffer::packed(3, 2, 1, vec![0, 64, 128, 192, 255, 100]).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Gray8, ColorSpace::UNKNOWN)).unwrap();
    let encoded = EncodeRequest::pnm(PnmFormat::Pgm)
        .encode(&image, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded);
    assert_eq!(decoded.format, ImageFormat::Pnm(PnmFormat::Pgm));
    assert_eq!(decoded.image, image);
}

#[test]
fn pgm_16bit_roundtrip() {
    let samples: [u16; 4] = [0, 1000, 40000, 65535];
    let pixels: Vec<u8> = samples.iter().flat_map(|s| s.to_ne_bytes()).collect();
    let buffer = PixelBuffer::packed(2, 2, 2, pixels).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Gray16, ColorSpace::UNKNOWN)).unwrap();
    let encoded = EncodeRequest::pnm(PnmFormat::Pgm)
        .encode(&image, Unstoppable)
        .unwrap();
    assert!(encoded.starts_with(b"P5\n2 2\n65535\n"));
    assert_eq!(decode(&encoded).image, image);
}

#[test]
fn pnm_header_comments_and_low_maxval() {
    // maxval 15 rescales to the full 8-bit range.
    let data = b"P5\n# a comment\n2 1\n15\n\x00\x0f";
    let decoded = decode(data).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Gray8);
    assert_eq!(decoded.buffer.as_bytes(), &[0, 255]);
}

#[test]
fn ascii_pnm_is_rejected() {
    let err = DecodeRequest::new(b"P3\n1 1\n255\n0 0 0\n")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, StripError::UnrecognizedFormat), "{err:?}");
}

#[test]
fn truncated_pnm_fails() {
    let err = DecodeRequest::new(b"P6\n4 4\n255\n\x00\x00")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, StripError::UnexpectedEof), "{err:?}");
}

#[test]
fn padded_buffer_encodes_without_padding() {
    let image = checkerboard(3, 2, PixelLayout::Rgb8, ColorSpace::SRGB);
    let mut pixels = Vec::new();
    for row in image.buffer.rows() {
        pixels.extend_from_slice(row);
        pixels.extend_from_slice(&[0xAA; 5]);
    }
    let strided = PixelBuffer::new(3, 2, 3, 14, pixels).unwrap();
    let strided = Image::new(strided, image.format.clone()).unwrap();

    let a = EncodeRequest::pnm(PnmFormat::Ppm).encode(&image, Unstoppable).unwrap();
    let b = EncodeRequest::pnm(PnmFormat::Ppm).encode(&strided, Unstoppable).unwrap();
    assert_eq!(a, b);
}

// ── Farbfeld ─────────────────────────────────────────────────────────

#[test]
fn farbfeld_expands_8bit_input() {
    let image = checkerboard(3, 3, PixelLayout::Rgba8, ColorSpace::SRGB);
    let encoded = EncodeRequest::farbfeld().encode(&image, Unstoppable).unwrap();
    assert_eq!(encoded.len(), 16 + 3 * 3 * 8);

    let decoded = decode(&encoded);
    assert_eq!(decoded.format, ImageFormat::Farbfeld);
    assert_eq!(decoded.image.format.layout, PixelLayout::Rgba16);
    assert_eq!(decoded.image.format.color_space, ColorSpace::SRGB);
    let first = decoded.image.buffer.pixel(0, 0).unwrap();
    let r = u16::from_ne_bytes([first[0], first[1]]);
    assert_eq!(r, 200 * 257);
}

#[test]
fn farbfeld_roundtrip_rgba16() {
    let samples: [u16; 8] = [0, 1, 2, 3, 65535, 32768, 12345, 54321];
    let pixels: Vec<u8> = samples.iter().flat_map(|s| s.to_ne_bytes()).collect();
    let buffer = PixelBuffer::packed(2, 1, 8, pixels).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Rgba16, ColorSpace::SRGB)).unwrap();
    let encoded = EncodeRequest::farbfeld().encode(&image, Unstoppable).unwrap();
    assert_eq!(decode(&encoded).image, image);
}

#[test]
fn farbfeld_rejects_gray16() {
    let buffer = PixelBuffer::packed(1, 1, 2, vec![0, 0]).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Gray16, ColorSpace::SRGB)).unwrap();
    let err = EncodeRequest::farbfeld().encode(&image, Unstoppable).unwrap_err();
    assert!(matches!(err, StripError::UnsupportedVariant(_)));
}

// ── BMP ──────────────────────────────────────────────────────────────

#[cfg(feature = "bmp")]
#[test]
fn bmp_roundtrip_rgb8() {
    // Width 3 forces row padding in the file.
    let image = checkerboard(3, 2, PixelLayout::Rgb8, ColorSpace::SRGB);
    let encoded = EncodeRequest::bmp().encode(&image, Unstoppable).unwrap();
    let decoded = decode(&encoded);
    assert_eq!(decoded.format, ImageFormat::Bmp);
    assert_eq!(decoded.image, image);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_roundtrip_rgba8() {
    let mut image = checkerboard(5, 4, PixelLayout::Rgba8, ColorSpace::SRGB);
    image.buffer.as_bytes_mut()[3] = 17;
    let encoded = EncodeRequest::bmp_with_alpha()
        .encode(&image, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Rgba8);
    assert_eq!(decoded.buffer, image.buffer);
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_without_alpha_drops_it() {
    let image = checkerboard(2, 2, PixelLayout::Rgba8, ColorSpace::SRGB);
    let encoded = EncodeRequest::bmp().encode(&image, Unstoppable).unwrap();
    let decoded = decode(&encoded).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Rgb8);
    assert_eq!(decoded.buffer.pixel(1, 0), Some(&[10u8, 40, 70][..]));
}

/// 2x1 BMP with a 56-byte info header and explicit BGRA bitfields.
#[cfg(feature = "bmp")]
fn bitfields_bmp(alpha_mask: u32, pixels: [[u8; 4]; 2]) -> Vec<u8> {
    let mut bmp = Vec::new();
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&78u32.to_le_bytes()); // file size
    bmp.extend_from_slice(&[0u8; 4]);
    bmp.extend_from_slice(&70u32.to_le_bytes()); // data offset
    bmp.extend_from_slice(&56u32.to_le_bytes());
    bmp.extend_from_slice(&2i32.to_le_bytes());
    bmp.extend_from_slice(&1i32.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&32u16.to_le_bytes());
    bmp.extend_from_slice(&3u32.to_le_bytes()); // BI_BITFIELDS
    bmp.extend_from_slice(&8u32.to_le_bytes());
    bmp.extend_from_slice(&[0u8; 16]); // resolution, palette counts
    for mask in [0x00FF_0000u32, 0x0000_FF00, 0x0000_00FF, alpha_mask] {
        bmp.extend_from_slice(&mask.to_le_bytes());
    }
    for px in pixels {
        bmp.extend_from_slice(&px);
    }
    bmp
}

#[cfg(feature = "bmp")]
#[test]
fn bmp_zero_alpha_mask_is_opaque_rgb() {
    let data = bitfields_bmp(0, [[10, 20, 30, 0x7F], [40, 50, 60, 0]]);
    assert_eq!(ImageInfo::from_bytes(&data).unwrap().native_layout, PixelLayout::Rgb8);
    let decoded = decode(&data).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Rgb8);
    assert_eq!(decoded.buffer.as_bytes(), &[30, 20, 10, 60, 50, 40]);

    let data = bitfields_bmp(0xFF00_0000, [[10, 20, 30, 0x7F], [40, 50, 60, 0]]);
    let decoded = decode(&data).into_image();
    assert_eq!(decoded.format.layout, PixelLayout::Rgba8);
    assert_eq!(decoded.buffer.as_bytes(), &[30, 20, 10, 0x7F, 60, 50, 40, 0]);
}

// ── QOI ──────────────────────────────────────────────────────────────

#[cfg(feature = "qoi")]
#[test]
fn qoi_roundtrip_keeps_color_space() {
    for color_space in [ColorSpace::SRGB, ColorSpace::LINEAR] {
        let image = checkerboard(7, 5, PixelLayout::Rgba8, color_space);
        let encoded = EncodeRequest::qoi().encode(&image, Unstoppable).unwrap();
        let decoded = decode(&encoded);
        assert_eq!(decoded.format, ImageFormat::Qoi);
        assert_eq!(decoded.image, image);
    }
}

#[cfg(feature = "qoi")]
#[test]
fn qoi_rejects_16bit() {
    let buffer = PixelBuffer::packed(1, 1, 8, vec![0; 8]).unwrap();
    let image = Image::new(buffer, PixelFormat::new(PixelLayout::Rgba16, ColorSpace::SRGB)).unwrap();
    let err = EncodeRequest::qoi().encode(&image, Unstoppable).unwrap_err();
    assert!(matches!(err, StripError::UnsupportedVariant(_)));
}

#[cfg(feature = "qoi")]
#[test]
fn qoi_header_larger_than_its_data_fails_cleanly() {
    let mut data = Vec::new();
    data.extend_from_slice(b"qoif");
    data.extend_from_slice(&50_000u32.to_be_bytes());
    data.extend_from_slice(&50_000u32.to_be_bytes());
    data.extend_from_slice(&[4, 0]);
    data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
    let err = DecodeRequest::new(&data).decode(Unstoppable).unwrap_err();
    assert!(matches!(err, StripError::InvalidData(_)), "{err:?}");
}

// ── Probing, limits, cancellation ────────────────────────────────────

#[test]
fn probe_reads_header_only() {
    let image = checkerboard(6, 2, PixelLayout::Rgb8, ColorSpace::SRGB);
    let encoded = EncodeRequest::pnm(PnmFormat::Ppm)
        .encode(&image, Unstoppable)
        .unwrap();
    // "P6\n6 2\n255\n" plus one raster byte.
    let info = ImageInfo::from_bytes(&encoded[..12]).unwrap();
    assert_eq!((info.width, info.height), (6, 2));
    assert_eq!(info.format, ImageFormat::Pnm(PnmFormat::Ppm));
    assert_eq!(info.native_layout, PixelLayout::Rgb8);
}

#[test]
fn unknown_magic_is_unrecognized() {
    assert!(ImageFormat::detect(b"GIF89a").is_none());
    assert!(matches!(
        ImageInfo::from_bytes(b"GIF89a"),
        Err(StripError::UnrecognizedFormat)
    ));
}

#[test]
fn decode_limits_reject_large_images() {
    let image = checkerboard(64, 16, PixelLayout::Rgb8, ColorSpace::SRGB);
    let encoded = EncodeRequest::pnm(PnmFormat::Ppm)
        .encode(&image, Unstoppable)
        .unwrap();
    let limits = Limits {
        max_pixels: Some(512),
        ..Limits::default()
    };
    let err = DecodeRequest::new(&encoded)
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, StripError::LimitExceeded(_)), "{err:?}");
}

#[test]
fn cancelled_encode_and_decode() {
    let image = checkerboard(4, 4, PixelLayout::Rgb8, ColorSpace::SRGB);
    let err = EncodeRequest::pnm(PnmFormat::Ppm)
        .encode(&image, Cancelled)
        .unwrap_err();
    assert!(matches!(err, StripError::Cancelled(_)));

    let encoded = EncodeRequest::pnm(PnmFormat::Ppm)
        .encode(&image, Unstoppable)
        .unwrap();
    let err = DecodeRequest::new(&encoded).decode(Cancelled).unwrap_err();
    assert!(matches!(err, StripError::Cancelled(_)));
}

#[test]
fn layout_properties() {
    assert_eq!(PixelLayout::Rgb8.channels(), 3);
    assert_eq!(PixelLayout::Gray16.bits_per_channel(), 16);
    assert_eq!(PixelLayout::Rgba16.bits_per_channel(), 16);
    assert!(PixelLayout::Bgra8.is_rgba8_class());
    assert!(!PixelLayout::Rgba16.is_rgba8_class());
    assert!(!PixelLayout::Rgb8.is_rgba8_class());
}

#[test]
fn target_extensions() {
    assert_eq!(TargetFormat::from_extension("PAM"), Some(TargetFormat::Pnm(PnmFormat::Pam)));
    assert_eq!(TargetFormat::from_extension("bmp"), Some(TargetFormat::Bmp { alpha: true }));
    assert_eq!(TargetFormat::from_extension("png"), None);
    assert_eq!(TargetFormat::Farbfeld.extension(), "ff");
    assert_eq!(
        ImageFormat::Pnm(PnmFormat::Ppm).default_target(PixelLayout::Rgba8),
        TargetFormat::Pnm(PnmFormat::Pam)
    );
    assert_eq!(
        ImageFormat::Bmp.default_target(PixelLayout::Rgb8),
        TargetFormat::Bmp { alpha: false }
    );
}
