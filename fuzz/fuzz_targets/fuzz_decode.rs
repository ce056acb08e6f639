#![no_main]
use libfuzzer_sys::fuzz_target;
use zenstrip::{DecodeRequest, ImageInfo, Limits, StripPolicy, split_image};

fuzz_target!(|data: &[u8]| {
    // Probing and decoding must never panic.
    let _ = ImageInfo::from_bytes(data);

    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Limits::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Whatever decodes either splits cleanly or fails with a typed error.
    let _ = split_image(&decoded.image, &StripPolicy::permissive());
});
