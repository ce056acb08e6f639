#![no_main]
use libfuzzer_sys::fuzz_target;
use zenstrip::*;

fuzz_target!(|data: &[u8]| {
    // [tile side, tile count, bpp, vertical, pixels...]
    let [side, count, bpp, vertical, pixels @ ..] = data else {
        return;
    };
    let side = u32::from(*side % 32) + 1;
    let count = u32::from(*count % 8) + 2;
    let bpp = u32::from(*bpp % 8) + 1;
    let (w, h) = if vertical & 1 == 1 {
        (side, side * count)
    } else {
        (side * count, side)
    };

    let len = (w * h * bpp) as usize;
    let mut bytes = Vec::with_capacity(len);
    bytes.extend(pixels.iter().copied().cycle().take(len));
    bytes.resize(len, 0);
    let strip = PixelBuffer::packed(w, h, bpp, bytes).unwrap();

    let policy = StripPolicy::permissive();
    let geometry = policy.validate_split(&strip).unwrap();
    assert_eq!(geometry.tile_count(), count as usize);
    let tiles = split(&strip, &geometry).unwrap();

    let merge_geometry = policy.validate_merge(&tiles, geometry.orientation()).unwrap();
    let merged = merge(&tiles, geometry.orientation(), &merge_geometry).unwrap();
    assert_eq!(merged, strip, "split then merge must be the identity");
});
