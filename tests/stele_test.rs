//! Stele integration tests: wire fixtures, rejection paths, streaming
//! boundary behavior, and randomized round-trips.

use proptest::prelude::*;
use stele::{PaletteMap, SteleError, decode, decode_with_default_buffer, encode, encode_to_vec};

const A: u32 = 0xFF00_00FF;
const B: u32 = 0x00FF_00FF;
const C: u32 = 0x0000_FFFF;

fn two_color_palette() -> PaletteMap<u32> {
    PaletteMap::from_values(&[A, B]).unwrap()
}

#[test]
fn test_exact_wire_bytes() {
    // 4x8, sixteen A then sixteen B: each color collapses to one record.
    let mut pixels = vec![A; 16];
    pixels.extend(vec![B; 16]);
    let palette = PaletteMap::from_pixels(&pixels).unwrap();

    let encoded = encode_to_vec(&pixels, 4, 8, &palette).unwrap();
    assert_eq!(encoded, [1, 4, 0, 8, 0, 0xC0, 3, 0xD5, 3]);

    let mut decoded = vec![0u32; 32];
    decode_with_default_buffer(&mut encoded.as_slice(), &mut decoded, &palette).unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn test_third_color_runs_stay_literal() {
    // Uniform spans of the third palette color are never collapsed; the
    // encoder emits them as literal 0xAA bytes for wire compatibility.
    let mut pixels = vec![A; 4];
    pixels.extend(vec![B; 4]);
    pixels.extend(vec![C; 24]);
    let palette = PaletteMap::from_pixels(&pixels).unwrap();

    let encoded = encode_to_vec(&pixels, 4, 8, &palette).unwrap();
    assert_eq!(&encoded[5..], &[0x00, 0x55, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA]);
    assert!(!encoded[5..].contains(&0xEA), "no run record for color 2");

    let mut decoded = vec![0u32; 32];
    decode_with_default_buffer(&mut encoded.as_slice(), &mut decoded, &palette).unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn test_uniform_image_collapses() {
    // 64x64 single color: 1024 groups fold into four run records, eight
    // body bytes against 1024 bytes of naive 2-bit packing.
    let pixels = vec![A; 64 * 64];
    let palette = two_color_palette();

    let encoded = encode_to_vec(&pixels, 64, 64, &palette).unwrap();
    assert_eq!(encoded.len(), 5 + 8);

    let mut decoded = vec![0u32; 64 * 64];
    decode_with_default_buffer(&mut encoded.as_slice(), &mut decoded, &palette).unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn test_roundtrip_mixed_image() {
    // Blocks of each color plus a noisy tail; 16x16.
    let mut pixels = Vec::with_capacity(256);
    pixels.extend(vec![A; 96]);
    pixels.extend(vec![C; 64]);
    pixels.extend(vec![B; 48]);
    pixels.extend((0..48).map(|i| [A, B, C, B][i % 4]));
    let palette = PaletteMap::from_pixels(&pixels).unwrap();

    let encoded = encode_to_vec(&pixels, 16, 16, &palette).unwrap();
    let mut decoded = vec![0u32; 256];
    decode_with_default_buffer(&mut encoded.as_slice(), &mut decoded, &palette).unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn test_header_rejection() {
    let palette = two_color_palette();
    let mut out = vec![0u32; 16];

    let cases: [(&[u8], fn(&SteleError) -> bool); 4] = [
        (&[2, 4, 0, 4, 0], |e| {
            matches!(e, SteleError::UnsupportedVersion { found: 2 })
        }),
        (&[1, 0, 0, 4, 0], |e| {
            matches!(e, SteleError::DimensionTooSmall { axis: "width", value: 0 })
        }),
        (&[1, 4, 0, 2, 0], |e| {
            matches!(e, SteleError::DimensionTooSmall { axis: "height", value: 2 })
        }),
        (&[1, 5, 0, 4, 0], |e| {
            matches!(e, SteleError::DimensionNotAligned { axis: "width", value: 5 })
        }),
    ];
    for (bytes, check) in cases {
        let err = decode_with_default_buffer(&mut &bytes[..], &mut out, &palette).unwrap_err();
        assert!(check(&err), "unexpected error for {bytes:?}: {err}");
    }
}

#[test]
fn test_size_mismatch_before_body() {
    // Header with no body at all: the buffer check must fire first.
    let bytes = [1u8, 4, 0, 4, 0];
    let mut out = vec![0u32; 20];
    let err =
        decode_with_default_buffer(&mut &bytes[..], &mut out, &two_color_palette()).unwrap_err();
    assert!(matches!(
        err,
        SteleError::SizeMismatch {
            expected: 16,
            actual: 20
        }
    ));
}

#[test]
fn test_encode_rejects_wrong_pixel_count() {
    let pixels = vec![A; 17];
    let mut sink = Vec::new();
    let err = encode(&mut sink, &pixels, 4, 4, &two_color_palette()).unwrap_err();
    assert!(matches!(
        err,
        SteleError::SizeMismatch {
            expected: 16,
            actual: 17
        }
    ));
}

#[test]
fn test_palette_size_bounds() {
    let err = PaletteMap::from_pixels(&[A; 64]).unwrap_err();
    assert!(matches!(err, SteleError::InvalidPalette { count: 1 }));

    let err = PaletteMap::from_pixels(&[A, B, C, 0x1234_5678]).unwrap_err();
    assert!(matches!(err, SteleError::InvalidPalette { count: 4 }));
}

#[test]
fn test_run_straddles_buffer_boundary() {
    // Body [C0 03 D5 03]: with tiny chunk sizes the escape field lands on
    // the last byte of a read and the count byte must come straight off
    // the stream.
    let mut pixels = vec![A; 16];
    pixels.extend(vec![B; 16]);
    let palette = PaletteMap::from_pixels(&pixels).unwrap();
    let encoded = encode_to_vec(&pixels, 4, 8, &palette).unwrap();

    for buffer_size in [1, 3] {
        let mut decoded = vec![0u32; 32];
        decode(&mut encoded.as_slice(), &mut decoded, &palette, buffer_size).unwrap();
        assert_eq!(decoded, pixels, "buffer_size {buffer_size}");
    }
}

#[test]
fn test_chunk_size_never_changes_output() {
    let mut pixels = Vec::with_capacity(144);
    pixels.extend(vec![C; 40]);
    pixels.extend(vec![A; 60]);
    pixels.extend((0..44).map(|i| [B, A][i % 2]));
    let palette = PaletteMap::from_values(&[A, B, C]).unwrap();
    let encoded = encode_to_vec(&pixels, 12, 12, &palette).unwrap();

    for buffer_size in [1, 2, 5, 7, 4096] {
        let mut decoded = vec![0u32; 144];
        decode(&mut encoded.as_slice(), &mut decoded, &palette, buffer_size).unwrap();
        assert_eq!(decoded, pixels, "buffer_size {buffer_size}");
    }
}

#[test]
fn test_truncated_stream() {
    let pixels = vec![A; 256];
    let palette = two_color_palette();
    let encoded = encode_to_vec(&pixels, 16, 16, &palette).unwrap();

    // Cut inside the body.
    let cut = &encoded[..encoded.len() - 1];
    let mut decoded = vec![0u32; 256];
    let err = decode_with_default_buffer(&mut &cut[..], &mut decoded, &palette).unwrap_err();
    assert!(matches!(err, SteleError::TruncatedOutput { .. }));

    // Cut between an escape field and its count byte.
    let cut = [1u8, 16, 0, 16, 0, 0xC0];
    let err = decode_with_default_buffer(&mut &cut[..], &mut decoded, &palette).unwrap_err();
    assert!(matches!(
        err,
        SteleError::TruncatedOutput {
            written: 3,
            expected: 256
        }
    ));
}

fn image_strategy() -> impl Strategy<Value = (u16, u16, Vec<u32>)> {
    (1u16..=8, 1u16..=8).prop_flat_map(|(wg, hg)| {
        let width = wg * 4;
        let height = hg * 4;
        let len = usize::from(width) * usize::from(height);
        proptest::collection::vec(0usize..3, len).prop_map(move |codes| {
            let colors = [A, B, C];
            let pixels = codes.into_iter().map(|c| colors[c]).collect();
            (width, height, pixels)
        })
    })
}

proptest! {
    #[test]
    fn roundtrip_random_images((width, height, pixels) in image_strategy()) {
        // Explicit palette so single-color samples stay encodable.
        let palette = PaletteMap::from_values(&[A, B, C]).unwrap();
        let encoded = encode_to_vec(&pixels, width, height, &palette).unwrap();

        let mut decoded = vec![0u32; pixels.len()];
        decode_with_default_buffer(&mut encoded.as_slice(), &mut decoded, &palette).unwrap();
        prop_assert_eq!(decoded, pixels);
    }

    #[test]
    fn roundtrip_random_chunk_sizes(
        (width, height, pixels) in image_strategy(),
        buffer_size in 1usize..64,
    ) {
        let palette = PaletteMap::from_values(&[A, B, C]).unwrap();
        let encoded = encode_to_vec(&pixels, width, height, &palette).unwrap();

        let mut decoded = vec![0u32; pixels.len()];
        decode(&mut encoded.as_slice(), &mut decoded, &palette, buffer_size).unwrap();
        prop_assert_eq!(decoded, pixels);
    }
}
