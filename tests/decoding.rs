use gx_texdec::{
    DecodedFormat, block_height_in_texels, block_width_in_texels, decode, decode_rgba8_from_tmem,
    decode_texel, decode_texel_rgba8_from_tmem, palette_size_in_bytes, texel_size_in_nibbles,
    texture_size_in_bytes,
};

const ALL_FORMATS: [u32; 14] = [
    0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x8, 0x9, 0xA, 0xE, 0x11, 0x13, 0x16,
];

fn is_indexed(format: u32) -> bool {
    matches!(format, 0x8 | 0x9 | 0xA)
}

fn fill_pseudo_random(buf: &mut [u8], mut state: u32) {
    for b in buf {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *b = state as u8;
    }
}

#[test]
fn encoded_size_counts_whole_blocks() {
    for format in ALL_FORMATS {
        let bw = block_width_in_texels(format);
        let bh = block_height_in_texels(format);
        let block_bytes = bw * bh * texel_size_in_nibbles(format) / 2;
        for (w, h) in [(1usize, 1usize), (5, 3), (8, 8), (13, 7), (16, 4), (9, 1), (0, 7)] {
            let expected = w.div_ceil(bw) * h.div_ceil(bh) * block_bytes;
            assert_eq!(
                texture_size_in_bytes(w, h, format),
                expected,
                "format {format:#X}, {w}x{h}"
            );
        }
    }
}

#[test]
fn point_decode_matches_bulk_decode_everywhere() {
    for format in ALL_FORMATS {
        let mut tlut = vec![0u8; palette_size_in_bytes(format)];
        fill_pseudo_random(&mut tlut, 0x9E3779B9);
        let tlutformats: &[u32] = if is_indexed(format) { &[0, 1, 2] } else { &[0] };
        for (width, height) in [(16usize, 8usize), (13, 7)] {
            let mut src = vec![0u8; texture_size_in_bytes(width, height, format)];
            fill_pseudo_random(&mut src, 0x12345678 ^ format);
            for &tlutformat in tlutformats {
                let mut bulk = vec![0u8; width * height * 4];
                let out = decode(&mut bulk, &src, width, height, format, &tlut, tlutformat, true);
                assert_eq!(out, DecodedFormat::RGBA32);
                for t in 0..height {
                    for s in 0..width {
                        let mut pixel = [0u8; 4];
                        decode_texel(&mut pixel, &src, s, t, width, format, &tlut, tlutformat);
                        assert_eq!(
                            pixel,
                            bulk[(t * width + s) * 4..][..4],
                            "format {format:#X} tlut {tlutformat} texel ({s}, {t})"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn tmem_point_decode_matches_tmem_bulk_decode() {
    let (width, height) = (13, 7);
    let half = texture_size_in_bytes(width, height, 0x6) / 2;
    let mut src_ar = vec![0u8; half];
    let mut src_gb = vec![0u8; half];
    fill_pseudo_random(&mut src_ar, 0xDEADBEEF);
    fill_pseudo_random(&mut src_gb, 0xCAFEF00D);
    let mut bulk = vec![0u8; width * height * 4];
    decode_rgba8_from_tmem(&mut bulk, &src_ar, &src_gb, width, height);
    for t in 0..height {
        for s in 0..width {
            let mut pixel = [0u8; 4];
            decode_texel_rgba8_from_tmem(&mut pixel, &src_ar, &src_gb, s, t, width);
            assert_eq!(pixel, bulk[(t * width + s) * 4..][..4], "texel ({s}, {t})");
        }
    }
}

#[test]
fn narrow_outputs_re_expand_to_the_rgba_decode() {
    let expand5 = |v: u16| ((v << 3) | (v >> 2)) as u8;
    let expand6 = |v: u16| ((v << 2) | (v >> 4)) as u8;
    for format in [0x0u32, 0x1, 0x2, 0x3, 0x4, 0x11, 0x13] {
        let (width, height) = (16usize, 8usize);
        let mut src = vec![0u8; texture_size_in_bytes(width, height, format)];
        fill_pseudo_random(&mut src, 0xA5A5A5A5 ^ format);

        let mut rgba = vec![0u8; width * height * 4];
        decode(&mut rgba, &src, width, height, format, &[], 0, true);

        let mut narrow = vec![0u8; width * height * 4];
        let out = decode(&mut narrow, &src, width, height, format, &[], 0, false);
        for p in 0..width * height {
            let expected = &rgba[p * 4..][..4];
            let got: [u8; 4] = match out {
                DecodedFormat::I8 => {
                    let i = narrow[p];
                    [i, i, i, i]
                }
                DecodedFormat::IA8 => {
                    let i = narrow[p * 2];
                    let a = narrow[p * 2 + 1];
                    [i, i, i, a]
                }
                DecodedFormat::RGB565 => {
                    let val = u16::from_ne_bytes([narrow[p * 2], narrow[p * 2 + 1]]);
                    [
                        expand5((val >> 11) & 0x1F),
                        expand6((val >> 5) & 0x3F),
                        expand5(val & 0x1F),
                        0xFF,
                    ]
                }
                other => panic!("unexpected narrow layout {other:?} for {format:#X}"),
            };
            assert_eq!(got, expected, "format {format:#X} pixel {p}");
        }
    }
}

#[test]
fn compressed_sub_block_with_zero_selectors_is_solid_color1() {
    // color1 = 0x001F (pure blue) sorts below color2 = 0x07E0, so this is
    // the transparent-capable mode, but selector 0 still reads color1.
    let mut src = [0u8; 32];
    src[0..2].copy_from_slice(&0x001Fu16.to_be_bytes());
    src[2..4].copy_from_slice(&0x07E0u16.to_be_bytes());
    let mut dst = [0u8; 4 * 4 * 4];
    decode(&mut dst, &src, 4, 4, 0xE, &[], 0, true);
    for p in 0..16 {
        assert_eq!(&dst[p * 4..][..4], &[0, 0, 0xFF, 0xFF], "texel {p}");
    }
}

#[test]
fn zeroed_rgb565_decodes_to_opaque_black() {
    let src = [0u8; 128];
    let mut dst = [0u8; 8 * 8 * 4];
    decode(&mut dst, &src, 8, 8, 0x4, &[], 0, true);
    for p in 0..64 {
        assert_eq!(&dst[p * 4..][..4], &[0, 0, 0, 0xFF], "texel {p}");
    }
}

#[test]
fn zero_indices_resolve_palette_entry_zero() {
    let mut tlut = vec![0u8; palette_size_in_bytes(0x8)];
    tlut[0] = 0xFF; // alpha
    tlut[1] = 0x80; // intensity
    let src = [0u8; 32];
    let mut dst = [0u8; 8 * 8 * 4];
    decode(&mut dst, &src, 8, 8, 0x8, &tlut, 0, true);
    for p in 0..64 {
        assert_eq!(&dst[p * 4..][..4], &[0x80, 0x80, 0x80, 0xFF], "texel {p}");
    }
}
