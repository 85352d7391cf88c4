use crate::pixel::{
    cmpr_colors, convert4to8, decodepixel_i8, decodepixel_ia4, decodepixel_ia8,
    decodepixel_rgb565, decodepixel_rgb5a3, lookup_tlut, read_u16_be,
};
use crate::types::{DecodedFormat, PaletteFormat, TextureFormat};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Decodes a block-tiled texture image into the linear pixel buffer `dst`.
///
/// `texformat` and `tlutformat` are the raw hardware register fields; an
/// undefined `texformat` returns [`DecodedFormat::None`] and leaves `dst`
/// untouched, and the undefined `tlutformat` value decodes as IA8. With
/// `rgba_only` every defined format lands in RGBA32; otherwise I4/I8/Z8
/// stay one intensity byte per pixel, IA4/IA8/Z16 two bytes, RGB565 one
/// native-endian halfword, and the rest widen to RGBA32. The return value
/// says which layout was written.
///
/// `src` must hold the whole block grid
/// ([`TextureFormat::texture_size_in_bytes`]), `dst` must hold
/// `width * height` output pixels, and for C4/C8/C14X2 `tlut` must cover
/// the format's entire index range. Those are caller contracts and are
/// asserted.
///
/// ```
/// use gx_texdec::{decode, DecodedFormat};
///
/// let src = [0u8; 128]; // 8x8 RGB565, all bits clear
/// let mut dst = [0u8; 8 * 8 * 4];
/// let out = decode(&mut dst, &src, 8, 8, 0x4, &[], 0, true);
/// assert_eq!(out, DecodedFormat::RGBA32);
/// assert_eq!(&dst[..4], &[0, 0, 0, 0xFF]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn decode(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    texformat: u32,
    tlut: &[u8],
    tlutformat: u32,
    rgba_only: bool,
) -> DecodedFormat {
    use TextureFormat::*;

    let Some(format) = TextureFormat::from_u32(texformat) else {
        return DecodedFormat::None;
    };
    let out = if rgba_only {
        DecodedFormat::RGBA32
    } else {
        match format {
            I4 | I8 | Z8 => DecodedFormat::I8,
            IA4 | IA8 | Z16 => DecodedFormat::IA8,
            RGB565 => DecodedFormat::RGB565,
            _ => DecodedFormat::RGBA32,
        }
    };

    let needed = format.texture_size_in_bytes(width, height);
    assert!(
        src.len() >= needed,
        "source holds {} bytes, {width}x{height} {format} needs {needed}",
        src.len()
    );
    assert!(
        dst.len() >= width * height * out.bytes_per_pixel(),
        "destination holds {} bytes, {width}x{height} {out} needs {}",
        dst.len(),
        width * height * out.bytes_per_pixel()
    );
    if matches!(format, C4 | C8 | C14X2) {
        let full = format.palette_size_in_bytes();
        assert!(
            tlut.len() >= full,
            "palette holds {} bytes, {format} indexes {full}",
            tlut.len()
        );
    }
    if width == 0 || height == 0 {
        return out;
    }

    let tlutformat = PaletteFormat::from_u32_or_ia8(tlutformat);
    match (format, rgba_only) {
        (I4, false) => decode_texture_i4(dst, src, width, height),
        (I4, true) => decode_texture_i4_rgba(dst, src, width, height),
        (I8 | Z8, false) => decode_texture_i8(dst, src, width, height),
        (I8 | Z8, true) => decode_texture_i8_rgba(dst, src, width, height),
        (IA4, false) => decode_texture_ia4(dst, src, width, height),
        (IA4, true) => decode_texture_ia4_rgba(dst, src, width, height),
        (IA8 | Z16, false) => decode_texture_ia8(dst, src, width, height),
        (IA8 | Z16, true) => decode_texture_ia8_rgba(dst, src, width, height),
        (RGB565, false) => decode_texture_rgb565(dst, src, width, height),
        (RGB565, true) => decode_texture_rgb565_rgba(dst, src, width, height),
        (RGB5A3, _) => decode_texture_rgb5a3_rgba(dst, src, width, height),
        (RGBA8 | Z24X8, _) => decode_texture_rgba8_rgba(dst, src, width, height),
        (C4, _) => decode_texture_c4(dst, src, width, height, tlut, tlutformat),
        (C8, _) => decode_texture_c8(dst, src, width, height, tlut, tlutformat),
        (C14X2, _) => decode_texture_c14x2(dst, src, width, height, tlut, tlutformat),
        (CMPR, _) => decode_texture_cmpr_rgba(dst, src, width, height),
    }
    out
}

/// Decodes an RGBA8 image whose blocks live split across the two texture
/// memory banks: every block's A/R half contiguous in `src_ar` and its G/B
/// half at the same offset in `src_gb`. Output is always RGBA32.
pub fn decode_rgba8_from_tmem(
    dst: &mut [u8],
    src_ar: &[u8],
    src_gb: &[u8],
    width: usize,
    height: usize,
) {
    let half = TextureFormat::RGBA8.texture_size_in_bytes(width, height) / 2;
    assert!(
        src_ar.len() >= half && src_gb.len() >= half,
        "each bank holds one 32-byte half per block, {half} bytes for {width}x{height}"
    );
    assert!(
        dst.len() >= width * height * 4,
        "destination holds {} bytes, {width}x{height} RGBA32 needs {}",
        dst.len(),
        width * height * 4
    );
    if width == 0 || height == 0 {
        return;
    }
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::RGBA8.block_offset(x, t, width) / 2;
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let i = iy * 4 + ix;
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o] = src_ar[base + 2 * i + 1];
                    chunk[o + 1] = src_gb[base + 2 * i];
                    chunk[o + 2] = src_gb[base + 2 * i + 1];
                    chunk[o + 3] = src_ar[base + 2 * i];
                }
            }
        }
    });
}

/// Runs `decode_band` over one destination block row at a time. Bands own
/// disjoint row ranges and read disjoint source block rows, so the rayon
/// build fans them out with no further coordination; the last band may be
/// shorter than a full block row.
fn for_each_band<F>(dst: &mut [u8], band_bytes: usize, decode_band: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    #[cfg(feature = "rayon")]
    dst.par_chunks_mut(band_bytes)
        .enumerate()
        .for_each(|(band, chunk)| decode_band(band, chunk));
    #[cfg(not(feature = "rayon"))]
    dst.chunks_mut(band_bytes)
        .enumerate()
        .for_each(|(band, chunk)| decode_band(band, chunk));
}

#[inline]
fn decode_texture_i4(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    for_each_band(&mut dst[..width * height], 8 * width, |band, chunk| {
        let t = band * 8;
        let rows = chunk.len() / width;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::I4.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = src[base + (iy * 8 + ix) / 2];
                    let i = if ix & 1 == 0 { val >> 4 } else { val & 0xF };
                    chunk[iy * width + x + ix] = convert4to8(i);
                }
            }
        }
    });
}

#[inline]
fn decode_texture_i4_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 8 * row_bytes, |band, chunk| {
        let t = band * 8;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::I4.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = src[base + (iy * 8 + ix) / 2];
                    let i = if ix & 1 == 0 { val >> 4 } else { val & 0xF };
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4]
                        .copy_from_slice(&decodepixel_i8(convert4to8(i)).to_le_bytes());
                }
            }
        }
    });
}

#[inline]
fn decode_texture_i8(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    for_each_band(&mut dst[..width * height], 4 * width, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / width;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::I8.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                chunk[iy * width + x..][..cols].copy_from_slice(&src[base + iy * 8..][..cols]);
            }
        }
    });
}

#[inline]
fn decode_texture_i8_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::I8.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4]
                        .copy_from_slice(&decodepixel_i8(src[base + iy * 8 + ix]).to_le_bytes());
                }
            }
        }
    });
}

#[inline]
fn decode_texture_ia4(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 2;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::IA4.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = src[base + iy * 8 + ix];
                    let o = iy * row_bytes + (x + ix) * 2;
                    chunk[o] = convert4to8(val & 0xF);
                    chunk[o + 1] = convert4to8(val >> 4);
                }
            }
        }
    });
}

#[inline]
fn decode_texture_ia4_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::IA4.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4]
                        .copy_from_slice(&decodepixel_ia4(src[base + iy * 8 + ix]).to_le_bytes());
                }
            }
        }
    });
}

// IA8 texels are big-endian on the wire (alpha byte first); the linear
// layout is intensity first.
#[inline]
fn decode_texture_ia8(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 2;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::IA8.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let so = base + (iy * 4 + ix) * 2;
                    let o = iy * row_bytes + (x + ix) * 2;
                    chunk[o] = src[so + 1];
                    chunk[o + 1] = src[so];
                }
            }
        }
    });
}

#[inline]
fn decode_texture_ia8_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::IA8.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = read_u16_be(src, base + (iy * 4 + ix) * 2);
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4].copy_from_slice(&decodepixel_ia8(val).to_le_bytes());
                }
            }
        }
    });
}

#[inline]
fn decode_texture_rgb565(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 2;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::RGB565.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = read_u16_be(src, base + (iy * 4 + ix) * 2);
                    let o = iy * row_bytes + (x + ix) * 2;
                    chunk[o..o + 2].copy_from_slice(&val.to_ne_bytes());
                }
            }
        }
    });
}

#[inline]
fn decode_texture_rgb565_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::RGB565.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = read_u16_be(src, base + (iy * 4 + ix) * 2);
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4].copy_from_slice(&decodepixel_rgb565(val).to_le_bytes());
                }
            }
        }
    });
}

#[inline]
fn decode_texture_rgb5a3_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::RGB5A3.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = read_u16_be(src, base + (iy * 4 + ix) * 2);
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4].copy_from_slice(&decodepixel_rgb5a3(val).to_le_bytes());
                }
            }
        }
    });
}

// A 64-byte RGBA8 block keeps the A,R byte pairs in its first half and the
// G,B pairs in its second.
#[inline]
fn decode_texture_rgba8_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::RGBA8.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let i = iy * 4 + ix;
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o] = src[base + 2 * i + 1];
                    chunk[o + 1] = src[base + 32 + 2 * i];
                    chunk[o + 2] = src[base + 32 + 2 * i + 1];
                    chunk[o + 3] = src[base + 2 * i];
                }
            }
        }
    });
}

#[inline]
fn decode_texture_c4(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    tlut: &[u8],
    tlutformat: PaletteFormat,
) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 8 * row_bytes, |band, chunk| {
        let t = band * 8;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::C4.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let val = src[base + (iy * 8 + ix) / 2];
                    let index = if ix & 1 == 0 { val >> 4 } else { val & 0xF };
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4]
                        .copy_from_slice(&lookup_tlut(tlut, index as usize, tlutformat).to_le_bytes());
                }
            }
        }
    });
}

#[inline]
fn decode_texture_c8(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    tlut: &[u8],
    tlutformat: PaletteFormat,
) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::C8.block_offset(x, t, width);
            let cols = 8.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let index = src[base + iy * 8 + ix] as usize;
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4]
                        .copy_from_slice(&lookup_tlut(tlut, index, tlutformat).to_le_bytes());
                }
            }
        }
    });
}

// C14X2 texels are big-endian halfwords whose top two bits are padding.
#[inline]
fn decode_texture_c14x2(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    tlut: &[u8],
    tlutformat: PaletteFormat,
) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 4 * row_bytes, |band, chunk| {
        let t = band * 4;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(4) {
            let base = TextureFormat::C14X2.block_offset(x, t, width);
            let cols = 4.min(width - x);
            for iy in 0..rows {
                for ix in 0..cols {
                    let index = (read_u16_be(src, base + (iy * 4 + ix) * 2) & 0x3FFF) as usize;
                    let o = iy * row_bytes + (x + ix) * 4;
                    chunk[o..o + 4]
                        .copy_from_slice(&lookup_tlut(tlut, index, tlutformat).to_le_bytes());
                }
            }
        }
    });
}

// A 32-byte CMPR block is four 8-byte compressed sub-blocks covering its
// 4x4 quadrants in top-left, top-right, bottom-left, bottom-right order.
// Selector bytes hold one row each, most significant pair leftmost.
#[inline]
fn decode_texture_cmpr_rgba(dst: &mut [u8], src: &[u8], width: usize, height: usize) {
    let row_bytes = width * 4;
    for_each_band(&mut dst[..height * row_bytes], 8 * row_bytes, |band, chunk| {
        let t = band * 8;
        let rows = chunk.len() / row_bytes;
        for x in (0..width).step_by(8) {
            let base = TextureFormat::CMPR.block_offset(x, t, width);
            for sub in 0..4 {
                let sx = x + (sub & 1) * 4;
                let sy = (sub >> 1) * 4;
                if sx >= width || sy >= rows {
                    continue;
                }
                let sub_src = &src[base + sub * 8..][..8];
                let colors = cmpr_colors(read_u16_be(sub_src, 0), read_u16_be(sub_src, 2));
                let cols = 4.min(width - sx);
                for iy in 0..4.min(rows - sy) {
                    let sel_row = sub_src[4 + iy];
                    for ix in 0..cols {
                        let sel = (sel_row >> (6 - 2 * ix)) & 3;
                        let o = (sy + iy) * row_bytes + (sx + ix) * 4;
                        chunk[o..o + 4].copy_from_slice(&colors[sel as usize].to_le_bytes());
                    }
                }
            }
        }
    });
}
