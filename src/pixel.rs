use crate::types::PaletteFormat;

// Channel widening by bit replication. The hardware fills the low bits of the
// widened value with the high bits of the source, so the maximum N-bit value
// maps to exactly 0xFF.
#[inline]
pub(crate) const fn convert3to8(v: u8) -> u8 {
    (v << 5) | (v << 2) | (v >> 1)
}
#[inline]
pub(crate) const fn convert4to8(v: u8) -> u8 {
    (v << 4) | v
}
#[inline]
pub(crate) const fn convert5to8(v: u8) -> u8 {
    (v << 3) | (v >> 2)
}
#[inline]
pub(crate) const fn convert6to8(v: u8) -> u8 {
    (v << 2) | (v >> 4)
}

#[inline]
pub(crate) fn read_u16_be(src: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([src[offset], src[offset + 1]])
}

// Packed output pixels are r | g<<8 | b<<16 | a<<24; written out with
// `u32::to_le_bytes` that is R,G,B,A byte order on every host.

/// Intensity-only texel: intensity feeds all four channels, alpha included.
#[inline]
pub(crate) const fn decodepixel_i8(val: u8) -> u32 {
    let i = val as u32;
    i | (i << 8) | (i << 16) | (i << 24)
}

/// One IA4 byte: high nibble alpha, low nibble intensity.
#[inline]
pub(crate) const fn decodepixel_ia4(val: u8) -> u32 {
    let i = convert4to8(val & 0xF) as u32;
    let a = convert4to8(val >> 4) as u32;
    i | (i << 8) | (i << 16) | (a << 24)
}

/// `val` is the big-endian-decoded halfword: high byte alpha, low intensity.
#[inline]
pub(crate) const fn decodepixel_ia8(val: u16) -> u32 {
    let i = (val & 0xFF) as u32;
    let a = (val >> 8) as u32;
    i | (i << 8) | (i << 16) | (a << 24)
}

#[inline]
pub(crate) const fn decodepixel_rgb565(val: u16) -> u32 {
    let r = convert5to8(((val >> 11) & 0x1f) as u8) as u32;
    let g = convert6to8(((val >> 5) & 0x3f) as u8) as u32;
    let b = convert5to8((val & 0x1f) as u8) as u32;
    let a = 0xFFu32;
    r | (g << 8) | (b << 16) | (a << 24)
}

/// Top bit set: opaque 5/5/5 RGB. Top bit clear: 3-bit alpha plus 4/4/4 RGB.
/// Getting this branch backwards is the classic decode bug for this format.
#[inline]
pub(crate) const fn decodepixel_rgb5a3(val: u16) -> u32 {
    let r;
    let g;
    let b;
    let a;
    if val & 0x8000 != 0 {
        r = convert5to8(((val >> 10) & 0x1f) as u8) as u32;
        g = convert5to8(((val >> 5) & 0x1f) as u8) as u32;
        b = convert5to8((val & 0x1f) as u8) as u32;
        a = 0xFFu32;
    } else {
        a = convert3to8(((val >> 12) & 0x7) as u8) as u32;
        r = convert4to8(((val >> 8) & 0xf) as u8) as u32;
        g = convert4to8(((val >> 4) & 0xf) as u8) as u32;
        b = convert4to8((val & 0xf) as u8) as u32;
    }
    r | (g << 8) | (b << 16) | (a << 24)
}

#[inline]
pub(crate) const fn decodepixel_paletted(val: u16, tlutfmt: PaletteFormat) -> u32 {
    match tlutfmt {
        PaletteFormat::IA8 => decodepixel_ia8(val),
        PaletteFormat::RGB565 => decodepixel_rgb565(val),
        PaletteFormat::RGB5A3 => decodepixel_rgb5a3(val),
    }
}

/// Resolves palette entry `index` to RGBA. `tlut` holds raw big-endian
/// halfword entries and must cover the full index range of the texture
/// format being decoded.
#[inline]
pub(crate) fn lookup_tlut(tlut: &[u8], index: usize, tlutfmt: PaletteFormat) -> u32 {
    decodepixel_paletted(read_u16_be(tlut, index * 2), tlutfmt)
}

#[inline]
const fn cmpr_blend(from: i32, to: i32) -> u32 {
    let d = to - from;
    (from + d / 2 - d / 8) as u32
}

/// Derives the four selector colors of one 8-byte compressed sub-block from
/// its two raw (big-endian-decoded) RGB565 base colors.
///
/// `c1 > c2` selects four-color mode, both derived colors opaque. Otherwise
/// the third derived color is the rounded average and the fourth is color2
/// with alpha forced to zero, which is what sets this codec apart from stock
/// DXT1.
pub(crate) fn cmpr_colors(c1: u16, c2: u16) -> [u32; 4] {
    let r1 = convert5to8(((c1 >> 11) & 0x1f) as u8) as i32;
    let g1 = convert6to8(((c1 >> 5) & 0x3f) as u8) as i32;
    let b1 = convert5to8((c1 & 0x1f) as u8) as i32;
    let r2 = convert5to8(((c2 >> 11) & 0x1f) as u8) as i32;
    let g2 = convert6to8(((c2 >> 5) & 0x3f) as u8) as i32;
    let b2 = convert5to8((c2 & 0x1f) as u8) as i32;

    let mut colors = [0u32; 4];
    colors[0] = r1 as u32 | ((g1 as u32) << 8) | ((b1 as u32) << 16) | (0xFF << 24);
    colors[1] = r2 as u32 | ((g2 as u32) << 8) | ((b2 as u32) << 16) | (0xFF << 24);
    if c1 > c2 {
        colors[2] = cmpr_blend(r1, r2)
            | (cmpr_blend(g1, g2) << 8)
            | (cmpr_blend(b1, b2) << 16)
            | (0xFF << 24);
        colors[3] = cmpr_blend(r2, r1)
            | (cmpr_blend(g2, g1) << 8)
            | (cmpr_blend(b2, b1) << 16)
            | (0xFF << 24);
    } else {
        colors[2] = ((r1 + r2 + 1) / 2) as u32
            | ((((g1 + g2 + 1) / 2) as u32) << 8)
            | ((((b1 + b2 + 1) / 2) as u32) << 16)
            | (0xFF << 24);
        colors[3] = r2 as u32 | ((g2 as u32) << 8) | ((b2 as u32) << 16);
    }
    colors
}
