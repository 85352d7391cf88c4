use crate::pixel::{
    cmpr_colors, convert4to8, decodepixel_i8, decodepixel_ia4, decodepixel_ia8,
    decodepixel_rgb565, decodepixel_rgb5a3, lookup_tlut, read_u16_be,
};
use crate::types::{PaletteFormat, TextureFormat};

/// Decodes the single texel `(s, t)` of a block-tiled image into one RGBA32
/// pixel, reading only that texel's own block.
///
/// `image_width` is the texel width of the whole image; the block row pitch
/// is derived from it. The result is numerically identical to what a bulk
/// [`decode`](crate::decode) with `rgba_only` writes at the same coordinate.
/// An undefined `texformat` leaves `dst` untouched.
#[allow(clippy::too_many_arguments)]
pub fn decode_texel(
    dst: &mut [u8; 4],
    src: &[u8],
    s: usize,
    t: usize,
    image_width: usize,
    texformat: u32,
    tlut: &[u8],
    tlutformat: u32,
) {
    use TextureFormat::*;

    let Some(format) = TextureFormat::from_u32(texformat) else {
        return;
    };
    let tlutformat = PaletteFormat::from_u32_or_ia8(tlutformat);
    let base = format.block_offset(s, t, image_width);
    let rgba = match format {
        I4 => {
            let val = src[base + ((t & 7) * 8 + (s & 7)) / 2];
            let i = if s & 1 == 0 { val >> 4 } else { val & 0xF };
            decodepixel_i8(convert4to8(i))
        }
        I8 | Z8 => decodepixel_i8(src[base + (t & 3) * 8 + (s & 7)]),
        IA4 => decodepixel_ia4(src[base + (t & 3) * 8 + (s & 7)]),
        IA8 | Z16 => decodepixel_ia8(read_u16_be(src, base + ((t & 3) * 4 + (s & 3)) * 2)),
        RGB565 => decodepixel_rgb565(read_u16_be(src, base + ((t & 3) * 4 + (s & 3)) * 2)),
        RGB5A3 => decodepixel_rgb5a3(read_u16_be(src, base + ((t & 3) * 4 + (s & 3)) * 2)),
        RGBA8 | Z24X8 => {
            let i = (t & 3) * 4 + (s & 3);
            let a = src[base + 2 * i] as u32;
            let r = src[base + 2 * i + 1] as u32;
            let g = src[base + 32 + 2 * i] as u32;
            let b = src[base + 32 + 2 * i + 1] as u32;
            r | (g << 8) | (b << 16) | (a << 24)
        }
        C4 => {
            let val = src[base + ((t & 7) * 8 + (s & 7)) / 2];
            let index = if s & 1 == 0 { val >> 4 } else { val & 0xF };
            lookup_tlut(tlut, index as usize, tlutformat)
        }
        C8 => lookup_tlut(tlut, src[base + (t & 3) * 8 + (s & 7)] as usize, tlutformat),
        C14X2 => {
            let index = read_u16_be(src, base + ((t & 3) * 4 + (s & 3)) * 2) & 0x3FFF;
            lookup_tlut(tlut, index as usize, tlutformat)
        }
        CMPR => {
            // Quadrant sub-blocks in top-left, top-right, bottom-left,
            // bottom-right order; one selector byte per row.
            let sub = ((t & 4) >> 1) | ((s & 4) >> 2);
            let sub_src = &src[base + sub * 8..][..8];
            let colors = cmpr_colors(read_u16_be(sub_src, 0), read_u16_be(sub_src, 2));
            let sel = (sub_src[4 + (t & 3)] >> (6 - 2 * (s & 3))) & 3;
            colors[sel as usize]
        }
    };
    dst.copy_from_slice(&rgba.to_le_bytes());
}

/// Point variant of [`decode_rgba8_from_tmem`](crate::decode_rgba8_from_tmem):
/// one texel of an RGBA8 image whose A/R and G/B block halves live in
/// separate banks.
pub fn decode_texel_rgba8_from_tmem(
    dst: &mut [u8; 4],
    src_ar: &[u8],
    src_gb: &[u8],
    s: usize,
    t: usize,
    image_width: usize,
) {
    let base = TextureFormat::RGBA8.block_offset(s, t, image_width) / 2;
    let i = (t & 3) * 4 + (s & 3);
    let a = src_ar[base + 2 * i] as u32;
    let r = src_ar[base + 2 * i + 1] as u32;
    let g = src_gb[base + 2 * i] as u32;
    let b = src_gb[base + 2 * i + 1] as u32;
    dst.copy_from_slice(&(r | (g << 8) | (b << 16) | (a << 24)).to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_leaves_dst_alone() {
        let mut dst = [1, 2, 3, 4];
        decode_texel(&mut dst, &[0u8; 32], 0, 0, 8, 0x7, &[], 0);
        assert_eq!(dst, [1, 2, 3, 4]);
    }

    #[test]
    fn i4_reads_high_nibble_first() {
        let mut src = [0u8; 32];
        src[0] = 0xF0;
        let mut dst = [0u8; 4];
        decode_texel(&mut dst, &src, 0, 0, 8, 0x0, &[], 0);
        assert_eq!(dst, [0xFF; 4]);
        decode_texel(&mut dst, &src, 1, 0, 8, 0x0, &[], 0);
        assert_eq!(dst, [0; 4]);
    }

    #[test]
    fn cmpr_point_reads_its_quadrant() {
        // Only the bottom-right sub-block is populated: red/black in
        // four-color mode, one selector pair set in row 2.
        let mut src = [0u8; 32];
        src[24..26].copy_from_slice(&0xF800u16.to_be_bytes());
        src[30] = 0b0100_0000;
        let mut dst = [0u8; 4];
        decode_texel(&mut dst, &src, 4, 6, 8, 0xE, &[], 0);
        assert_eq!(dst, [0, 0, 0, 0xFF]);
        decode_texel(&mut dst, &src, 5, 6, 8, 0xE, &[], 0);
        assert_eq!(dst, [0xFF, 0, 0, 0xFF]);
    }

    #[test]
    fn tmem_point_matches_the_plane_split() {
        let mut ar = [0u8; 32];
        let mut gb = [0u8; 32];
        ar[10] = 0xAA;
        ar[11] = 0x11;
        gb[10] = 0x22;
        gb[11] = 0x33;
        let mut dst = [0u8; 4];
        decode_texel_rgba8_from_tmem(&mut dst, &ar, &gb, 1, 1, 4);
        assert_eq!(dst, [0x11, 0x22, 0x33, 0xAA]);
    }
}
