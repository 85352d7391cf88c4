use binrw::prelude::*;
use strum::Display;

/// Texture formats of the GX texture units, with their hardware register
/// values. `Z8`/`Z16`/`Z24X8` are the depth-texture variants; they decode
/// exactly like `I8`/`IA8`/`RGBA8`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, BinRead, BinWrite, Display)]
#[brw(big, repr = u32)]
#[repr(u32)]
pub enum TextureFormat {
    I4 = 0x0,
    I8 = 0x1,
    IA4 = 0x2,
    IA8 = 0x3,
    RGB565 = 0x4,
    #[default]
    RGB5A3 = 0x5,
    RGBA8 = 0x6,

    C4 = 0x8,
    C8 = 0x9,
    C14X2 = 0xA,
    CMPR = 0xE,

    Z8 = 0x11,
    Z16 = 0x13,
    Z24X8 = 0x16,
}

impl TextureFormat {
    pub const fn from_u32(val: u32) -> Option<Self> {
        match val {
            0x0 => Some(Self::I4),
            0x1 => Some(Self::I8),
            0x2 => Some(Self::IA4),
            0x3 => Some(Self::IA8),
            0x4 => Some(Self::RGB565),
            0x5 => Some(Self::RGB5A3),
            0x6 => Some(Self::RGBA8),
            0x8 => Some(Self::C4),
            0x9 => Some(Self::C8),
            0xA => Some(Self::C14X2),
            0xE => Some(Self::CMPR),
            0x11 => Some(Self::Z8),
            0x13 => Some(Self::Z16),
            0x16 => Some(Self::Z24X8),
            _ => None,
        }
    }

    /// Texel size in nibbles (half-bytes). Every format packs a whole number
    /// of bytes per block, so odd nibble counts are fine.
    pub const fn texel_size_in_nibbles(self) -> usize {
        match self {
            Self::I4 | Self::C4 | Self::CMPR => 1,
            Self::I8 | Self::IA4 | Self::C8 | Self::Z8 => 2,
            Self::IA8 | Self::RGB565 | Self::RGB5A3 | Self::C14X2 | Self::Z16 => 4,
            Self::RGBA8 | Self::Z24X8 => 8,
        }
    }

    pub const fn block_width_in_texels(self) -> usize {
        match self {
            Self::I4 | Self::I8 | Self::IA4 | Self::C4 | Self::C8 | Self::Z8 | Self::CMPR => 8,
            _ => 4,
        }
    }

    pub const fn block_height_in_texels(self) -> usize {
        match self {
            Self::I4 | Self::C4 | Self::CMPR => 8,
            _ => 4,
        }
    }

    pub const fn bytes_per_block(self) -> usize {
        self.block_width_in_texels() * self.block_height_in_texels() * self.texel_size_in_nibbles()
            / 2
    }

    /// Size of a full palette for this format: one big-endian `u16` per
    /// reachable index. 0 for formats that carry color directly.
    pub const fn palette_size_in_bytes(self) -> usize {
        match self {
            Self::C4 => 16 * 2,
            Self::C8 => 256 * 2,
            Self::C14X2 => 16384 * 2,
            _ => 0,
        }
    }

    /// Encoded size of a `width` x `height` image. Partial blocks at the
    /// right/bottom edges are stored in full.
    pub const fn texture_size_in_bytes(self, width: usize, height: usize) -> usize {
        width.div_ceil(self.block_width_in_texels())
            * height.div_ceil(self.block_height_in_texels())
            * self.bytes_per_block()
    }

    /// Encoded size of a mip chain of `levels` images, halving each level
    /// down to (at most) 1x1.
    pub fn texture_size_in_bytes_mip(self, width: usize, height: usize, levels: usize) -> usize {
        let (mut width, mut height) = (width, height);
        let mut size = 0;
        for _ in 0..levels {
            size += self.texture_size_in_bytes(width, height);
            if width == 1 && height == 1 {
                break;
            }
            width = (width / 2).max(1);
            height = (height / 2).max(1);
        }
        size
    }

    /// Byte offset of the tiled block holding texel `(s, t)` in an image
    /// `width` texels wide. Blocks are stored row-major over the block grid,
    /// `ceil(width / blockWidth)` blocks per row. Both the bulk decoder and
    /// the single-texel decoder address source data through this one
    /// function, so the two paths cannot disagree on layout.
    pub(crate) const fn block_offset(self, s: usize, t: usize, width: usize) -> usize {
        let row_blocks = width.div_ceil(self.block_width_in_texels());
        let block =
            (t / self.block_height_in_texels()) * row_blocks + s / self.block_width_in_texels();
        block * self.bytes_per_block()
    }
}

/// Entry format of a texture lookup table (TLUT). The hardware field is two
/// bits wide with three defined encodings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, BinRead, BinWrite, Display)]
#[brw(big, repr = u32)]
pub enum PaletteFormat {
    #[default]
    IA8,
    RGB565,
    RGB5A3,
}

impl PaletteFormat {
    pub const fn from_u32(val: u32) -> Option<Self> {
        match val {
            0 => Some(Self::IA8),
            1 => Some(Self::RGB565),
            2 => Some(Self::RGB5A3),
            _ => None,
        }
    }

    /// The undefined fourth encoding of the 2-bit field has no documented
    /// behavior; it decodes as IA8 here so that garbage register values stay
    /// deterministic.
    pub const fn from_u32_or_ia8(val: u32) -> Self {
        match Self::from_u32(val) {
            Some(fmt) => fmt,
            None => Self::IA8,
        }
    }
}

/// Concrete pixel layout produced by a bulk decode. Callers must branch on
/// this to interpret the destination bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DecodedFormat {
    /// Unknown source format; nothing was written.
    None,
    /// One byte per pixel: intensity.
    I8,
    /// Two bytes per pixel: intensity, then alpha.
    IA8,
    /// One native-endian 5/6/5 `u16` per pixel.
    RGB565,
    /// Four bytes per pixel: R, G, B, A on every host.
    RGBA32,
}

impl DecodedFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::None => 0,
            Self::I8 => 1,
            Self::IA8 | Self::RGB565 => 2,
            Self::RGBA32 => 4,
        }
    }
}

/// Texel size for a raw format register value, in nibbles.
///
/// The hardware format field is wider than the defined enumeration, so
/// undefined values report a size of 1 nibble rather than failing. Callers
/// that need strict validation should go through [`TextureFormat::from_u32`].
pub fn texel_size_in_nibbles(format: u32) -> usize {
    match TextureFormat::from_u32(format) {
        Some(fmt) => fmt.texel_size_in_nibbles(),
        None => 1,
    }
}

/// Block width for a raw format register value; undefined values report 8.
pub fn block_width_in_texels(format: u32) -> usize {
    match TextureFormat::from_u32(format) {
        Some(fmt) => fmt.block_width_in_texels(),
        None => 8,
    }
}

/// Block height for a raw format register value; undefined values report 8.
pub fn block_height_in_texels(format: u32) -> usize {
    match TextureFormat::from_u32(format) {
        Some(fmt) => fmt.block_height_in_texels(),
        None => 8,
    }
}

/// Encoded image size for a raw format register value. Undefined values use
/// the sentinel capability entries (1 nibble, 8x8 blocks).
pub fn texture_size_in_bytes(width: usize, height: usize, format: u32) -> usize {
    match TextureFormat::from_u32(format) {
        Some(fmt) => fmt.texture_size_in_bytes(width, height),
        None => width.div_ceil(8) * height.div_ceil(8) * 32,
    }
}

/// Full palette size for a raw format register value; 0 for direct-color
/// and undefined values.
pub fn palette_size_in_bytes(format: u32) -> usize {
    match TextureFormat::from_u32(format) {
        Some(fmt) => fmt.palette_size_in_bytes(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_bytes_are_whole() {
        for raw in 0..0x17 {
            if let Some(fmt) = TextureFormat::from_u32(raw) {
                let bits = fmt.block_width_in_texels()
                    * fmt.block_height_in_texels()
                    * fmt.texel_size_in_nibbles()
                    * 4;
                assert_eq!(bits % 8, 0, "{fmt}");
                assert_eq!(fmt.bytes_per_block(), bits / 8, "{fmt}");
            }
        }
    }

    #[test]
    fn capability_table_values() {
        assert_eq!(TextureFormat::I4.bytes_per_block(), 32);
        assert_eq!(TextureFormat::RGBA8.bytes_per_block(), 64);
        assert_eq!(TextureFormat::CMPR.bytes_per_block(), 32);
        assert_eq!(TextureFormat::C8.texture_size_in_bytes(128, 128), 16384);
        assert_eq!(TextureFormat::CMPR.texture_size_in_bytes(4, 4), 32);
        assert_eq!(TextureFormat::RGB565.texture_size_in_bytes(1, 1), 32);
    }

    #[test]
    fn mip_chain_size() {
        // 1000x1000 I8 over five levels, each level rounding to whole blocks.
        assert_eq!(
            TextureFormat::I8.texture_size_in_bytes_mip(1000, 1000, 5),
            1_336_992
        );
        // The chain stops once it reaches 1x1.
        assert_eq!(
            TextureFormat::CMPR.texture_size_in_bytes_mip(16, 16, 99),
            128 + 32 + 32 + 32 + 32
        );
    }

    #[test]
    fn raw_field_queries_are_permissive() {
        assert_eq!(texel_size_in_nibbles(0xE), 1);
        assert_eq!(texel_size_in_nibbles(0x7), 1);
        assert_eq!(texel_size_in_nibbles(0x3F), 1);
        assert_eq!(block_width_in_texels(0x6), 4);
        assert_eq!(block_width_in_texels(0xB), 8);
        assert_eq!(palette_size_in_bytes(0x9), 512);
        assert_eq!(palette_size_in_bytes(0x4), 0);
        assert_eq!(texture_size_in_bytes(8, 8, 0x7), 32);
    }

    #[test]
    fn block_offsets_walk_row_major() {
        let fmt = TextureFormat::RGB5A3;
        // 10 texels wide means 3 blocks per row of 4x4 blocks.
        assert_eq!(fmt.block_offset(0, 0, 10), 0);
        assert_eq!(fmt.block_offset(3, 3, 10), 0);
        assert_eq!(fmt.block_offset(4, 0, 10), 32);
        assert_eq!(fmt.block_offset(9, 0, 10), 64);
        assert_eq!(fmt.block_offset(0, 4, 10), 96);
        assert_eq!(fmt.block_offset(5, 9, 10), 32 * 7);
    }
}
