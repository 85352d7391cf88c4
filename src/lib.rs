//! Decoder for the GameCube/Wii GX texture formats.
//!
//! GX images are stored as a row-major grid of small blocks (8x8, 8x4 or
//! 4x4 texels depending on the format), each block holding its texels
//! contiguously. This crate turns those block-tiled, bit-packed, optionally
//! palette-indexed encodings into linear pixel buffers: [`decode`] converts
//! a whole image, [`decode_texel`] fetches one texel at random, and both
//! are guaranteed to produce identical pixels. The [`tpl`] module layers
//! the TPL archive container on top.
//!
//! Format and palette-format parameters are the raw hardware register
//! values, so a register dump can be fed straight in; undefined values
//! report sentinel capabilities instead of failing.
//!
//! ```rust
//! // One 128x128 C8 image occupies 16 KiB plus its palette.
//! assert_eq!(gx_texdec::texture_size_in_bytes(128, 128, 0x9), 16384);
//! assert_eq!(gx_texdec::palette_size_in_bytes(0x9), 512);
//! ```

mod decoding;
mod pixel;
mod texel;
pub mod tpl;
mod types;

pub use decoding::{decode, decode_rgba8_from_tmem};
pub use texel::{decode_texel, decode_texel_rgba8_from_tmem};
pub use tpl::TPL;
pub use types::{
    DecodedFormat, PaletteFormat, TextureFormat, block_height_in_texels, block_width_in_texels,
    palette_size_in_bytes, texel_size_in_nibbles, texture_size_in_bytes,
};
