//! TPL texture archive reading. A TPL file is a little header table over one
//! or more encoded images, each with an optional palette.

use crate::decoding::decode;
use crate::types::{PaletteFormat, TextureFormat};
use binrw::prelude::*;
use image::RgbaImage;
use std::collections::BTreeMap;
use std::io::*;
use strum::Display;

#[derive(Debug, Default, Clone, Copy, BinRead, BinWrite)]
#[brw(big)]
pub struct FileHeader {
    pub identifier: u32,
    pub image_count: u32,
    pub image_offset: u32,
}

#[derive(Debug, Default, Clone, Copy, BinRead, BinWrite)]
#[brw(big)]
pub struct ImageOffset {
    pub image_header_offset: u32,
    pub palette_header_offset: u32,
}

impl ImageOffset {
    pub const fn has_palette(&self) -> bool {
        self.palette_header_offset > 0
    }
    pub fn load_palette<R: BinReaderExt>(&self, reader: &mut R) -> BinResult<Option<PaletteHeader>> {
        if !self.has_palette() {
            return Ok(None);
        }
        let pos = reader.stream_position()?;
        reader.seek(SeekFrom::Start(self.palette_header_offset as _))?;
        let res = Some(reader.read_be()?);
        reader.seek(SeekFrom::Start(pos))?;
        Ok(res)
    }
    pub fn load_image<R: BinReaderExt>(&self, reader: &mut R) -> BinResult<ImageHeader> {
        let pos = reader.stream_position()?;
        reader.seek(SeekFrom::Start(self.image_header_offset as _))?;
        let res = reader.read_be()?;
        reader.seek(SeekFrom::Start(pos))?;
        Ok(res)
    }
}

#[derive(Debug, Default, Clone, Copy, BinRead, BinWrite)]
#[brw(big)]
pub struct PaletteHeader {
    pub entry_count: u16,
    pub unpacked: u8,
    pub padding: u8,
    pub palette_format: PaletteFormat,
    pub palette_data_offset: u32,
}

#[derive(Debug, Default, Clone, Copy, BinRead, BinWrite, Display)]
#[brw(big, repr = u32)]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

#[derive(Debug, Default, Clone, Copy, BinRead, BinWrite, Display)]
#[brw(big, repr = u32)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
    // 2 to 5 only work as a min filter.
    NearestMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

#[derive(Debug, Default, Clone, Copy, BinRead, BinWrite)]
#[brw(big)]
pub struct ImageHeader {
    pub height: u16,
    pub width: u16,
    pub format: TextureFormat,
    pub image_data_offset: u32,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub lod_bias: f32,
    pub edge_lod_enable: u8,
    pub min_lod: u8,
    pub max_lod: u8,
    pub unpacked: u8,
}

impl ImageHeader {
    /// Size of the base-level image data, whole blocks included.
    pub const fn image_size(&self) -> usize {
        self.format
            .texture_size_in_bytes(self.width as usize, self.height as usize)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageNode {
    pub offset: ImageOffset,
    pub image_header: ImageHeader,
    pub palette_header: Option<PaletteHeader>,
}

impl ImageNode {
    pub fn read_info<R: BinReaderExt>(reader: &mut R) -> BinResult<Self> {
        let mut result = Self::default();
        let Self { offset, image_header, palette_header } = &mut result;
        *offset = reader.read_be()?;
        *image_header = offset.load_image(reader)?;
        *palette_header = offset.load_palette(reader)?;
        Ok(result)
    }
}

#[derive(Debug, Default, Clone)]
pub struct TPL {
    pub header: FileHeader,
    pub nodes: Vec<ImageNode>,
    pub image_datas: BTreeMap<u32, Vec<u8>>,
    pub palette_datas: BTreeMap<u32, Vec<u8>>,
}

impl TPL {
    pub fn get_node_info(&self, index: usize) -> (ImageHeader, Option<PaletteHeader>) {
        (self.nodes[index].image_header, self.nodes[index].palette_header)
    }

    /// Decodes image `index` to RGBA. Palettes shorter than the format's
    /// full index range are zero padded, matching hardware TLUT memory that
    /// simply was not written.
    pub fn get_image(&self, index: usize) -> Option<RgbaImage> {
        let (img, pal) = self.get_node_info(index);
        let ImageHeader { height, width, format, .. } = img;
        let (tlutformat, pal_off) = match pal {
            Some(pal) => (pal.palette_format, pal.palette_data_offset),
            None => (PaletteFormat::IA8, 0),
        };
        let src = &self.image_datas[&img.image_data_offset];
        let mut tlut = self.palette_datas.get(&pal_off).cloned().unwrap_or_default();
        let full = format.palette_size_in_bytes();
        if tlut.len() < full {
            tlut.resize(full, 0);
        }
        let mut buf = vec![0u8; width as usize * height as usize * 4];
        decode(
            &mut buf,
            src,
            width as _,
            height as _,
            format as u32,
            &tlut,
            tlutformat as u32,
            true,
        );
        RgbaImage::from_raw(width as _, height as _, buf)
    }

    pub fn read_info<R: BinReaderExt>(reader: &mut R) -> BinResult<Self> {
        let mut result = Self::default();
        let Self { header, nodes, image_datas, palette_datas } = &mut result;
        *header = reader.read_be()?;
        nodes.reserve_exact(header.image_count as _);
        reader.seek(SeekFrom::Start(header.image_offset as _))?;
        for _ in 0..header.image_count {
            nodes.push(ImageNode::read_info(reader)?);
        }
        for node in nodes.iter() {
            if let Some(palette) = node.palette_header {
                let size = palette.entry_count as usize * 2;
                let mut vec = vec![0u8; size];
                reader.seek(SeekFrom::Start(palette.palette_data_offset as _))?;
                reader.read_exact(&mut vec)?;
                palette_datas.insert(palette.palette_data_offset, vec);
            }
        }
        for node in nodes.iter() {
            reader.seek(SeekFrom::Start(node.image_header.image_data_offset as _))?;
            let size = node.image_header.image_size();
            let mut vec = vec![0u8; size];
            reader.read_exact(&mut vec)?;
            image_datas.insert(node.image_header.image_data_offset, vec);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_direct_color_image() {
        let mut cur = Cursor::new(Vec::new());
        FileHeader { identifier: 0x0020AF30, image_count: 1, image_offset: 12 }
            .write(&mut cur)
            .unwrap();
        ImageOffset { image_header_offset: 20, palette_header_offset: 0 }
            .write(&mut cur)
            .unwrap();
        ImageHeader {
            height: 4,
            width: 4,
            format: TextureFormat::RGB5A3,
            image_data_offset: 56,
            ..Default::default()
        }
        .write(&mut cur)
        .unwrap();
        cur.write_all(&[0xFF; 32]).unwrap();

        cur.set_position(0);
        let tpl = TPL::read_info(&mut cur).unwrap();
        assert_eq!(tpl.header.image_count, 1);
        assert_eq!(tpl.nodes[0].image_header.image_size(), 32);
        let image = tpl.get_image(0).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
        // 0xFFFF is opaque white in both RGB5A3 modes.
        assert!(image.pixels().all(|p| p.0 == [0xFF; 4]));
    }

    #[test]
    fn short_palettes_are_zero_padded() {
        let mut cur = Cursor::new(Vec::new());
        FileHeader { identifier: 0x0020AF30, image_count: 1, image_offset: 12 }
            .write(&mut cur)
            .unwrap();
        ImageOffset { image_header_offset: 32, palette_header_offset: 20 }
            .write(&mut cur)
            .unwrap();
        PaletteHeader {
            entry_count: 2,
            unpacked: 0,
            padding: 0,
            palette_format: PaletteFormat::IA8,
            palette_data_offset: 68,
        }
        .write(&mut cur)
        .unwrap();
        ImageHeader {
            height: 4,
            width: 4,
            format: TextureFormat::C8,
            image_data_offset: 72,
            ..Default::default()
        }
        .write(&mut cur)
        .unwrap();
        // Entry 0 = {a 0xFF, i 0x80}, entry 1 = {a 0, i 0xFF}.
        cur.write_all(&[0xFF, 0x80, 0x00, 0xFF]).unwrap();
        let mut indices = [1u8; 32];
        indices[0] = 0;
        cur.write_all(&indices).unwrap();

        cur.set_position(0);
        let tpl = TPL::read_info(&mut cur).unwrap();
        let image = tpl.get_image(0).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0x80, 0x80, 0x80, 0xFF]);
        assert_eq!(image.get_pixel(1, 0).0, [0xFF, 0xFF, 0xFF, 0x00]);
        assert_eq!(image.get_pixel(3, 3).0, [0xFF, 0xFF, 0xFF, 0x00]);
    }
}
