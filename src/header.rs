use std::io::{self, Read, Write};

use anyhow::ensure;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::vk_format::VkFormat;

pub(crate) const KTX2_IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x32, 0x30, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

/// Identifier plus nine little-endian words.
pub(crate) const HEADER_SIZE: u64 = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub vk_format: VkFormat,
    /// 1 for block-compressed formats.
    pub type_size: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub layer_count: u32,
    pub face_count: u32,
    pub level_count: u32,
    pub supercompression_scheme: u32,
}

impl Header {
    pub fn astc(vk_format: VkFormat, pixel_width: u32, pixel_height: u32) -> Self {
        Header {
            vk_format,
            type_size: 1,
            pixel_width,
            pixel_height,
            pixel_depth: 0,
            layer_count: 0,
            face_count: 1,
            level_count: 1,
            supercompression_scheme: 0,
        }
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&KTX2_IDENTIFIER)?;
        w.write_u32::<LittleEndian>(self.vk_format as u32)?;
        w.write_u32::<LittleEndian>(self.type_size)?;
        w.write_u32::<LittleEndian>(self.pixel_width)?;
        w.write_u32::<LittleEndian>(self.pixel_height)?;
        w.write_u32::<LittleEndian>(self.pixel_depth)?;
        w.write_u32::<LittleEndian>(self.layer_count)?;
        w.write_u32::<LittleEndian>(self.face_count)?;
        w.write_u32::<LittleEndian>(self.level_count)?;
        w.write_u32::<LittleEndian>(self.supercompression_scheme)
    }

    pub fn read_from<R: Read>(r: &mut R) -> anyhow::Result<Self> {
        let mut identifier = [0u8; 12];
        r.read_exact(&mut identifier)?;
        ensure!(identifier == KTX2_IDENTIFIER, "not a KTX2 file");

        let vk_format = VkFormat::try_from(r.read_u32::<LittleEndian>()?)?;
        Ok(Header {
            vk_format,
            type_size: r.read_u32::<LittleEndian>()?,
            pixel_width: r.read_u32::<LittleEndian>()?,
            pixel_height: r.read_u32::<LittleEndian>()?,
            pixel_depth: r.read_u32::<LittleEndian>()?,
            layer_count: r.read_u32::<LittleEndian>()?,
            face_count: r.read_u32::<LittleEndian>()?,
            level_count: r.read_u32::<LittleEndian>()?,
            supercompression_scheme: r.read_u32::<LittleEndian>()?,
        })
    }
}
