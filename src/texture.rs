use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{bail, ensure, Context};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::bits::BLOCK_SIZE_BYTES;
use crate::dfd::{BasicDataFormatDescriptor, KHR_DF_MODEL_ASTC};
use crate::header::{Header, HEADER_SIZE};
use crate::index::{Index, INDEX_SIZE};
use crate::level::{Level, LEVEL_INDEX_ENTRY_SIZE};
use crate::vk_format::VkFormat;

const WRITER_KEY: &str = "KTXwriter";

/// Mip level data of block-compressed formats is aligned to the block size.
const LEVEL_ALIGNMENT: u64 = BLOCK_SIZE_BYTES as u64;

fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// The `length` bytes at `offset`, if the buffer holds them.
fn section(buffer: &[u8], offset: u64, length: u64) -> Option<&[u8]> {
    let start = usize::try_from(offset).ok()?;
    let end = start.checked_add(usize::try_from(length).ok()?)?;
    buffer.get(start..end)
}

/// One key/value entry: length word, `key\0value\0`, zero padding to four bytes.
fn key_value_entry(key: &str, value: &str) -> Vec<u8> {
    let length = key.len() + value.len() + 2;
    let mut entry = Vec::with_capacity(4 + align_up(length as u64, 4) as usize);
    entry.extend_from_slice(&(length as u32).to_le_bytes());
    entry.extend_from_slice(key.as_bytes());
    entry.push(0);
    entry.extend_from_slice(value.as_bytes());
    entry.push(0);
    entry.resize(4 + align_up(length as u64, 4) as usize, 0);
    entry
}

/// A single-level 2D KTX2 texture holding raw ASTC blocks in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AstcTextureKtx2 {
    header: Header,
    index: Index,
    df_descriptor_block: BasicDataFormatDescriptor,
    key_and_value_data: Vec<u8>,
    level_images: Vec<u8>,
}

impl AstcTextureKtx2 {
    /// A zero-filled texture covering `width`x`height` texels.
    pub fn new(format: VkFormat, width: u32, height: u32) -> Self {
        let (block_width, block_height) = format.block_size();
        let blocks = width.div_ceil(block_width) as usize * height.div_ceil(block_height) as usize;
        Self::assemble(format, width, height, vec![0u8; blocks * BLOCK_SIZE_BYTES])
    }

    /// Wraps `data`, exactly `blocks_wide * blocks_high` blocks, in a texture.
    pub fn from_blocks(format: VkFormat, blocks_wide: u32, blocks_high: u32, data: Vec<u8>) -> anyhow::Result<Self> {
        let expected = blocks_wide as usize * blocks_high as usize * BLOCK_SIZE_BYTES;
        ensure!(
            data.len() == expected,
            "{blocks_wide}x{blocks_high} blocks need {expected} bytes, got {}",
            data.len()
        );
        let (block_width, block_height) = format.block_size();
        Ok(Self::assemble(format, blocks_wide * block_width, blocks_high * block_height, data))
    }

    fn assemble(format: VkFormat, width: u32, height: u32, level_images: Vec<u8>) -> Self {
        let df_descriptor_block = BasicDataFormatDescriptor::astc(format);
        let key_and_value_data = key_value_entry(
            WRITER_KEY,
            concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION")),
        );

        let dfd_byte_offset = HEADER_SIZE + INDEX_SIZE + LEVEL_INDEX_ENTRY_SIZE;
        let dfd_byte_length = df_descriptor_block.total_size() as u64;
        let kvd_byte_offset = dfd_byte_offset + dfd_byte_length;
        let kvd_byte_length = key_and_value_data.len() as u64;
        let level_offset = align_up(kvd_byte_offset + kvd_byte_length, LEVEL_ALIGNMENT);
        let level_length = level_images.len() as u64;

        AstcTextureKtx2 {
            header: Header::astc(format, width, height),
            index: Index {
                dfd_byte_offset: dfd_byte_offset as u32,
                dfd_byte_length: dfd_byte_length as u32,
                kvd_byte_offset: kvd_byte_offset as u32,
                kvd_byte_length: kvd_byte_length as u32,
                sgd_byte_offset: 0,
                sgd_byte_length: 0,
                levels: vec![Level {
                    byte_offset: level_offset,
                    byte_length: level_length,
                    uncompressed_byte_length: level_length,
                }],
            },
            df_descriptor_block,
            key_and_value_data,
            level_images,
        }
    }

    pub fn format(&self) -> VkFormat {
        self.header.vk_format
    }

    pub fn width(&self) -> u32 {
        self.header.pixel_width
    }

    pub fn height(&self) -> u32 {
        self.header.pixel_height
    }

    pub fn blocks_wide(&self) -> u32 {
        self.header.pixel_width.div_ceil(self.format().block_size().0)
    }

    pub fn blocks_high(&self) -> u32 {
        self.header.pixel_height.div_ceil(self.format().block_size().1)
    }

    /// The raw block stream of the base level.
    pub fn blocks(&self) -> &[u8] {
        &self.level_images
    }

    fn block_range(&self, x: u32, y: u32) -> std::ops::Range<usize> {
        assert!(
            x < self.blocks_wide() && y < self.blocks_high(),
            "block ({x}, {y}) outside {}x{} blocks",
            self.blocks_wide(),
            self.blocks_high()
        );
        let start = (y as usize * self.blocks_wide() as usize + x as usize) * BLOCK_SIZE_BYTES;
        start..start + BLOCK_SIZE_BYTES
    }

    pub fn read_block(&self, x: u32, y: u32) -> [u8; BLOCK_SIZE_BYTES] {
        let mut block = [0u8; BLOCK_SIZE_BYTES];
        block.copy_from_slice(&self.level_images[self.block_range(x, y)]);
        block
    }

    pub fn write_block(&mut self, x: u32, y: u32, block: &[u8; BLOCK_SIZE_BYTES]) {
        let range = self.block_range(x, y);
        self.level_images[range].copy_from_slice(block);
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> anyhow::Result<()> {
        self.header.write_to(w)?;
        self.index.write_to(w)?;
        self.df_descriptor_block.write_to(w)?;
        w.write_all(&self.key_and_value_data)?;

        let written = self.index.kvd_byte_offset as u64 + self.index.kvd_byte_length as u64;
        let padding = self.index.levels[0].byte_offset - written;
        for _ in 0..padding {
            w.write_u8(0)?;
        }
        w.write_all(&self.level_images)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.index.levels[0].byte_offset as usize + self.level_images.len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_to_ktx2(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        debug!(
            "wrote {} ({} {}x{} blocks, {} bytes)",
            path.display(),
            self.format(),
            self.blocks_wide(),
            self.blocks_high(),
            bytes.len()
        );
        Ok(())
    }

    pub fn from_bytes(buffer: &[u8]) -> anyhow::Result<Self> {
        let mut reader = Cursor::new(buffer);
        let header = Header::read_from(&mut reader)?;
        ensure!(
            header.supercompression_scheme == 0,
            "supercompression scheme {} is not supported",
            header.supercompression_scheme
        );
        ensure!(
            header.pixel_depth == 0 && header.face_count == 1,
            "only 2D textures with one face are supported"
        );
        let index = Index::read_from(&mut reader, header.level_count)?;

        reader.set_position(index.dfd_byte_offset as u64);
        let df_descriptor_block = BasicDataFormatDescriptor::read_from(&mut reader)?;
        if df_descriptor_block.color_model() != KHR_DF_MODEL_ASTC {
            bail!("color model {} is not ASTC", df_descriptor_block.color_model());
        }
        ensure!(
            df_descriptor_block.texel_block_dimensions() == header.vk_format.block_size(),
            "descriptor block dimensions {:?} do not match {}",
            df_descriptor_block.texel_block_dimensions(),
            header.vk_format
        );
        ensure!(
            df_descriptor_block.is_srgb() == header.vk_format.is_srgb(),
            "descriptor transfer function {} does not match {}",
            df_descriptor_block.transfer_function(),
            header.vk_format
        );

        let key_and_value_data =
            section(buffer, index.kvd_byte_offset as u64, index.kvd_byte_length as u64)
                .context("key/value data is out of bounds")?
                .to_vec();

        let level = index.levels[0];
        let (block_width, block_height) = header.vk_format.block_size();
        let expected = (header.pixel_width.div_ceil(block_width) as u64)
            .checked_mul(header.pixel_height.div_ceil(block_height) as u64)
            .and_then(|blocks| blocks.checked_mul(BLOCK_SIZE_BYTES as u64))
            .with_context(|| {
                format!(
                    "{}x{} pixels is too large",
                    header.pixel_width, header.pixel_height
                )
            })?;
        ensure!(
            level.byte_length == expected,
            "level 0 holds {} bytes, expected {expected}",
            level.byte_length
        );
        let level_images = section(buffer, level.byte_offset, level.byte_length)
            .context("level 0 data is truncated")?
            .to_vec();

        Ok(AstcTextureKtx2 {
            header,
            index,
            df_descriptor_block,
            key_and_value_data,
            level_images,
        })
    }

    pub fn read_from_ktx2(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let buffer = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_bytes(&buffer).with_context(|| format!("parsing {}", path.display()))
    }

    /// Value of a key/value entry, without its trailing NUL.
    pub fn key_value(&self, key: &str) -> Option<&[u8]> {
        let mut reader = Cursor::new(self.key_and_value_data.as_slice());
        while let Ok(length) = reader.read_u32::<LittleEndian>() {
            let start = reader.position() as usize;
            let end = start.checked_add(length as usize)?;
            let entry = self.key_and_value_data.get(start..end)?;
            let split = entry.iter().position(|&b| b == 0)?;
            if &entry[..split] == key.as_bytes() {
                let value = &entry[split + 1..];
                return Some(value.strip_suffix(&[0u8]).unwrap_or(value));
            }
            reader.set_position(align_up(end as u64, 4));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::void_extent::{encode_void_extent, VoidExtentParams};

    #[test]
    fn layout_of_small_texture() {
        let tex = AstcTextureKtx2::new(VkFormat::ASTC_8x8_UNORM_BLOCK, 20, 9);
        assert_eq!((tex.blocks_wide(), tex.blocks_high()), (3, 2));
        let bytes = tex.to_bytes().unwrap();

        assert_eq!(&bytes[..12], &crate::header::KTX2_IDENTIFIER);
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 171);
        // typeSize
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 1);
        // dfdByteOffset directly after the single level index entry.
        assert_eq!(u32::from_le_bytes(bytes[48..52].try_into().unwrap()), 104);
        // Color model byte of the descriptor.
        assert_eq!(bytes[104 + 4 + 8], 162);

        let level_offset = u64::from_le_bytes(bytes[80..88].try_into().unwrap());
        assert_eq!(level_offset % 16, 0);
        assert_eq!(bytes.len() as u64, level_offset + 6 * 16);
    }

    #[test]
    fn blocks_survive_a_round_trip() {
        let mut tex = AstcTextureKtx2::new(VkFormat::ASTC_5x4_SRGB_BLOCK, 10, 8);
        let block = encode_void_extent(&VoidExtentParams::ldr(1, 2, 3, 4));
        tex.write_block(1, 1, &block);

        let read = AstcTextureKtx2::from_bytes(&tex.to_bytes().unwrap()).unwrap();
        assert_eq!(read, tex);
        assert_eq!(read.format(), VkFormat::ASTC_5x4_SRGB_BLOCK);
        assert_eq!(read.read_block(1, 1), block);
        assert_eq!(read.read_block(0, 0), [0u8; 16]);
    }

    #[test]
    fn writer_key_is_recorded() {
        let tex = AstcTextureKtx2::new(VkFormat::ASTC_4x4_UNORM_BLOCK, 4, 4);
        let writer = tex.key_value("KTXwriter").unwrap();
        assert!(writer.starts_with(env!("CARGO_PKG_NAME").as_bytes()));
        assert_eq!(tex.key_value("KTXorientation"), None);
    }

    #[test]
    fn from_blocks_checks_length() {
        assert!(AstcTextureKtx2::from_blocks(VkFormat::ASTC_4x4_UNORM_BLOCK, 2, 2, vec![0; 48]).is_err());
        let tex = AstcTextureKtx2::from_blocks(VkFormat::ASTC_6x6_UNORM_BLOCK, 2, 1, vec![7; 32]).unwrap();
        assert_eq!((tex.width(), tex.height()), (12, 6));
        assert_eq!(tex.blocks(), &[7u8; 32][..]);
    }

    #[test]
    fn rejects_foreign_data() {
        let mut bytes = AstcTextureKtx2::new(VkFormat::ASTC_4x4_UNORM_BLOCK, 4, 4).to_bytes().unwrap();
        assert!(AstcTextureKtx2::from_bytes(&bytes[..60]).is_err());
        bytes[0] = 0;
        assert!(AstcTextureKtx2::from_bytes(&bytes).is_err());
    }

    #[test]
    #[should_panic]
    fn write_outside_texture_panics() {
        let mut tex = AstcTextureKtx2::new(VkFormat::ASTC_4x4_UNORM_BLOCK, 4, 4);
        tex.write_block(1, 0, &[0; 16]);
    }
}
