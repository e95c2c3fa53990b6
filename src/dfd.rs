use std::io::{self, Read, Write};

use anyhow::ensure;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::bits::BLOCK_SIZE_BYTES;
use crate::vk_format::VkFormat;

pub(crate) const KHR_DF_MODEL_ASTC: u32 = 162;
const KHR_DF_PRIMARIES_BT709: u32 = 1;
const KHR_DF_TRANSFER_LINEAR: u32 = 1;
const KHR_DF_TRANSFER_SRGB: u32 = 2;
const KHR_DF_VERSION: u32 = 2;

const DESCRIPTOR_HEADER_SIZE: u32 = 24;
const SAMPLE_SIZE: u32 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DFDSampleType {
    pub row_0: u32,
    pub row_1: u32,
    pub row_2: u32,
    pub row_3: u32,
}

/// A Khronos basic data format descriptor block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BasicDataFormatDescriptor {
    pub row_0: u32,
    pub row_1: u32,
    pub row_2: u32,
    pub row_3: u32,
    pub row_4: u32,
    pub row_5: u32,
    pub samples: Vec<DFDSampleType>,
}

impl BasicDataFormatDescriptor {
    /// Descriptor for a 2D ASTC format: one 128-bit sample covering the whole block.
    pub fn astc(format: VkFormat) -> Self {
        let (block_width, block_height) = format.block_size();
        let transfer = if format.is_srgb() {
            KHR_DF_TRANSFER_SRGB
        } else {
            KHR_DF_TRANSFER_LINEAR
        };
        let block_bits = BLOCK_SIZE_BYTES as u32 * 8;

        BasicDataFormatDescriptor {
            row_0: 0,
            row_1: KHR_DF_VERSION | (DESCRIPTOR_HEADER_SIZE + SAMPLE_SIZE) << 16,
            row_2: KHR_DF_MODEL_ASTC | KHR_DF_PRIMARIES_BT709 << 8 | transfer << 16,
            row_3: (block_width - 1) | (block_height - 1) << 8,
            row_4: BLOCK_SIZE_BYTES as u32,
            row_5: 0,
            samples: vec![DFDSampleType {
                // Bit offset 0, channel type ASTC data.
                row_0: (block_bits - 1) << 16,
                row_1: 0,
                row_2: 0,
                row_3: u32::MAX,
            }],
        }
    }

    pub fn color_model(&self) -> u32 {
        self.row_2 & 0xFF
    }

    pub fn transfer_function(&self) -> u32 {
        (self.row_2 >> 16) & 0xFF
    }

    pub fn is_srgb(&self) -> bool {
        self.transfer_function() == KHR_DF_TRANSFER_SRGB
    }

    pub fn texel_block_dimensions(&self) -> (u32, u32) {
        ((self.row_3 & 0xFF) + 1, ((self.row_3 >> 8) & 0xFF) + 1)
    }

    fn block_size(&self) -> u32 {
        self.row_1 >> 16
    }

    /// Size of the whole DFD section, including its leading total-size word.
    pub fn total_size(&self) -> u32 {
        4 + DESCRIPTOR_HEADER_SIZE + SAMPLE_SIZE * self.samples.len() as u32
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.total_size())?;
        for row in [self.row_0, self.row_1, self.row_2, self.row_3, self.row_4, self.row_5] {
            w.write_u32::<LittleEndian>(row)?;
        }
        for sample in &self.samples {
            w.write_u32::<LittleEndian>(sample.row_0)?;
            w.write_u32::<LittleEndian>(sample.row_1)?;
            w.write_u32::<LittleEndian>(sample.row_2)?;
            w.write_u32::<LittleEndian>(sample.row_3)?;
        }
        Ok(())
    }

    /// Reads the first descriptor block of a DFD section.
    pub fn read_from<R: Read>(r: &mut R) -> anyhow::Result<Self> {
        let total_size = r.read_u32::<LittleEndian>()?;
        let mut descriptor = BasicDataFormatDescriptor {
            row_0: r.read_u32::<LittleEndian>()?,
            row_1: r.read_u32::<LittleEndian>()?,
            row_2: r.read_u32::<LittleEndian>()?,
            row_3: r.read_u32::<LittleEndian>()?,
            row_4: r.read_u32::<LittleEndian>()?,
            row_5: r.read_u32::<LittleEndian>()?,
            samples: Vec::new(),
        };
        let block_size = descriptor.block_size();
        ensure!(
            block_size >= DESCRIPTOR_HEADER_SIZE && block_size + 4 <= total_size,
            "malformed data format descriptor (block size {block_size}, total {total_size})"
        );
        for _ in 0..(block_size - DESCRIPTOR_HEADER_SIZE) / SAMPLE_SIZE {
            descriptor.samples.push(DFDSampleType {
                row_0: r.read_u32::<LittleEndian>()?,
                row_1: r.read_u32::<LittleEndian>()?,
                row_2: r.read_u32::<LittleEndian>()?,
                row_3: r.read_u32::<LittleEndian>()?,
            });
        }
        Ok(descriptor)
    }
}
