use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub(crate) const LEVEL_INDEX_ENTRY_SIZE: u64 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Level {
    pub byte_offset: u64,
    pub byte_length: u64,
    pub uncompressed_byte_length: u64,
}

impl Level {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u64::<LittleEndian>(self.byte_offset)?;
        w.write_u64::<LittleEndian>(self.byte_length)?;
        w.write_u64::<LittleEndian>(self.uncompressed_byte_length)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Level {
            byte_offset: r.read_u64::<LittleEndian>()?,
            byte_length: r.read_u64::<LittleEndian>()?,
            uncompressed_byte_length: r.read_u64::<LittleEndian>()?,
        })
    }
}
