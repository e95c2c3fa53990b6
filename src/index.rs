use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::level::Level;

pub(crate) const INDEX_SIZE: u64 = 32;

/// Section offsets following the header, then one entry per mip level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Index {
    pub dfd_byte_offset: u32,
    pub dfd_byte_length: u32,
    pub kvd_byte_offset: u32,
    pub kvd_byte_length: u32,
    pub sgd_byte_offset: u64,
    pub sgd_byte_length: u64,
    pub levels: Vec<Level>,
}

impl Index {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.dfd_byte_offset)?;
        w.write_u32::<LittleEndian>(self.dfd_byte_length)?;
        w.write_u32::<LittleEndian>(self.kvd_byte_offset)?;
        w.write_u32::<LittleEndian>(self.kvd_byte_length)?;
        w.write_u64::<LittleEndian>(self.sgd_byte_offset)?;
        w.write_u64::<LittleEndian>(self.sgd_byte_length)?;
        for level in &self.levels {
            level.write_to(w)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R, level_count: u32) -> io::Result<Self> {
        let dfd_byte_offset = r.read_u32::<LittleEndian>()?;
        let dfd_byte_length = r.read_u32::<LittleEndian>()?;
        let kvd_byte_offset = r.read_u32::<LittleEndian>()?;
        let kvd_byte_length = r.read_u32::<LittleEndian>()?;
        let sgd_byte_offset = r.read_u64::<LittleEndian>()?;
        let sgd_byte_length = r.read_u64::<LittleEndian>()?;
        // A level count of 0 asks the loader to generate mips; the base level is still stored.
        let levels = (0..level_count.max(1))
            .map(|_| Level::read_from(r))
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Index {
            dfd_byte_offset,
            dfd_byte_length,
            kvd_byte_offset,
            kvd_byte_length,
            sgd_byte_offset,
            sgd_byte_length,
            levels,
        })
    }
}
