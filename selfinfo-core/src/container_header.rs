use std::io;

use byteorder::{ReadBytesExt, LE};
use serde::Serialize;

use crate::error::{FormatError, IoResultExt, Result, Stage};

/// `4F 15 3D 1D` read as a little-endian word.
pub const SELF_MAGIC: u32 = 0x1D3D_154F;

/// On-disk size of [`ContainerHeader`].
pub const CONTAINER_HEADER_SIZE: u64 = 32;

/// Top-level SELF header.
///
/// Only `magic`, `header_size`, `file_size` and `segment_count` mean anything
/// to the decoder. The `unknown_*` words are carried through untouched so the
/// report can show them as they appear in the file; the suffix is the field's
/// byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerHeader {
    pub magic: u32,
    pub unknown_04: u32,
    pub unknown_08: u32,
    /// Declared size of the whole header region, segment table and trailing
    /// metadata included.
    pub header_size: u16,
    pub unknown_0e: u16,
    pub file_size: u32,
    pub unknown_14: u32,
    pub segment_count: u16,
    pub unknown_1a: u16,
    pub unknown_1c: u32,
}

impl ContainerHeader {
    /// Reads the header at the current position and checks the signature.
    pub fn from_reader<R: io::Read>(r: &mut R) -> Result<Self> {
        let header = Self::read_fields(r).at(Stage::Header)?;
        if header.magic != SELF_MAGIC {
            return Err(FormatError::BadMagic(header.magic).into());
        }

        log::info!(
            "SELF header: header_size={:#x} file_size={:#x} segments={}",
            header.header_size,
            header.file_size,
            header.segment_count
        );
        Ok(header)
    }

    fn read_fields<R: io::Read>(r: &mut R) -> io::Result<Self> {
        Ok(ContainerHeader {
            magic: r.read_u32::<LE>()?,
            unknown_04: r.read_u32::<LE>()?,
            unknown_08: r.read_u32::<LE>()?,
            header_size: r.read_u16::<LE>()?,
            unknown_0e: r.read_u16::<LE>()?,
            file_size: r.read_u32::<LE>()?,
            unknown_14: r.read_u32::<LE>()?,
            segment_count: r.read_u16::<LE>()?,
            unknown_1a: r.read_u16::<LE>()?,
            unknown_1c: r.read_u32::<LE>()?,
        })
    }
}
