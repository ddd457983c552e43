use std::io;

use byteorder::{ReadBytesExt, LE};
use serde::Serialize;

use crate::error::{IoResultExt, Result, Stage};
use crate::hilo::HiLo64;

/// On-disk size of one [`SegmentDescriptor`].
pub const SEGMENT_DESCRIPTOR_SIZE: u64 = 32;

/// One entry of the segment table that follows the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentDescriptor {
    pub flags: u32,
    pub unknown_04: u32,
    /// File offset of the segment data.
    pub offset: HiLo64,
    pub block_table_size: HiLo64,
    pub uncompressed_size: HiLo64,
}

impl SegmentDescriptor {
    pub fn from_reader<R: io::Read>(r: &mut R) -> io::Result<Self> {
        Ok(SegmentDescriptor {
            flags: r.read_u32::<LE>()?,
            unknown_04: r.read_u32::<LE>()?,
            offset: HiLo64::from_reader(r)?,
            block_table_size: HiLo64::from_reader(r)?,
            uncompressed_size: HiLo64::from_reader(r)?,
        })
    }

    /// Reads `count` contiguous descriptors. Fails if any of them is cut short.
    pub fn read_table<R: io::Read>(r: &mut R, count: u16) -> Result<Vec<Self>> {
        let mut segments = Vec::with_capacity(usize::from(count));
        for i in 0..count {
            let segment = Self::from_reader(r).at(Stage::Segments)?;
            log::debug!(
                "segment {i}: flags={:#x} offset={:#x} uncompressed={:#x}",
                segment.flags,
                segment.offset,
                segment.uncompressed_size
            );
            segments.push(segment);
        }
        Ok(segments)
    }
}
