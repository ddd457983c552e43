use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::container_header::ContainerHeader;
use crate::error::{IoResultExt, Result, Stage};
use crate::header::elf::ElfHeader;
use crate::info::{base_offset, InfoBlock};
use crate::segments::SegmentDescriptor;

/// Everything decoded from one SELF container.
#[derive(Debug, Clone, Serialize)]
pub struct SelfFile {
    pub header: ContainerHeader,
    pub segments: Vec<SegmentDescriptor>,
    pub elf: ElfHeader,
    /// Aligned offset where the info block starts, or would start.
    pub info_offset: u64,
    pub info: Option<InfoBlock>,
}

impl SelfFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).at(Stage::Open)?;
        log::debug!("opened {}", path.display());
        Self::from_reader(&mut BufReader::new(file))
    }

    /// Decodes a container starting at the reader's current position, which
    /// must be the start of the container.
    pub fn from_reader<R: io::Read + io::Seek>(r: &mut R) -> Result<Self> {
        let header = ContainerHeader::from_reader(r)?;
        let segments = SegmentDescriptor::read_table(r, header.segment_count)?;
        let elf = ElfHeader::from_reader(r)?;

        let info_offset = base_offset(header.segment_count, &elf);
        let info = InfoBlock::locate(r, header.header_size, info_offset);

        Ok(Self {
            header,
            segments,
            elf,
            info_offset,
            info,
        })
    }
}
