use std::io::{self, SeekFrom};

use serde::{Serialize, Serializer};

use crate::container_header::CONTAINER_HEADER_SIZE;
use crate::header::Header;
use crate::hilo::HiLo64;
use crate::segments::SEGMENT_DESCRIPTOR_SIZE;

/// On-disk size of [`InfoBlock`].
pub const INFO_BLOCK_SIZE: u64 = 64;

/// Alignment of the info block relative to the start of the container.
pub const INFO_BLOCK_ALIGN: u64 = 16;

pub const CONTENT_ID_SIZE: usize = 32;

/// Optional metadata that trails the embedded ELF program headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InfoBlock {
    pub id: HiLo64,
    pub unknown_08: HiLo64,
    pub unknown_10: HiLo64,
    pub unknown_18: HiLo64,
    #[serde(serialize_with = "serialize_hex")]
    pub content_id: [u8; CONTENT_ID_SIZE],
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    serializer.serialize_str(&hex)
}

pub fn align_up(value: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Offset at which the info block would start: header, segment table, ELF
/// header and program headers, rounded up to [`INFO_BLOCK_ALIGN`].
pub fn base_offset(segment_count: u16, elf: &impl Header) -> u64 {
    let unaligned = CONTAINER_HEADER_SIZE
        + u64::from(segment_count) * SEGMENT_DESCRIPTOR_SIZE
        + elf.size()
        + elf.program_headers_size();
    align_up(unaligned, INFO_BLOCK_ALIGN)
}

/// Whether the declared header region leaves room for an info block at `base`.
pub fn has_room(header_size: u16, base: u64) -> bool {
    u64::from(header_size)
        .checked_sub(base)
        .is_some_and(|slack| slack >= INFO_BLOCK_SIZE)
}

impl InfoBlock {
    pub fn from_reader<R: io::Read>(r: &mut R) -> io::Result<Self> {
        let id = HiLo64::from_reader(r)?;
        let unknown_08 = HiLo64::from_reader(r)?;
        let unknown_10 = HiLo64::from_reader(r)?;
        let unknown_18 = HiLo64::from_reader(r)?;
        let mut content_id = [0u8; CONTENT_ID_SIZE];
        r.read_exact(&mut content_id)?;

        Ok(InfoBlock {
            id,
            unknown_08,
            unknown_10,
            unknown_18,
            content_id,
        })
    }

    /// Reads the info block at `base` if `header_size` leaves room for it.
    ///
    /// The block is best effort: missing room, a failed seek or a short read
    /// all yield `None`.
    pub fn locate<R: io::Read + io::Seek>(r: &mut R, header_size: u16, base: u64) -> Option<Self> {
        if !has_room(header_size, base) {
            log::debug!("no room for info block: header_size={header_size:#x} base={base:#x}");
            return None;
        }

        let read = r
            .seek(SeekFrom::Start(base))
            .and_then(|_| Self::from_reader(r));
        match read {
            Ok(info) => {
                log::info!("info block at {base:#x}: id={:016x}", info.id);
                Some(info)
            }
            Err(e) => {
                log::warn!("info block at {base:#x} could not be read: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::elf::{ElfHeader, Elf32Ehdr, Elf64Ehdr};
    use std::io::Cursor;

    fn elf64(phentsize: u16, phnum: u16) -> ElfHeader {
        ElfHeader::Elf64(Elf64Ehdr {
            e_ident: [0; 16],
            e_type: 2,
            e_machine: 62,
            e_version: 1,
            e_entry: 0,
            e_phoff: 64,
            e_shoff: 0,
            e_flags: 0,
            e_ehsize: 64,
            e_phentsize: phentsize,
            e_phnum: phnum,
            e_shentsize: 0,
            e_shnum: 0,
            e_shstrndx: 0,
        })
    }

    fn elf32(phentsize: u16, phnum: u16) -> ElfHeader {
        ElfHeader::Elf32(Elf32Ehdr {
            e_ident: [0; 16],
            e_type: 2,
            e_machine: 3,
            e_version: 1,
            e_entry: 0,
            e_phoff: 52,
            e_shoff: 0,
            e_flags: 0,
            e_ehsize: 52,
            e_phentsize: phentsize,
            e_phnum: phnum,
            e_shentsize: 0,
            e_shnum: 0,
            e_shstrndx: 0,
        })
    }

    #[test]
    fn align() {
        assert_eq!(align_up(0, 16), 0);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(16, 16), 16);
        assert_eq!(align_up(328, 16), 336);
    }

    #[test]
    fn base_offset_elf64() {
        // 32 + 2*32 + 64 + 3*56 = 328
        assert_eq!(base_offset(2, &elf64(56, 3)), 336);
    }

    #[test]
    fn base_offset_elf32() {
        // 32 + 0 + 52 + 2*32 = 148
        assert_eq!(base_offset(0, &elf32(32, 2)), 160);
    }

    #[test]
    fn room_checks() {
        assert!(!has_room(336, 336));
        assert!(!has_room(336 + 63, 336));
        assert!(has_room(336 + 64, 336));
        assert!(!has_room(0x10, 336));
    }

    #[test]
    fn locate_reads_at_base() {
        let mut bytes = vec![0xeeu8; 48];
        bytes.extend(0x0123_4567_89ab_cdefu64.to_le_bytes());
        bytes.extend(1u64.to_le_bytes());
        bytes.extend(2u64.to_le_bytes());
        bytes.extend(3u64.to_le_bytes());
        bytes.extend(0u8..32);

        let info = InfoBlock::locate(&mut Cursor::new(bytes), 48 + 64, 48).unwrap();
        assert_eq!(info.id, HiLo64::new(0x0123_4567, 0x89ab_cdef));
        assert_eq!(info.unknown_08.value(), 1);
        assert_eq!(info.unknown_18.value(), 3);
        assert_eq!(info.content_id[0], 0);
        assert_eq!(info.content_id[31], 31);
    }

    #[test]
    fn locate_tolerates_short_read() {
        let bytes = vec![0u8; 48 + 40];
        assert_eq!(InfoBlock::locate(&mut Cursor::new(bytes), 0x200, 48), None);
    }

    #[test]
    fn locate_skips_when_no_room() {
        let bytes = vec![0u8; 256];
        assert_eq!(InfoBlock::locate(&mut Cursor::new(bytes), 48 + 63, 48), None);
    }
}
