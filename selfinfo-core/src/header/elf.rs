use std::io::{self, SeekFrom};

use byteorder::{ReadBytesExt, LE};
use goblin::elf::header::{EI_CLASS, ELFCLASS32, ELFCLASS64, SIZEOF_IDENT};
use serde::Serialize;

use crate::error::{FormatError, IoResultExt, Result, Stage};
use crate::header::Header;

/// ELF header of a 32-bit object (`Elf32_Ehdr`), 52 bytes on disk.
///
/// Reference: [ELF Specification v1.2](https://refspecs.linuxfoundation.org/elf/elf.pdf)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elf32Ehdr {
    /// Identification bytes; `e_ident[EI_CLASS]` is `ELFCLASS32`.
    pub e_ident: [u8; 16],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u32,
    pub e_phoff: u32,
    pub e_shoff: u32,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

/// Represents the ELF header for a 64-bit object file (`Elf64_Ehdr`).
///
/// Inside a SELF container it sits directly after the segment table, and its
/// program header table follows it immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elf64Ehdr {
    /// ELF identification bytes (magic number and other information).
    ///
    /// The first 4 bytes should be `0x7F`, `'E'`, `'L'`, `'F'`.
    /// Remaining bytes encode class (32/64-bit), endianness, and version.
    pub e_ident: [u8; 16],

    /// Object file type (e.g. relocatable, executable, shared, core).
    pub e_type: u16,

    /// Target architecture (e.g., x86_64 is 62).
    pub e_machine: u16,

    /// ELF version (usually set to `EV_CURRENT` = 1).
    pub e_version: u32,

    /// Virtual address of the program entry point.
    pub e_entry: u64,

    /// File offset of the program header table.
    pub e_phoff: u64,

    /// File offset of the section header table.
    pub e_shoff: u64,

    /// Processor-specific flags.
    pub e_flags: u32,

    /// Size of this ELF header (usually `64` bytes for ELF64).
    pub e_ehsize: u16,

    /// Size of one entry in the program header table.
    pub e_phentsize: u16,

    /// Number of entries in the program header table.
    pub e_phnum: u16,

    /// Size of one entry in the section header table.
    pub e_shentsize: u16,

    /// Number of entries in the section header table.
    pub e_shnum: u16,

    /// Index of the section header string table.
    pub e_shstrndx: u16,
}

impl Elf32Ehdr {
    pub const SIZE: u64 = goblin::elf32::header::SIZEOF_EHDR as u64;

    pub fn from_reader<R: io::Read>(cur: &mut R) -> io::Result<Elf32Ehdr> {
        let mut e_ident = [0u8; SIZEOF_IDENT];
        cur.read_exact(&mut e_ident)?;

        Ok(Elf32Ehdr {
            e_ident,
            e_type: cur.read_u16::<LE>()?,
            e_machine: cur.read_u16::<LE>()?,
            e_version: cur.read_u32::<LE>()?,
            e_entry: cur.read_u32::<LE>()?,
            e_phoff: cur.read_u32::<LE>()?,
            e_shoff: cur.read_u32::<LE>()?,
            e_flags: cur.read_u32::<LE>()?,
            e_ehsize: cur.read_u16::<LE>()?,
            e_phentsize: cur.read_u16::<LE>()?,
            e_phnum: cur.read_u16::<LE>()?,
            e_shentsize: cur.read_u16::<LE>()?,
            e_shnum: cur.read_u16::<LE>()?,
            e_shstrndx: cur.read_u16::<LE>()?,
        })
    }
}

impl Elf64Ehdr {
    pub const SIZE: u64 = goblin::elf64::header::SIZEOF_EHDR as u64;

    pub fn from_reader<R: io::Read>(cur: &mut R) -> io::Result<Elf64Ehdr> {
        let mut e_ident = [0u8; SIZEOF_IDENT];
        cur.read_exact(&mut e_ident)?;

        Ok(Elf64Ehdr {
            e_ident,
            e_type: cur.read_u16::<LE>()?,
            e_machine: cur.read_u16::<LE>()?,
            e_version: cur.read_u32::<LE>()?,
            e_entry: cur.read_u64::<LE>()?,
            e_phoff: cur.read_u64::<LE>()?,
            e_shoff: cur.read_u64::<LE>()?,
            e_flags: cur.read_u32::<LE>()?,
            e_ehsize: cur.read_u16::<LE>()?,
            e_phentsize: cur.read_u16::<LE>()?,
            e_phnum: cur.read_u16::<LE>()?,
            e_shentsize: cur.read_u16::<LE>()?,
            e_shnum: cur.read_u16::<LE>()?,
            e_shstrndx: cur.read_u16::<LE>()?,
        })
    }
}

impl Header for Elf32Ehdr {
    fn entry_point(&self) -> u64 {
        u64::from(self.e_entry)
    }

    fn machine(&self) -> u16 {
        self.e_machine
    }

    fn file_type(&self) -> u16 {
        self.e_type
    }

    fn is_64(&self) -> bool {
        false
    }

    fn program_header_entry_size(&self) -> u16 {
        self.e_phentsize
    }

    fn program_header_count(&self) -> u16 {
        self.e_phnum
    }

    fn size(&self) -> u64 {
        Self::SIZE
    }
}

impl Header for Elf64Ehdr {
    fn entry_point(&self) -> u64 {
        self.e_entry
    }

    fn machine(&self) -> u16 {
        self.e_machine
    }

    fn file_type(&self) -> u16 {
        self.e_type
    }

    fn is_64(&self) -> bool {
        true
    }

    fn program_header_entry_size(&self) -> u16 {
        self.e_phentsize
    }

    fn program_header_count(&self) -> u16 {
        self.e_phnum
    }

    fn size(&self) -> u64 {
        Self::SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    /// Maps `e_ident[EI_CLASS]` to a class.
    pub fn from_ident(ident: &[u8; SIZEOF_IDENT]) -> Result<Self> {
        match ident[EI_CLASS] {
            ELFCLASS32 => Ok(ElfClass::Elf32),
            ELFCLASS64 => Ok(ElfClass::Elf64),
            other => Err(FormatError::UnknownClass(other).into()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElfClass::Elf32 => "ELF32",
            ElfClass::Elf64 => "ELF64",
        }
    }
}

/// The embedded ELF header, in whichever layout its class byte selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "class", content = "header")]
pub enum ElfHeader {
    Elf32(Elf32Ehdr),
    Elf64(Elf64Ehdr),
}

impl ElfHeader {
    /// Peeks at the ident, rewinds to its start and reads the matching layout.
    pub fn from_reader<R: io::Read + io::Seek>(r: &mut R) -> Result<Self> {
        let mut ident = [0u8; SIZEOF_IDENT];
        r.read_exact(&mut ident).at(Stage::ElfIdent)?;
        r.seek(SeekFrom::Current(-(SIZEOF_IDENT as i64)))
            .at(Stage::ElfIdent)?;

        let class = ElfClass::from_ident(&ident)?;
        log::debug!("embedded ELF class: {}", class.name());

        let header = match class {
            ElfClass::Elf32 => Elf32Ehdr::from_reader(r).map(ElfHeader::Elf32),
            ElfClass::Elf64 => Elf64Ehdr::from_reader(r).map(ElfHeader::Elf64),
        }
        .at(Stage::ElfHeader)?;

        log::info!(
            "ELF header: {} program headers of {} bytes",
            header.program_header_count(),
            header.program_header_entry_size()
        );
        Ok(header)
    }

    pub fn class(&self) -> ElfClass {
        match self {
            ElfHeader::Elf32(_) => ElfClass::Elf32,
            ElfHeader::Elf64(_) => ElfClass::Elf64,
        }
    }

    fn inner(&self) -> &dyn Header {
        match self {
            ElfHeader::Elf32(h) => h,
            ElfHeader::Elf64(h) => h,
        }
    }
}

impl Header for ElfHeader {
    fn entry_point(&self) -> u64 {
        self.inner().entry_point()
    }

    fn machine(&self) -> u16 {
        self.inner().machine()
    }

    fn file_type(&self) -> u16 {
        self.inner().file_type()
    }

    fn is_64(&self) -> bool {
        self.inner().is_64()
    }

    fn program_header_entry_size(&self) -> u16 {
        self.inner().program_header_entry_size()
    }

    fn program_header_count(&self) -> u16 {
        self.inner().program_header_count()
    }

    fn size(&self) -> u64 {
        self.inner().size()
    }
}
