pub mod elf;

/// Fields of an embedded ELF header that the decoder needs regardless of class.
pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns the virtual address of the entry point.
    fn entry_point(&self) -> u64;

    /// Returns the machine architecture identifier.
    fn machine(&self) -> u16;

    /// Returns the object file type (`e_type`).
    fn file_type(&self) -> u16;

    /// Returns true if this is a 64-bit ELF.
    fn is_64(&self) -> bool;

    /// Size in bytes of one program header entry (`e_phentsize`).
    fn program_header_entry_size(&self) -> u16;

    /// Number of program header entries (`e_phnum`).
    fn program_header_count(&self) -> u16;

    /// On-disk size of the header layout itself.
    fn size(&self) -> u64;

    /// Bytes occupied by the program header table that follows.
    fn program_headers_size(&self) -> u64 {
        u64::from(self.program_header_count()) * u64::from(self.program_header_entry_size())
    }
}
