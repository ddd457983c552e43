use std::io::Write;

use anyhow::Result;
use selfinfo_core::{
    ContainerHeader, ElfHeader, Header, InfoBlock, SegmentDescriptor, SelfFile,
};

/// Column where values start; labels are dot-padded up to it.
const LABEL_WIDTH: usize = 18;

fn field<W: Write>(out: &mut W, label: &str, value: std::fmt::Arguments<'_>) -> Result<()> {
    writeln!(out, "  {label:.<LABEL_WIDTH$}: {value}", label = format!("{label} "))?;
    Ok(())
}

/// Writes the plain-text dump of every decoded structure.
pub fn write_report<W: Write>(out: &mut W, file: &SelfFile) -> Result<()> {
    write_header(out, &file.header)?;
    write_segments(out, &file.segments)?;
    write_elf(out, &file.elf)?;
    if let Some(info) = &file.info {
        write_info(out, info)?;
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W, h: &ContainerHeader) -> Result<()> {
    writeln!(out, "SELF header:")?;
    field(out, "magic", format_args!("{:08x}", h.magic))?;
    field(out, "unknown 04", format_args!("{:08x}", h.unknown_04))?;
    field(out, "unknown 08", format_args!("{:08x}", h.unknown_08))?;
    field(out, "header size", format_args!("{:04x}", h.header_size))?;
    field(out, "unknown 0E", format_args!("{:04x}", h.unknown_0e))?;
    field(out, "file size", format_args!("{:08x}", h.file_size))?;
    field(out, "unknown 14", format_args!("{:08x}", h.unknown_14))?;
    field(out, "segment count", format_args!("{}", h.segment_count))?;
    field(out, "unknown 1A", format_args!("{:04x}", h.unknown_1a))?;
    field(out, "unknown 1C", format_args!("{:08x}", h.unknown_1c))?;
    writeln!(out)?;
    Ok(())
}

fn write_segments<W: Write>(out: &mut W, segments: &[SegmentDescriptor]) -> Result<()> {
    writeln!(out, "SELF segments:")?;
    for (i, s) in segments.iter().enumerate() {
        writeln!(out, " [{i}]")?;
        field(out, "flags", format_args!("{:08x}", s.flags))?;
        field(out, "offset", format_args!("{:016x}", s.offset))?;
        field(out, "block table size", format_args!("{:016x}", s.block_table_size))?;
        field(out, "uncompressed size", format_args!("{:016x}", s.uncompressed_size))?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_elf<W: Write>(out: &mut W, elf: &ElfHeader) -> Result<()> {
    writeln!(out, "ELF header:")?;
    field(out, "class", format_args!("{}", elf.class().name()))?;
    field(out, "type", format_args!("{:04x}", elf.file_type()))?;
    field(out, "machine", format_args!("{:04x}", elf.machine()))?;
    field(out, "entry", format_args!("{:016x}", elf.entry_point()))?;
    field(
        out,
        "program headers",
        format_args!(
            "{} x {} bytes",
            elf.program_header_count(),
            elf.program_header_entry_size()
        ),
    )?;
    writeln!(out)?;
    Ok(())
}

fn write_info<W: Write>(out: &mut W, info: &InfoBlock) -> Result<()> {
    writeln!(out, "SELF info:")?;
    field(out, "id", format_args!("{:08x}{:08x}", info.id.hi, info.id.lo))?;
    field(out, "unknown 08", format_args!("{:016x}", info.unknown_08))?;
    field(out, "unknown 10", format_args!("{:016x}", info.unknown_10))?;
    field(out, "unknown 18", format_args!("{:016x}", info.unknown_18))?;

    let (first, second) = info.content_id.split_at(16);
    write!(out, "  content id .......:")?;
    for b in first {
        write!(out, " {b:02x}")?;
    }
    writeln!(out)?;
    write!(out, "{:21}", "")?;
    for b in second {
        write!(out, " {b:02x}")?;
    }
    writeln!(out)?;
    writeln!(out)?;
    Ok(())
}
