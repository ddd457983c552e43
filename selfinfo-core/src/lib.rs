pub mod container;
pub mod container_header;
pub mod error;
mod header;
pub mod hilo;
pub mod info;
pub mod segments;

pub use container::*;
pub use container_header::*;
pub use error::*;
pub use header::elf::{Elf32Ehdr, Elf64Ehdr, ElfClass, ElfHeader};
pub use header::Header;
pub use hilo::HiLo64;
pub use info::*;
pub use segments::*;
