use std::fmt;
use std::io;

use thiserror::Error;

/// Pipeline step at which an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Open,
    Header,
    Segments,
    ElfIdent,
    ElfHeader,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Open => "opening file",
            Stage::Header => "reading SELF header",
            Stage::Segments => "reading SELF segment headers",
            Stage::ElfIdent => "reading ELF ident",
            Stage::ElfHeader => "reading ELF header",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("bad SELF magic {0:#010x}")]
    BadMagic(u32),
    #[error("unknown ELF class {0}")]
    UnknownClass(u8),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error while {stage}: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

impl DecodeError {
    /// Process exit code reported for this failure site.
    pub fn exit_code(&self) -> u8 {
        match self {
            DecodeError::Io { stage, .. } => match stage {
                Stage::Open => 2,
                Stage::Header => 3,
                Stage::Segments => 5,
                Stage::ElfIdent => 6,
                Stage::ElfHeader => 7,
            },
            DecodeError::Format(FormatError::BadMagic(_)) => 4,
            DecodeError::Format(FormatError::UnknownClass(_)) => 8,
        }
    }

    /// One-line message printed by the CLI when decoding stops.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            DecodeError::Io { stage, .. } => match stage {
                Stage::Open => "Failed to open file.",
                Stage::Header => "Failed to read SELF header.",
                Stage::Segments => "Failed to read SELF segment headers.",
                Stage::ElfIdent => "Failed to read ELF ident.",
                Stage::ElfHeader => "Failed to read ELF header.",
            },
            DecodeError::Format(FormatError::BadMagic(_)) => "Not a SELF file.",
            DecodeError::Format(FormatError::UnknownClass(_)) => "Unknown ELF class.",
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            DecodeError::Io { stage, .. } => Some(*stage),
            DecodeError::Format(_) => None,
        }
    }
}

pub(crate) trait IoResultExt<T> {
    /// Tags an I/O failure with the pipeline stage it happened in.
    fn at(self, stage: Stage) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, stage: Stage) -> Result<T> {
        self.map_err(|source| DecodeError::Io { stage, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eof(stage: Stage) -> DecodeError {
        DecodeError::Io {
            stage,
            source: io::Error::from(io::ErrorKind::UnexpectedEof),
        }
    }

    #[test]
    fn exit_codes_are_distinct_per_site() {
        let errors = [
            eof(Stage::Open),
            eof(Stage::Header),
            FormatError::BadMagic(0).into(),
            eof(Stage::Segments),
            eof(Stage::ElfIdent),
            eof(Stage::ElfHeader),
            FormatError::UnknownClass(7).into(),
        ];
        let codes: Vec<u8> = errors.iter().map(DecodeError::exit_code).collect();
        assert_eq!(codes, vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn diagnostics() {
        assert_eq!(eof(Stage::Header).diagnostic(), "Failed to read SELF header.");
        assert_eq!(
            DecodeError::from(FormatError::BadMagic(1)).diagnostic(),
            "Not a SELF file."
        );
        assert_eq!(
            DecodeError::from(FormatError::UnknownClass(3)).diagnostic(),
            "Unknown ELF class."
        );
    }

    #[test]
    fn at_tags_stage() {
        let res: io::Result<()> = Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        let err = res.at(Stage::Segments).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Segments));
        assert_eq!(err.exit_code(), 5);
    }
}
