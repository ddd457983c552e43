use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use selfinfo_core::SelfFile;

#[derive(Serialize)]
struct JsonReport<'a> {
    path: String,
    #[serde(flatten)]
    file: &'a SelfFile,
}

pub fn write_json<W: Write>(out: &mut W, path: &Path, file: &SelfFile) -> Result<()> {
    let report = JsonReport {
        path: path.display().to_string(),
        file,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
