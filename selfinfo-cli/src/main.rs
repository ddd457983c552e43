mod json;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use selfinfo_core::SelfFile;

/// Exit code for a missing or malformed command line.
const USAGE_EXIT: u8 = 1;

/// Dump the header layout of a SELF container
#[derive(Parser)]
#[command(
    name = "selfinfo",
    about = "Inspect SELF containers (header, segments, embedded ELF and info block)",
    version,
    author
)]
struct Cli {
    /// Path to SELF file
    path: PathBuf,

    /// Print the decoded structures as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let file = match SelfFile::open(&cli.path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!("{}: {e}", cli.path.display());
            println!("{}", e.diagnostic());
            return ExitCode::from(e.exit_code());
        }
    };

    match emit(&cli, &file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn emit(cli: &Cli, file: &SelfFile) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        json::write_json(&mut out, &cli.path, file)?;
    } else {
        report::write_report(&mut out, file)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn requires_exactly_one_path() {
        assert!(Cli::try_parse_from(["selfinfo"]).is_err());
        assert!(Cli::try_parse_from(["selfinfo", "a.self", "b.self"]).is_err());

        let cli = Cli::try_parse_from(["selfinfo", "a.self"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("a.self"));
        assert!(!cli.json);

        let cli = Cli::try_parse_from(["selfinfo", "--json", "a.self"]).unwrap();
        assert!(cli.json);
    }
}
