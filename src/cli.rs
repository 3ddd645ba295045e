//! Argumentos de línea de comandos de `wfeb` y `wfeb-compare`.

use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::constants::{DEFAULT_BACKUP_SUFFIX, DEFAULT_STAGING_SUFFIX};
use crate::document::UnlockOptions;

#[derive(Debug, Clone, Copy, Args)]
pub struct Verbosity {
    /// Increase log detail (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Remove edit protection and revision tracking from a Word document.
#[derive(Debug, Parser)]
#[command(name = "wfeb", version)]
pub struct UnlockArgs {
    /// Path to the .docx file
    pub document: PathBuf,
    /// Suffix appended to the backup copy of the original document
    #[arg(long, default_value = DEFAULT_BACKUP_SUFFIX)]
    pub backup_suffix: String,
    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl UnlockArgs {
    pub fn options(&self) -> UnlockOptions {
        UnlockOptions {
            backup_suffix: self.backup_suffix.clone(),
            staging_suffix: DEFAULT_STAGING_SUFFIX.to_string(),
            scratch_dir: None,
        }
    }
}

/// Compare the protection settings of two Word documents.
#[derive(Debug, Parser)]
#[command(name = "wfeb-compare", version)]
pub struct CompareArgs {
    /// First .docx file
    pub first: PathBuf,
    /// Second .docx file
    pub second: PathBuf,
    /// Print the comparison as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Interpreta los argumentos; ayuda y versión salen con 0, el resto de errores con 1.
pub fn parse_from<T, I, S>(args: I) -> Result<T, ExitCode>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
            _ => ExitCode::from(1),
        }
    })
}
