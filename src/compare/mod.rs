//! Comparación del estado de protección entre dos documentos `.docx`.

mod report;

pub use report::{ComparisonReport, LabeledRecord, ProtectionDifference, compare_records};

use std::path::Path;
use tracing::debug;

use crate::constants::SETTINGS_ENTRY;
use crate::document::{ProtectionRecord, extract_entry, parse_settings_file};
use crate::error::WfebError;

/// Extrae solo `word/settings.xml` a un directorio temporal propio y lo analiza.
pub fn read_protection(docx_path: &Path) -> Result<ProtectionRecord, WfebError> {
    let scratch = tempfile::Builder::new()
        .prefix("wfeb-compare-")
        .tempdir()
        .map_err(|e| WfebError::io("Could not create a temporary directory", e))?;

    let settings_path = extract_entry(docx_path, SETTINGS_ENTRY, scratch.path())?;
    let record = parse_settings_file(&settings_path)?;
    debug!(document = %docx_path.display(), ?record, "settings.xml analizado");
    Ok(record)
}

fn display_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Compara los `settings.xml` de dos documentos.
pub fn compare_documents(first: &Path, second: &Path) -> Result<ComparisonReport, WfebError> {
    let first_record = read_protection(first)?;
    let second_record = read_protection(second)?;

    Ok(compare_records(
        &first_record,
        &second_record,
        &display_label(first),
        &display_label(second),
    ))
}
