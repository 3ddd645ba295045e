//! Informe de diferencias entre dos `settings.xml`.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{MAX_REVISION_ID_EXAMPLES, NOT_SET_LABEL};
use crate::document::ProtectionRecord;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledRecord {
    pub label: String,
    pub record: ProtectionRecord,
}

/// Campo de `documentProtection` cuyo valor difiere entre ambos archivos.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtectionDifference {
    Enforcement { file1: String, file2: String },
    EditMode { file1: String, file2: String },
    Attribute { name: String, file1: String, file2: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub file1: LabeledRecord,
    pub file2: LabeledRecord,
    pub protection_differences: Vec<ProtectionDifference>,
    pub track_revisions_differ: bool,
    pub unique_to_file1: Vec<String>,
    pub unique_to_file2: Vec<String>,
}

impl ComparisonReport {
    pub fn same_revision_ids(&self) -> bool {
        self.file1.record.revision_ids == self.file2.record.revision_ids
    }

    /// Líneas del informe tal como se imprimen, incluidas las vacías.
    pub fn lines(&self) -> Vec<String> {
        let first = &self.file1.record;
        let second = &self.file2.record;
        let mut lines = vec![
            String::new(),
            "=== COMPARISON OF SETTINGS.XML BETWEEN FILES ===".to_string(),
            format!("File 1: {}", self.file1.label),
            format!("File 2: {}", self.file2.label),
            String::new(),
            "=== DOCUMENT PROTECTION ===".to_string(),
        ];

        if first.has_protection == second.has_protection {
            lines.push(format!(
                "Document Protection: {} in both files",
                status(first.has_protection)
            ));
        } else {
            lines.push(format!(
                "Document Protection: {} in File 1, {} in File 2",
                status(first.has_protection),
                status(second.has_protection)
            ));
        }

        for difference in &self.protection_differences {
            lines.push(match difference {
                ProtectionDifference::Enforcement { file1, file2 } => {
                    format!("Protection Enforcement: {file1} in File 1, {file2} in File 2")
                }
                ProtectionDifference::EditMode { file1, file2 } => {
                    format!("Edit Mode: {file1} in File 1, {file2} in File 2")
                }
                ProtectionDifference::Attribute { name, file1, file2 } => {
                    format!("Protection attribute '{name}': {file1} in File 1, {file2} in File 2")
                }
            });
        }

        if self.track_revisions_differ {
            lines.push(String::new());
            lines.push(format!(
                "Track Revisions: {} in File 1, {} in File 2",
                status(first.track_revisions),
                status(second.track_revisions)
            ));
        }

        lines.push(String::new());
        lines.push("=== REVISION IDs ===".to_string());
        if self.same_revision_ids() {
            lines.push(format!(
                "Both files have the same revision IDs: {} IDs",
                first.revision_ids.len()
            ));
        } else {
            lines.push(format!("File 1 has {} revision IDs", first.revision_ids.len()));
            lines.push(format!("File 2 has {} revision IDs", second.revision_ids.len()));
            if !self.unique_to_file1.is_empty() {
                lines.push(format!(
                    "Revision IDs unique to File 1: {}",
                    format_examples(&self.unique_to_file1)
                ));
            }
            if !self.unique_to_file2.is_empty() {
                lines.push(format!(
                    "Revision IDs unique to File 2: {}",
                    format_examples(&self.unique_to_file2)
                ));
            }
        }

        lines
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn status(enabled: bool) -> &'static str {
    if enabled { "ENABLED" } else { "DISABLED" }
}

fn display_value(value: Option<&String>) -> String {
    value.map_or_else(|| "None".to_string(), String::clone)
}

fn format_examples(values: &[String]) -> String {
    if values.len() <= MAX_REVISION_ID_EXAMPLES {
        return values.join(", ");
    }
    let prefix = values[..MAX_REVISION_ID_EXAMPLES].join(", ");
    format!(
        "{prefix} and {} more...",
        values.len() - MAX_REVISION_ID_EXAMPLES
    )
}

fn protection_differences(
    first: &ProtectionRecord,
    second: &ProtectionRecord,
) -> Vec<ProtectionDifference> {
    let mut differences = Vec::new();
    if !(first.has_protection && second.has_protection) {
        return differences;
    }

    if first.enforcement != second.enforcement {
        differences.push(ProtectionDifference::Enforcement {
            file1: display_value(first.enforcement.as_ref()),
            file2: display_value(second.enforcement.as_ref()),
        });
    }
    if first.edit_mode != second.edit_mode {
        differences.push(ProtectionDifference::EditMode {
            file1: display_value(first.edit_mode.as_ref()),
            file2: display_value(second.edit_mode.as_ref()),
        });
    }

    let names: BTreeSet<&String> = first
        .protection_attributes
        .keys()
        .chain(second.protection_attributes.keys())
        .collect();
    for name in names {
        let value1 = first.protection_attributes.get(name);
        let value2 = second.protection_attributes.get(name);
        if value1 != value2 {
            differences.push(ProtectionDifference::Attribute {
                name: name.clone(),
                file1: value1.map_or(NOT_SET_LABEL, String::as_str).to_string(),
                file2: value2.map_or(NOT_SET_LABEL, String::as_str).to_string(),
            });
        }
    }

    differences
}

/// Compara dos registros de protección etiquetados con el nombre de su archivo.
pub fn compare_records(
    first: &ProtectionRecord,
    second: &ProtectionRecord,
    first_label: &str,
    second_label: &str,
) -> ComparisonReport {
    ComparisonReport {
        file1: LabeledRecord {
            label: first_label.to_string(),
            record: first.clone(),
        },
        file2: LabeledRecord {
            label: second_label.to_string(),
            record: second.clone(),
        },
        protection_differences: protection_differences(first, second),
        track_revisions_differ: first.track_revisions != second.track_revisions,
        unique_to_file1: first
            .revision_ids
            .difference(&second.revision_ids)
            .cloned()
            .collect(),
        unique_to_file2: second
            .revision_ids
            .difference(&first.revision_ids)
            .cloned()
            .collect(),
    }
}
