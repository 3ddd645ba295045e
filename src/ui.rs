//! Salida de consola de ambas herramientas.

use console::style;

use crate::compare::ComparisonReport;
use crate::document::UnlockEvent;
use crate::error::WfebError;

pub fn render_unlock_event(event: &UnlockEvent) {
    let line = event.to_string();
    match event {
        UnlockEvent::NoProtectionFound => println!("{}", style(line).yellow()),
        UnlockEvent::BackupCreated { .. } => println!("{}", style(line).dim()),
        UnlockEvent::Finished { .. } => println!("{}", style(line).green().bold()),
        UnlockEvent::ProtectionDisabled | UnlockEvent::TrackRevisionsDisabled => {
            println!("{}", style(line).green())
        }
    }
}

pub fn render_report(report: &ComparisonReport) {
    for line in report.lines() {
        if line.starts_with("===") {
            println!("{}", style(line).cyan().bold());
        } else {
            println!("{line}");
        }
    }
}

/// Serializa el informe como JSON legible.
pub fn render_report_json(report: &ComparisonReport) -> Result<(), WfebError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

pub fn render_error(error: &WfebError) {
    eprintln!("{}", style(format!("Error: {error}")).red());
}
