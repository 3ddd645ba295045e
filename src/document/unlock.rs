use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{DEFAULT_BACKUP_SUFFIX, DEFAULT_STAGING_SUFFIX, SETTINGS_ENTRY};
use crate::error::WfebError;

use super::archive::{extract_all, repack};
use super::protection::{ProtectionChanges, disable_protection_in_file};
use super::replace::{replace_with_backup, sibling_path};

/// Parámetros ajustables del desbloqueo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnlockOptions {
    pub backup_suffix: String,
    pub staging_suffix: String,
    /// Dónde crear el directorio de trabajo; `None` usa el temporal del sistema.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for UnlockOptions {
    fn default() -> Self {
        Self {
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            staging_suffix: DEFAULT_STAGING_SUFFIX.to_string(),
            scratch_dir: None,
        }
    }
}

/// Progreso del desbloqueo, en el orden en que ocurre.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnlockEvent {
    ProtectionDisabled,
    NoProtectionFound,
    TrackRevisionsDisabled,
    BackupCreated { path: PathBuf },
    Finished { path: PathBuf },
}

impl fmt::Display for UnlockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlockEvent::ProtectionDisabled => {
                write!(f, "Document protection disabled successfully.")
            }
            UnlockEvent::NoProtectionFound => {
                write!(f, "No document protection found in settings.xml.")
            }
            UnlockEvent::TrackRevisionsDisabled => {
                write!(f, "Track revisions disabled successfully.")
            }
            UnlockEvent::BackupCreated { path } => {
                write!(f, "Backup created at: {}", path.display())
            }
            UnlockEvent::Finished { path } => {
                write!(f, "Successfully processed: {}", path.display())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnlockSummary {
    pub changes: ProtectionChanges,
    pub backup_path: PathBuf,
}

/// Quita la protección de edición y el control de cambios de un `.docx`.
///
/// El paquete se extrae completo a un directorio temporal que se elimina al
/// salir (también en caso de error), se reescribe `word/settings.xml`, se
/// reempaqueta junto al original y se reemplaza dejando una copia `.bak`.
pub fn unlock_document<F>(
    path: &Path,
    options: &UnlockOptions,
    mut on_event: F,
) -> Result<UnlockSummary, WfebError>
where
    F: FnMut(UnlockEvent),
{
    if !path.exists() {
        return Err(WfebError::FileNotFound(path.to_path_buf()));
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix("wfeb-");
    let scratch = match &options.scratch_dir {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
    .map_err(|e| WfebError::io("Could not create a temporary directory", e))?;
    debug!(scratch = %scratch.path().display(), "directorio temporal creado");

    extract_all(path, scratch.path())?;

    let settings_path = scratch.path().join(SETTINGS_ENTRY);
    if !settings_path.is_file() {
        return Err(WfebError::MissingEntry {
            archive: path.to_path_buf(),
            entry: SETTINGS_ENTRY.to_string(),
        });
    }

    let changes = disable_protection_in_file(&settings_path)?;
    if changes.protection_disabled {
        on_event(UnlockEvent::ProtectionDisabled);
    } else {
        on_event(UnlockEvent::NoProtectionFound);
    }
    if changes.track_revisions_removed {
        on_event(UnlockEvent::TrackRevisionsDisabled);
    }

    let staged = sibling_path(path, &options.staging_suffix);
    if let Err(error) = repack(scratch.path(), &staged) {
        let _ = fs::remove_file(&staged);
        return Err(error);
    }

    let backup_path = replace_with_backup(path, &staged, &options.backup_suffix, |backup| {
        on_event(UnlockEvent::BackupCreated {
            path: backup.to_path_buf(),
        })
    })?;

    info!(document = %path.display(), "documento desbloqueado");
    on_event(UnlockEvent::Finished {
        path: path.to_path_buf(),
    });

    Ok(UnlockSummary {
        changes,
        backup_path,
    })
}
