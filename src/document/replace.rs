use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::WfebError;

/// Ruta hermana formada al añadir `suffix` al nombre completo (`a.docx` → `a.docx.bak`).
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Guarda una copia de seguridad del original y coloca el archivo preparado en su lugar.
///
/// La copia se escribe antes de tocar el original y sobrescribe cualquier
/// respaldo previo. `on_backup` se invoca en cuanto la copia existe, antes
/// del reemplazo. El reemplazo es un único `rename` que pisa el destino;
/// si falla, el original queda intacto y el archivo preparado se elimina.
pub fn replace_with_backup<F>(
    original: &Path,
    staged: &Path,
    backup_suffix: &str,
    on_backup: F,
) -> Result<PathBuf, WfebError>
where
    F: FnOnce(&Path),
{
    let backup = sibling_path(original, backup_suffix);
    fs::copy(original, &backup).map_err(|e| {
        let _ = fs::remove_file(staged);
        WfebError::io(format!("Could not create backup {}", backup.display()), e)
    })?;
    info!(backup = %backup.display(), "copia de seguridad creada");
    on_backup(&backup);

    fs::rename(staged, original).map_err(|e| {
        warn!(staged = %staged.display(), "no se pudo reemplazar el original");
        let _ = fs::remove_file(staged);
        WfebError::io(format!("Could not replace {}", original.display()), e)
    })?;

    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sibling_path_appends_suffix_to_full_name() {
        let path = Path::new("/tmp/informe.docx");
        assert_eq!(
            sibling_path(path, ".bak"),
            PathBuf::from("/tmp/informe.docx.bak")
        );
    }

    #[test]
    fn replace_with_backup_keeps_original_bytes() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let original = dir.path().join("doc.docx");
        let staged = dir.path().join("doc.docx.new");
        fs::write(&original, b"original")?;
        fs::write(&staged, b"nuevo")?;
        fs::write(sibling_path(&original, ".bak"), b"respaldo viejo")?;

        let mut announced = None;
        let backup = replace_with_backup(&original, &staged, ".bak", |path| {
            announced = Some(path.to_path_buf())
        })?;

        assert_eq!(announced.as_ref(), Some(&backup));

        assert_eq!(fs::read(&backup)?, b"original");
        assert_eq!(fs::read(&original)?, b"nuevo");
        assert!(!staged.exists());
        Ok(())
    }

    #[test]
    fn replace_with_backup_leaves_original_when_staged_is_missing()
    -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let original = dir.path().join("doc.docx");
        let staged = dir.path().join("doc.docx.new");
        fs::write(&original, b"original")?;

        let mut announced = None;
        let result = replace_with_backup(&original, &staged, ".bak", |path| {
            announced = Some(path.to_path_buf())
        });

        assert!(matches!(result, Err(WfebError::Io { .. })));
        assert_eq!(announced, Some(sibling_path(&original, ".bak")));
        assert_eq!(fs::read(&original)?, b"original");
        assert_eq!(fs::read(sibling_path(&original, ".bak"))?, b"original");
        Ok(())
    }
}
