use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::constants::{CONTENT_TYPES_ENTRY, RELS_DIR};
use crate::error::WfebError;

fn open_archive(path: &Path) -> Result<ZipArchive<File>, WfebError> {
    if !path.exists() {
        return Err(WfebError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)
        .map_err(|e| WfebError::io(format!("Could not open {}", path.display()), e))?;
    ZipArchive::new(file).map_err(|source| WfebError::InvalidArchive {
        path: path.to_path_buf(),
        source,
    })
}

fn unsafe_entry(archive: &Path, name: &str) -> WfebError {
    WfebError::UnsafeEntry {
        archive: archive.to_path_buf(),
        entry: name.to_string(),
    }
}

/// Extrae una única entrada del paquete conservando su ruta interna.
pub fn extract_entry(
    archive_path: &Path,
    entry: &str,
    target_dir: &Path,
) -> Result<PathBuf, WfebError> {
    let mut archive = open_archive(archive_path)?;
    let mut file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(WfebError::MissingEntry {
                archive: archive_path.to_path_buf(),
                entry: entry.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let relative = file
        .enclosed_name()
        .ok_or_else(|| unsafe_entry(archive_path, entry))?;
    let destination = target_dir.join(relative);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| WfebError::io(format!("Could not create {}", parent.display()), e))?;
    }

    let mut output = File::create(&destination)
        .map_err(|e| WfebError::io(format!("Could not create {}", destination.display()), e))?;
    io::copy(&mut file, &mut output)
        .map_err(|e| WfebError::io(format!("Could not extract {entry}"), e))?;

    debug!(entry, destination = %destination.display(), "entrada extraída");
    Ok(destination)
}

/// Extrae todas las entradas del paquete dentro de `target_dir`.
pub fn extract_all(archive_path: &Path, target_dir: &Path) -> Result<usize, WfebError> {
    let mut archive = open_archive(archive_path)?;
    let mut extracted = 0_usize;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        let relative = file
            .enclosed_name()
            .ok_or_else(|| unsafe_entry(archive_path, &name))?;
        let destination = target_dir.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&destination).map_err(|e| {
                WfebError::io(format!("Could not create {}", destination.display()), e)
            })?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| WfebError::io(format!("Could not create {}", parent.display()), e))?;
        }
        let mut output = File::create(&destination).map_err(|e| {
            WfebError::io(format!("Could not create {}", destination.display()), e)
        })?;
        io::copy(&mut file, &mut output)
            .map_err(|e| WfebError::io(format!("Could not extract {name}"), e))?;
        extracted += 1;
    }

    info!(archive = %archive_path.display(), entries = extracted, "paquete extraído");
    Ok(extracted)
}

/// Nombre de miembro ZIP con separadores `/` para una ruta relativa.
fn member_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_top_level_rels(relative: &Path) -> bool {
    relative
        .components()
        .next()
        .is_some_and(|first| first.as_os_str() == RELS_DIR)
}

/// Archivos de `dir` en orden de recorrido (por nombre), relativos a `base`.
fn collect_files(dir: &Path, base: &Path) -> Result<Vec<PathBuf>, WfebError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let context = format!("Could not walk {}", dir.display());
            WfebError::io(context, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(base) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Orden de miembros que espera Office: `[Content_Types].xml`, luego `_rels/`
/// de primer nivel y después el resto del árbol.
pub fn packing_order(source_dir: &Path) -> Result<Vec<PathBuf>, WfebError> {
    let mut order = Vec::new();

    let content_types = PathBuf::from(CONTENT_TYPES_ENTRY);
    if source_dir.join(&content_types).is_file() {
        order.push(content_types.clone());
    }

    let rels_dir = source_dir.join(RELS_DIR);
    if rels_dir.is_dir() {
        order.extend(collect_files(&rels_dir, source_dir)?);
    }

    order.extend(
        collect_files(source_dir, source_dir)?
            .into_iter()
            .filter(|relative| *relative != content_types && !is_top_level_rels(relative)),
    );

    Ok(order)
}

/// Empaqueta `source_dir` en un nuevo ZIP con compresión Deflate.
pub fn repack(source_dir: &Path, output_path: &Path) -> Result<(), WfebError> {
    let order = packing_order(source_dir)?;

    let target_file = File::create(output_path)
        .map_err(|e| WfebError::io(format!("Could not create {}", output_path.display()), e))?;
    let mut writer = ZipWriter::new(target_file);
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Deflated);

    for relative in &order {
        let name = member_name(relative);
        let contents = fs::read(source_dir.join(relative))
            .map_err(|e| WfebError::io(format!("Could not read {name}"), e))?;

        writer.start_file(name.as_str(), options)?;
        writer
            .write_all(&contents)
            .map_err(|e| WfebError::io(format!("Could not write {name}"), e))?;
        debug!(member = %name, "miembro empaquetado");
    }

    writer.finish()?;
    info!(output = %output_path.display(), members = order.len(), "paquete reconstruido");
    Ok(())
}
