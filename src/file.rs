// src/file.rs

use std::{
    collections::HashMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::error::ExportError;
use crate::export::ExportArtifact;
use crate::progress::Progress;

/// Write each artifact into `dir` (created if missing).
/// Returns the paths written, in artifact order.
pub fn write_artifacts(
    dir: &Path,
    artifacts: &[ExportArtifact],
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<Vec<PathBuf>, ExportError> {
    ensure_directory(dir)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(artifacts.len());
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(artifacts.len());

    for art in artifacts {
        let path = resolve_filename(dir, &art.filename, &mut seen);
        fs::write(&path, &art.bytes)?;
        logd!("Export: wrote {} ({} bytes, {})", path.display(), art.bytes.len(), art.mime);

        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&path.to_string_lossy());
        }
        written.push(path);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(written)
}

/// Single artifact; the usual GUI button path.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
    ensure_directory(dir)?;
    let path = dir.join(&artifact.filename);
    fs::write(&path, &artifact.bytes)?;
    Ok(path)
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Duplicate handling **only within this batch**
pub fn resolve_filename(
    dir: &Path,
    filename: &str,                    // "<stem>.<ext>"
    seen_names: &mut HashMap<String, usize>,
) -> PathBuf {
    let count = seen_names.entry(filename.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let name = if *count == 0 {
        filename.to_string()
    } else {
        let p = Path::new(filename);
        let stem = p.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        match p.extension() {
            Some(ext) => format!("{stem} ({}).{}", *count + 1, ext.to_string_lossy()),
            None => format!("{stem} ({})", *count + 1),
        }
    };

    *count += 1;
    dir.join(name)
}
