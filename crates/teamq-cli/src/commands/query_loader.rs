use std::fs;
use std::path::{Path, PathBuf};

use teamq_compiler::{SourceId, SourceMap};

/// Add every query file named by `paths` to `map`.
///
/// Directories contribute their `*.sql` files (not recursive), sorted by
/// path so runs are deterministic.
pub fn load_query_files(paths: &[PathBuf], map: &mut SourceMap) -> Result<Vec<SourceId>, String> {
    let mut ids = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in sql_files(path)? {
                ids.push(load_file(&file, map)?);
            }
        } else {
            ids.push(load_file(path, map)?);
        }
    }
    Ok(ids)
}

fn sql_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| format!("failed to read directory '{}': {}", dir.display(), e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "sql"))
        .collect();

    if files.is_empty() {
        return Err(format!("no .sql files found in '{}'", dir.display()));
    }

    files.sort();
    Ok(files)
}

fn load_file(path: &Path, map: &mut SourceMap) -> Result<SourceId, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded query file");
    Ok(map.add_file(&path.to_string_lossy(), &content))
}
