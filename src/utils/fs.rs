use {
    anyhow::{Context, Result},
    std::{
        fs,
        path::{Path, PathBuf},
    },
    walkdir::WalkDir,
};

/// Deletes `dir` with everything below it and creates it again, empty.
pub fn ensure_clean_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("failed to delete {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    Ok(())
}

/// Files directly inside `dir` whose extension is `extension`, sorted by name.
///
/// A missing `dir` yields no files.
pub fn find_files_by_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut results = vec![];
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        results.push(entry.path().to_path_buf());
    }
    Ok(results)
}
