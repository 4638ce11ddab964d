use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::inject::inject_tags;
use crate::rewrite::Rewrite;
use crate::session::BuildSession;

/// Expand `paths` into a sorted, deduplicated list of files. Directories are walked
/// recursively.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let base = glob::Pattern::escape(&path.to_string_lossy());
            let pattern = format!("{}/**/*", base.trim_end_matches(['/', '\\']));
            let entries = glob::glob(&pattern)
                .with_context(|| format!("Failed to walk {}", path.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
                if entry.is_file() {
                    files.push(entry);
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("{} does not exist", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Module id the eligibility filter sees for `path`: absolute, `/`-separated.
pub fn module_id(path: &Path) -> Result<String> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Ok(absolute.to_string_lossy().replace('\\', "/"))
}

/// Read and rewrite one file. Files that are not UTF-8 text are left alone.
pub fn transform_file(session: &BuildSession, path: &Path) -> Result<Option<Rewrite>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let Ok(code) = String::from_utf8(bytes) else {
        return Ok(None);
    };
    let id = module_id(path)?;
    session
        .transform(&code, &id)
        .with_context(|| format!("Failed to rewrite {}", path.display()))
}

/// Where `file` lands under `out_dir`: its path relative to `root`, or just its
/// file name when it lives outside the root.
pub fn output_path(root: &Path, out_dir: &Path, file: &Path) -> Result<PathBuf> {
    let absolute = std::fs::canonicalize(file)
        .with_context(|| format!("Failed to resolve {}", file.display()))?;
    match absolute.strip_prefix(root) {
        Ok(relative) => Ok(out_dir.join(relative)),
        Err(_) => {
            let name = absolute
                .file_name()
                .with_context(|| format!("{} has no file name", file.display()))?;
            Ok(out_dir.join(name))
        }
    }
}

pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// The HTML entry point with the session's tags spliced in, or `None` while the
/// session is inactive.
pub fn inject_html_file(session: &BuildSession, path: &Path) -> Result<Option<String>> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(session
        .transform_index_html()
        .map(|tags| inject_tags(&html, &tags)))
}
