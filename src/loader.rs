//! Loading entries from a manifest file or a directory of entry files

use crate::config::{is_ignored, CONFIG_FILENAME};
use crate::tree::ReportTree;
use crate::{Entry, Manifest};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use globset::GlobSet;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories with more entry files than this are parsed in parallel
pub const PARALLEL_THRESHOLD: usize = 10;

const ENTRY_EXTENSION: &str = "json";

/// An input that could not be used, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Loaded {
    pub title: Option<String>,
    pub entries: Vec<Entry>,
    pub skipped: Vec<Skipped>,
    /// Files the entries were read from (for fingerprinting and watching)
    pub files: Vec<PathBuf>,
}

/// Load entries from a manifest file or a directory of entry files
pub fn load(path: &Path, ignore_set: Option<&GlobSet>, parallel: bool) -> Result<Loaded> {
    if path.is_file() {
        return load_manifest(path);
    }
    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let files = collect_entry_files(path, ignore_set);
    let parse = |file: &PathBuf| (file.clone(), read_entry(path, file));
    let results: Vec<(PathBuf, Result<Entry>)> = if parallel || files.len() > PARALLEL_THRESHOLD {
        files.par_iter().map(parse).collect()
    } else {
        files.iter().map(parse).collect()
    };

    let mut loaded = Loaded {
        files,
        ..Default::default()
    };
    for (file, result) in results {
        match result {
            Ok(entry) => loaded.entries.push(entry),
            Err(e) => loaded.skipped.push(Skipped {
                source: file.display().to_string(),
                reason: format!("{:#}", e),
            }),
        }
    }
    Ok(loaded)
}

/// Read a manifest: `{ "title": ..., "entries": [...] }`
pub fn load_manifest(path: &Path) -> Result<Loaded> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in manifest: {}", path.display()))?;

    let loaded_at = modified_at(path);
    let entries = manifest
        .entries
        .into_iter()
        .map(|mut e| {
            if e.loaded_at.is_none() {
                e.loaded_at = loaded_at;
            }
            e
        })
        .collect();

    Ok(Loaded {
        title: manifest.title,
        entries,
        skipped: Vec::new(),
        files: vec![path.to_path_buf()],
    })
}

/// Entry files below `root`, sorted for consistent output
pub fn collect_entry_files(root: &Path, ignore_set: Option<&GlobSet>) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_entry_file(p))
        .filter(|p| {
            let rel = p.strip_prefix(root).unwrap_or(p);
            !ignore_set.is_some_and(|set| is_ignored(rel, set) || is_ignored(p, set))
        })
        .collect();
    files.sort();
    files
}

/// Whether a path names an entry file
pub fn is_entry_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.')
        && name != CONFIG_FILENAME
        && path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXTENSION)
}

/// Read one entry file; its name defaults to the path relative to `root`
fn read_entry(root: &Path, file: &Path) -> Result<Entry> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read entry: {}", file.display()))?;
    let mut entry: Entry = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in entry: {}", file.display()))?;

    if entry.name.trim().is_empty() {
        entry.name = entry_name(root, file);
    }
    if entry.loaded_at.is_none() {
        entry.loaded_at = modified_at(file);
    }
    Ok(entry)
}

/// Tree path for a file: relative path without extension, `/`-separated
pub fn entry_name(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file).with_extension("");
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified))
}

/// Build a sorted tree, skipping entries whose paths collide or are empty
pub fn build_tree(root_name: &str, entries: &[Entry]) -> (ReportTree, Vec<Skipped>) {
    let mut tree = ReportTree::new(root_name);
    let mut skipped = Vec::new();
    for entry in entries {
        if let Err(e) = tree.add(entry) {
            skipped.push(Skipped {
                source: entry.name.clone(),
                reason: e.to_string(),
            });
        }
    }
    tree.sort();
    (tree, skipped)
}
