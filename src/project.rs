//! Facts read from the project tree: manifest scripts and test files.

use std::path::Path;

use crate::Result;
use eyre::WrapErr;
use ignore::WalkBuilder;
use indexmap::IndexSet;

/// Directories never searched for test files.
const IGNORED_DIR_PREFIXES: &[&str] = &["node_modules"];
const IGNORED_DIR_MARKERS: &[&str] = &["__generated__"];

/// Script names declared under `scripts` in `package.json`.
///
/// A missing manifest yields an empty set.
pub fn available_commands(root: &Path) -> Result<IndexSet<String>> {
    let path = root.join("package.json");
    if !path.exists() {
        debug!("no package.json in {}", path.display());
        return Ok(IndexSet::new());
    }
    let raw = xx::file::read_to_string(&path)?;
    parse_scripts(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

fn parse_scripts(raw: &str) -> Result<IndexSet<String>> {
    let manifest: serde_json::Value = serde_json::from_str(raw)?;
    Ok(manifest
        .get("scripts")
        .and_then(|s| s.as_object())
        .map(|scripts| scripts.keys().cloned().collect())
        .unwrap_or_default())
}

/// Whether `name` follows the test naming convention, e.g. `user.test.ts`.
pub fn is_test_file(name: &str, extensions: &[String]) -> bool {
    name.contains(".test.") && extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Walks `root` looking for any test file.
///
/// Hidden, dependency and generated directories are not entered.
#[tracing::instrument(level = "debug", name = "project.has_test_files", skip(extensions))]
pub fn has_test_files(root: &Path, extensions: &[String]) -> bool {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !IGNORED_DIR_PREFIXES.iter().any(|p| name.starts_with(p))
                && !IGNORED_DIR_MARKERS.iter().any(|m| name.contains(m))
        })
        .build();
    walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .any(|entry| is_test_file(&entry.file_name().to_string_lossy(), extensions))
}
