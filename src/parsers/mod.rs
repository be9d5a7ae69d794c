//! Go source parsing using tree-sitter
//!
//! `go` lowers tree-sitter-go syntax trees into the owned `syntax::ast`
//! model. This module adds the file-level entry points and `go.mod`
//! module discovery used to compute full package import paths.

pub mod go;

use crate::syntax::SourceFile;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub use go::parse_source;

/// Parse a `.go` file. The recorded path is relative to `root`.
pub fn parse_file(path: &Path, root: &Path) -> Result<SourceFile> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    go::parse(path, rel)
}

/// A `go.mod` found under the analysed root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Directory holding the `go.mod`, relative to the root
    pub dir: PathBuf,
    /// Module path from the `module` directive
    pub path: String,
}

/// Read the `module` directive of a `go.mod` file
pub fn read_go_mod(go_mod: &Path, root: &Path) -> Option<GoModule> {
    let content = std::fs::read_to_string(go_mod).ok()?;
    let path = module_directive(&content)?;
    let dir = go_mod
        .parent()
        .map(|d| d.strip_prefix(root).unwrap_or(d).to_path_buf())
        .unwrap_or_default();
    Some(GoModule { dir, path })
}

/// Extract the module path from go.mod text
pub fn module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.split("//").next().unwrap_or(rest);
        let module = rest.trim().trim_matches('"').trim_matches('`');
        (!module.is_empty()).then(|| module.to_string())
    })
}

/// Full import path of the package in `rel_dir` (relative to the root).
///
/// Uses the innermost module whose directory contains `rel_dir`. Without
/// one, the relative directory itself stands in, and for files at the root
/// the package clause name.
pub fn package_path_for(rel_dir: &Path, modules: &[GoModule], package: &str) -> String {
    let owner = modules
        .iter()
        .filter(|m| rel_dir.starts_with(&m.dir))
        .max_by_key(|m| m.dir.components().count());

    match owner {
        Some(module) => {
            let sub = rel_dir.strip_prefix(&module.dir).unwrap_or(rel_dir);
            let sub = slash_path(sub);
            if sub.is_empty() {
                module.path.clone()
            } else {
                format!("{}/{}", module.path, sub)
            }
        }
        None => {
            let dir = slash_path(rel_dir);
            if dir.is_empty() {
                package.to_string()
            } else {
                dir
            }
        }
    }
}

/// Forward-slash form of a relative path, independent of platform
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
