//! Module discovery
//!
//! A module is an immediate subdirectory of the source directory. Files are
//! ignored, and so are names in the exclusion set.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{GenerateError, Result};

/// How directory entries are interpreted during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// Treat a symlink pointing at a directory as a module
    pub follow_symlinks: bool,
    /// Return names in byte order instead of listing order
    pub sort: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            sort: true,
        }
    }
}

/// List module names under `source_dir`, skipping anything in `exclusions`
pub fn discover_modules(
    source_dir: &Path,
    exclusions: &BTreeSet<String>,
    options: DiscoverOptions,
) -> Result<Vec<String>> {
    let source_err = |source: io::Error| GenerateError::SourceDir {
        path: source_dir.to_path_buf(),
        source,
    };

    let meta = fs::metadata(source_dir).map_err(source_err)?;
    if !meta.is_dir() {
        return Err(source_err(io::Error::other("not a directory")));
    }

    let mut walker = WalkDir::new(source_dir).min_depth(1).max_depth(1);
    if options.sort {
        walker = walker.sort_by_file_name();
    }

    let mut modules = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| source_err(e.into()))?;
        let path = entry.path();
        let file_type = entry.file_type();

        let is_dir = if file_type.is_symlink() {
            if options.follow_symlinks && !path.exists() {
                warn!(path = %path.display(), "skipping symlink with missing target");
                continue;
            }
            options.follow_symlinks && path.is_dir()
        } else {
            file_type.is_dir()
        };

        if !is_dir {
            debug!(path = %path.display(), "skipping non-directory entry");
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %path.display(), "skipping directory with non UTF-8 name");
            continue;
        };

        if exclusions.contains(name) {
            debug!(module = name, "excluded");
            continue;
        }

        modules.push(name.to_string());
    }

    Ok(modules)
}
