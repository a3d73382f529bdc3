//! Generator configuration
//!
//! Defaults reproduce the stock layout: `script/github_action_template.yml`
//! rendered once per directory in `extractors/`, written to
//! `.github/workflows/stream_<module>.yml`. A `workflowgen.json` at the root
//! can override any field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::discover::DiscoverOptions;
use crate::error::{GenerateError, Result};
use crate::placeholder::DEFAULT_TOKEN;

/// Config file looked up in the root directory
pub const CONFIG_FILE: &str = "workflowgen.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template file
    pub template: PathBuf,

    /// Directory whose subdirectories are modules
    pub source_dir: PathBuf,

    /// Directory receiving the generated files
    pub output_dir: PathBuf,

    /// Module names never generated
    pub exclude: BTreeSet<String>,

    /// Token inside `{{ }}` that is replaced by the module name
    pub placeholder: String,

    /// Prepended to the module name in output file names
    pub output_prefix: String,

    /// Output file extension without the dot; empty for none
    pub output_extension: String,

    /// Treat symlinked directories as modules
    pub follow_symlinks: bool,

    /// Process modules in name order rather than listing order
    pub sort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: PathBuf::from("script/github_action_template.yml"),
            source_dir: PathBuf::from("extractors"),
            output_dir: PathBuf::from(".github/workflows"),
            exclude: BTreeSet::from(["universal".to_string()]),
            placeholder: DEFAULT_TOKEN.to_string(),
            output_prefix: "stream_".to_string(),
            output_extension: "yml".to_string(),
            follow_symlinks: true,
            sort: true,
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GenerateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| GenerateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `<root>/workflowgen.json` if present, otherwise the defaults
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Make relative paths absolute against `root`
    pub fn resolve(mut self, root: &Path) -> Self {
        self.template = root.join(&self.template);
        self.source_dir = root.join(&self.source_dir);
        self.output_dir = root.join(&self.output_dir);
        self
    }

    pub fn discover_options(&self) -> DiscoverOptions {
        DiscoverOptions {
            follow_symlinks: self.follow_symlinks,
            sort: self.sort,
        }
    }

    /// Path of the generated file for `module`
    pub fn output_path(&self, module: &str) -> PathBuf {
        let mut file_name = format!("{}{}", self.output_prefix, module);
        if !self.output_extension.is_empty() {
            file_name.push('.');
            file_name.push_str(&self.output_extension);
        }
        self.output_dir.join(file_name)
    }
}
