//! workflowgen - per-extractor CI workflows from one template
//!
//! Every extractor lives in its own directory and gets its own workflow file.
//! Keeping dozens of near-identical YAML files in sync by hand drifts, so they
//! are generated instead: one template, one `{{ module }}` placeholder, one
//! `stream_<module>.yml` per extractor directory.

pub mod config;
pub mod discover;
pub mod error;
pub mod generator;
pub mod placeholder;

pub use config::Config;
pub use discover::{discover_modules, DiscoverOptions};
pub use error::{GenerateError, Result};
pub use generator::{Checked, Generated, Generator, Outcome, Planned, Status};
pub use placeholder::{render, Placeholder};
