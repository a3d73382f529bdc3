//! Placeholder substitution
//!
//! Replaces `{{ module }}` style markers with a module name. Whitespace inside
//! the braces is optional; the token itself is matched literally and is case
//! sensitive.

use regex::{NoExpand, Regex};

use crate::error::Result;

/// Token used by the workflow template
pub const DEFAULT_TOKEN: &str = "module";

/// A compiled `{{ token }}` matcher
#[derive(Debug, Clone)]
pub struct Placeholder {
    token: String,
    re: Regex,
}

impl Placeholder {
    /// Build a matcher for `{{ token }}`
    pub fn new(token: &str) -> Result<Self> {
        let re = Regex::new(&format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(token)))?;
        Ok(Self {
            token: token.to_string(),
            re,
        })
    }

    /// The `{{ module }}` matcher
    pub fn module() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Replace every placeholder in `template` with `name`
    ///
    /// The name is inserted verbatim: `$1` or `${x}` in a directory name is
    /// not treated as a capture reference.
    pub fn render(&self, template: &str, name: &str) -> String {
        self.re.replace_all(template, NoExpand(name)).into_owned()
    }

    /// Number of placeholder occurrences in `template`
    pub fn count(&self, template: &str) -> usize {
        self.re.find_iter(template).count()
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        let re = Regex::new(r"\{\{\s*module\s*\}\}").expect("static placeholder pattern is valid");
        Self {
            token: DEFAULT_TOKEN.to_string(),
            re,
        }
    }
}

/// Render `template` for `name` using the default `{{ module }}` placeholder
pub fn render(template: &str, name: &str) -> String {
    Placeholder::module().render(template, name)
}
