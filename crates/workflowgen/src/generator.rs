//! Workflow generation
//!
//! One linear pass: load the template, list modules, then render and write
//! one file per module. The template is read fresh on every call and passed
//! down; nothing is cached between runs.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::discover::discover_modules;
use crate::error::{GenerateError, Result};
use crate::placeholder::Placeholder;

/// What happened to an output file during `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Created,
    Overwritten,
}

/// State of an output file as seen by `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    UpToDate,
    Stale,
    Missing,
}

/// A rendered output that has not been written
#[derive(Debug, Clone, Serialize)]
pub struct Planned {
    pub module: String,
    pub path: PathBuf,
    #[serde(skip)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub module: String,
    pub path: PathBuf,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct Checked {
    pub module: String,
    pub path: PathBuf,
    pub status: Status,
}

pub struct Generator {
    config: Config,
    placeholder: Placeholder,
}

impl Generator {
    pub fn new(config: Config) -> Result<Self> {
        let placeholder = Placeholder::new(&config.placeholder)?;
        Ok(Self {
            config,
            placeholder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render every module without touching the output directory
    pub fn plan(&self) -> Result<Vec<Planned>> {
        let template = self.load_template()?;
        let modules = discover_modules(
            &self.config.source_dir,
            &self.config.exclude,
            self.config.discover_options(),
        )?;

        debug!(count = modules.len(), "discovered modules");

        Ok(modules
            .into_iter()
            .map(|module| Planned {
                path: self.config.output_path(&module),
                content: self.placeholder.render(&template, &module),
                module,
            })
            .collect())
    }

    /// Write one file per module, overwriting existing files
    ///
    /// Stops at the first write failure. Files written before it stay on disk.
    pub fn run(&self) -> Result<Vec<Generated>> {
        let mut generated = Vec::new();

        for planned in self.plan()? {
            let outcome = write_output(&planned.path, &planned.content)?;
            info!(module = %planned.module, path = %planned.path.display(), ?outcome, "wrote workflow");

            generated.push(Generated {
                module: planned.module,
                path: planned.path,
                outcome,
            });
        }

        Ok(generated)
    }

    /// Compare each planned output with the file on disk
    pub fn check(&self) -> Result<Vec<Checked>> {
        self.plan()?
            .into_iter()
            .map(|planned| {
                let status = match fs::read(&planned.path) {
                    Ok(existing) if existing == planned.content.as_bytes() => Status::UpToDate,
                    Ok(_) => Status::Stale,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Status::Missing,
                    Err(source) => {
                        return Err(GenerateError::Read {
                            path: planned.path,
                            source,
                        })
                    }
                };
                Ok(Checked {
                    module: planned.module,
                    path: planned.path,
                    status,
                })
            })
            .collect()
    }

    fn load_template(&self) -> Result<String> {
        let path = &self.config.template;
        let template = fs::read_to_string(path).map_err(|source| GenerateError::Template {
            path: path.clone(),
            source,
        })?;

        let occurrences = self.placeholder.count(&template);
        debug!(path = %path.display(), bytes = template.len(), occurrences, "loaded template");
        if occurrences == 0 {
            warn!(
                path = %path.display(),
                token = self.placeholder.token(),
                "template contains no placeholder; every output will be identical"
            );
        }

        Ok(template)
    }
}

fn write_output(path: &Path, content: &str) -> Result<Outcome> {
    let outcome = if path.exists() {
        Outcome::Overwritten
    } else {
        Outcome::Created
    };

    fs::write(path, content).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    const TEMPLATE: &str = "name: {{ module }}\nrun: test-{{module}}";

    /// Lay out script/, extractors/ and .github/workflows/ under a temp root
    fn setup() -> (TempDir, Config) {
        let root = TempDir::new().unwrap();
        let config = Config::default().resolve(root.path());

        fs::create_dir_all(config.template.parent().unwrap()).unwrap();
        fs::write(&config.template, TEMPLATE).unwrap();

        for name in ["http", "universal", "dns"] {
            fs::create_dir_all(config.source_dir.join(name)).unwrap();
        }
        fs::write(config.source_dir.join("README.md"), "# extractors").unwrap();

        fs::create_dir_all(&config.output_dir).unwrap();

        (root, config)
    }

    fn output_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_run_generates_one_file_per_module() {
        let (_root, config) = setup();
        let generator = Generator::new(config.clone()).unwrap();

        let generated = generator.run().unwrap();

        let modules: Vec<_> = generated.iter().map(|g| g.module.as_str()).collect();
        assert_eq!(modules, vec!["dns", "http"]);
        assert!(generated.iter().all(|g| g.outcome == Outcome::Created));

        assert_eq!(
            output_files(&config.output_dir),
            vec!["stream_dns.yml", "stream_http.yml"]
        );
        let http = fs::read_to_string(config.output_dir.join("stream_http.yml")).unwrap();
        assert_eq!(http, "name: http\nrun: test-http");
    }

    #[test]
    fn test_run_is_idempotent() {
        let (_root, config) = setup();
        let generator = Generator::new(config.clone()).unwrap();

        generator.run().unwrap();
        let first = fs::read(config.output_dir.join("stream_dns.yml")).unwrap();

        let second_run = generator.run().unwrap();
        let second = fs::read(config.output_dir.join("stream_dns.yml")).unwrap();

        assert_eq!(first, second);
        assert!(second_run.iter().all(|g| g.outcome == Outcome::Overwritten));
    }

    #[test]
    fn test_run_overwrites_existing_file() {
        let (_root, config) = setup();
        let target = config.output_dir.join("stream_http.yml");
        fs::write(&target, "hand edited").unwrap();

        Generator::new(config).unwrap().run().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "name: http\nrun: test-http");
    }

    #[test]
    fn test_missing_template_writes_nothing() {
        let (_root, config) = setup();
        fs::remove_file(&config.template).unwrap();

        let err = Generator::new(config.clone()).unwrap().run().unwrap_err();

        assert!(matches!(err, GenerateError::Template { .. }));
        assert!(output_files(&config.output_dir).is_empty());
    }

    #[test]
    fn test_missing_source_dir_writes_nothing() {
        let (_root, config) = setup();
        fs::remove_dir_all(&config.source_dir).unwrap();

        let err = Generator::new(config.clone()).unwrap().run().unwrap_err();

        assert!(matches!(err, GenerateError::SourceDir { .. }));
        assert!(output_files(&config.output_dir).is_empty());
    }

    #[test]
    fn test_missing_output_dir_is_write_error() {
        let (_root, config) = setup();
        fs::remove_dir_all(&config.output_dir).unwrap();

        let err = Generator::new(config.clone()).unwrap().run().unwrap_err();

        match err {
            GenerateError::Write { path, .. } => {
                assert_eq!(path, config.output_dir.join("stream_dns.yml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_write_failure_keeps_earlier_outputs() {
        let (_root, config) = setup();
        // A directory where stream_http.yml should go makes the second write fail
        fs::create_dir(config.output_dir.join("stream_http.yml")).unwrap();

        let err = Generator::new(config.clone()).unwrap().run().unwrap_err();

        assert!(matches!(err, GenerateError::Write { .. }));
        let dns = fs::read_to_string(config.output_dir.join("stream_dns.yml")).unwrap();
        assert_eq!(dns, "name: dns\nrun: test-dns");
    }

    #[test]
    fn test_custom_exclusions() {
        let (_root, config) = setup();
        let config = Config {
            exclude: BTreeSet::from(["http".to_string()]),
            ..config
        };

        let generated = Generator::new(config).unwrap().run().unwrap();

        let modules: Vec<_> = generated.iter().map(|g| g.module.as_str()).collect();
        assert_eq!(modules, vec!["dns", "universal"]);
    }

    #[test]
    fn test_plan_does_not_write() {
        let (_root, config) = setup();

        let planned = Generator::new(config.clone()).unwrap().plan().unwrap();

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[1].path, config.output_dir.join("stream_http.yml"));
        assert_eq!(planned[1].content, "name: http\nrun: test-http");
        assert!(output_files(&config.output_dir).is_empty());
    }

    #[test]
    fn test_check_reports_status() {
        let (_root, config) = setup();
        let generator = Generator::new(config.clone()).unwrap();

        assert!(generator
            .check()
            .unwrap()
            .iter()
            .all(|c| c.status == Status::Missing));

        generator.run().unwrap();
        fs::write(config.output_dir.join("stream_http.yml"), "old").unwrap();

        let checked = generator.check().unwrap();
        assert_eq!(checked[0].module, "dns");
        assert_eq!(checked[0].status, Status::UpToDate);
        assert_eq!(checked[1].module, "http");
        assert_eq!(checked[1].status, Status::Stale);
    }

    #[test]
    fn test_check_propagates_unreadable_output() {
        let (_root, config) = setup();
        let blocked = config.output_dir.join("stream_http.yml");
        fs::create_dir(&blocked).unwrap();

        let err = Generator::new(config).unwrap().check().unwrap_err();

        match err {
            GenerateError::Read { path, source } => {
                assert_eq!(path, blocked);
                assert_ne!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_report_serialization() {
        let generated = Generated {
            module: "http".to_string(),
            path: PathBuf::from("stream_http.yml"),
            outcome: Outcome::Created,
        };
        let json = serde_json::to_value(&generated).unwrap();
        assert_eq!(json["outcome"], "created");
        assert_eq!(json["module"], "http");

        let checked = Checked {
            module: "dns".to_string(),
            path: PathBuf::from("stream_dns.yml"),
            status: Status::UpToDate,
        };
        let json = serde_json::to_value(&checked).unwrap();
        assert_eq!(json["status"], "up_to_date");
        assert_eq!(json["path"], "stream_dns.yml");
    }

    #[test]
    fn test_custom_placeholder_token() {
        let (_root, config) = setup();
        fs::write(&config.template, "site: {{ extractor }} {{ module }}").unwrap();
        let config = Config {
            placeholder: "extractor".to_string(),
            ..config
        };

        Generator::new(config.clone()).unwrap().run().unwrap();

        let dns = fs::read_to_string(config.output_dir.join("stream_dns.yml")).unwrap();
        assert_eq!(dns, "site: dns {{ module }}");
    }
}
