//! workflowgen - generate per-extractor CI workflow files
//!
//! Run from the repository root with no arguments to regenerate
//! `.github/workflows/stream_<module>.yml` for every directory in
//! `extractors/` except `universal`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use workflowgen::{Config, Generator, Status};

#[derive(Parser, Debug)]
#[command(name = "workflowgen")]
#[command(about = "Generate per-extractor CI workflow files from a template")]
#[command(version)]
#[command(after_help = r#"PLACEHOLDER:
    {{ module }}    Replaced with the extractor directory name
                    (whitespace inside the braces is optional)

CONFIG:
    <root>/workflowgen.json is read when present. Flags override it.

EXAMPLES:
    workflowgen                          # Regenerate all workflows
    workflowgen --check                  # Fail if any workflow is out of date
    workflowgen --dry-run                # Show what would be written
    workflowgen --exclude universal --exclude bcy
"#)]
struct Cli {
    /// Repository root that relative paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Config file (default: <root>/workflowgen.json if it exists)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template file
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory whose subdirectories are modules
    #[arg(long)]
    source: Option<PathBuf>,

    /// Directory for generated workflow files
    #[arg(long)]
    output: Option<PathBuf>,

    /// Module to skip (repeatable; replaces the configured list)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Do not treat symlinked directories as modules
    #[arg(long)]
    no_follow_symlinks: bool,

    /// Keep filesystem listing order
    #[arg(long)]
    no_sort: bool,

    /// Show what would be written without writing
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Exit non-zero if any generated file is missing or out of date
    #[arg(long)]
    check: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli)?;
    let generator = Generator::new(config).context("Failed to build placeholder matcher")?;

    if cli.check {
        cmd_check(&generator, cli.json)
    } else if cli.dry_run {
        cmd_dry_run(&generator, cli.json)
    } else {
        cmd_generate(&generator, cli.json)
    }
}

/// Layer flags over the config file over built-in defaults
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&cli.root)?,
    };

    if let Some(template) = &cli.template {
        config.template = template.clone();
    }
    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.iter().cloned().collect();
    }
    if cli.no_follow_symlinks {
        config.follow_symlinks = false;
    }
    if cli.no_sort {
        config.sort = false;
    }

    Ok(config.resolve(&cli.root))
}

fn cmd_generate(generator: &Generator, json: bool) -> Result<ExitCode> {
    let generated = generator.run().context("Workflow generation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
        return Ok(ExitCode::SUCCESS);
    }

    for g in &generated {
        println!("  {} -> {}", g.module, g.path.display());
    }
    println!(
        "success: Generated {} workflow(s) in {}",
        generated.len(),
        generator.config().output_dir.display()
    );

    Ok(ExitCode::SUCCESS)
}

fn cmd_dry_run(generator: &Generator, json: bool) -> Result<ExitCode> {
    let planned = generator.plan().context("Workflow generation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&planned)?);
        return Ok(ExitCode::SUCCESS);
    }

    for p in &planned {
        println!("  {} -> {}", p.module, p.path.display());
    }
    println!("info: {} workflow(s) would be written", planned.len());

    Ok(ExitCode::SUCCESS)
}

fn cmd_check(generator: &Generator, json: bool) -> Result<ExitCode> {
    let checked = generator.check().context("Workflow check failed")?;
    let outdated = checked.iter().filter(|c| c.status != Status::UpToDate).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&checked)?);
    } else {
        for c in &checked {
            let label = match c.status {
                Status::Stale => "stale",
                Status::Missing => "missing",
                Status::UpToDate => continue,
            };
            println!("  {:<8} {}", label, c.path.display());
        }

        if outdated == 0 {
            println!("success: {} workflow(s) up to date", checked.len());
        } else {
            println!("error: {} of {} workflow(s) out of date; run workflowgen", outdated, checked.len());
        }
    }

    Ok(if outdated == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
