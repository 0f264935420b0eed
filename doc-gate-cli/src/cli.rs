use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use doc_gate::{DocGateConfig, output, sync_sources, validate_fs};

use crate::logging;

#[derive(Parser, Debug)]
#[command(name = "doc-gate", version, about = "Sync approved sources into the docs tree and validate its markdown")]
pub struct Cli {
    /// Config file (default: doc-gate.yaml in the working directory, if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v info, -vv debug); `RUST_LOG` overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check markdown files for junk names, frontmatter and malformed links
    Validate(ValidateArgs),
    /// Copy approved source files into the docs tree
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ValidateArgs {
    /// Paths to scan (default: the working directory)
    pub paths: Vec<PathBuf>,

    /// Also require a `description` frontmatter field
    #[arg(long)]
    pub strict: bool,

    /// Top-level directory to check (repeatable; replaces the configured roots)
    #[arg(long = "root", value_name = "DIR")]
    pub roots: Vec<String>,

    /// Top-level file to check (repeatable; replaces the configured files)
    #[arg(long = "file", value_name = "NAME")]
    pub files: Vec<String>,

    /// Check every discovered markdown file, ignoring the root allowlist
    #[arg(long, conflicts_with_all = ["roots", "files"])]
    pub all: bool,

    /// Glob pattern to exclude (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip inline link checks
    #[arg(long)]
    pub no_links: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory destinations are resolved against (overrides the config)
    #[arg(long, value_name = "DIR")]
    pub dest_root: Option<PathBuf>,

    /// Report what would be synced without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit non-zero if any source is missing or fails to copy
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse arguments, set up logging and run the selected command.
///
/// Returns `Ok(false)` when the command ran but the outcome must fail the
/// process (validation errors, or an incomplete strict sync).
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let color = std::io::stdout().is_terminal();
    let mut stdout = std::io::stdout().lock();
    execute(&cli, Path::new("."), color, &mut stdout)
}

/// Run a parsed command with `cwd` as the working directory.
pub fn execute(cli: &Cli, cwd: &Path, color: bool, out: &mut dyn Write) -> Result<bool> {
    let config_path = cli.config.as_ref().map(|p| cwd.join(p));
    let config = DocGateConfig::discover(config_path.as_deref(), cwd)?;

    match &cli.command {
        Commands::Validate(args) => run_validate(args, &config, cwd, color, out),
        Commands::Sync(args) => run_sync(args, &config, cwd, color, out),
    }
}

fn paint(line: &str, ok: bool, color: bool) -> String {
    match (color, ok) {
        (false, _) => line.to_owned(),
        (true, true) => line.green().bold().to_string(),
        (true, false) => line.red().bold().to_string(),
    }
}

fn run_validate(
    args: &ValidateArgs,
    config: &DocGateConfig,
    cwd: &Path,
    color: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let paths = if args.paths.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        args.paths.iter().map(|p| cwd.join(p)).collect()
    };

    let mut fs_config = config.fs_source_config(paths);
    fs_config.base_dir = Some(cwd.to_path_buf());
    if args.all {
        fs_config.allowed_roots.clear();
        fs_config.allowed_files.clear();
    }
    if !args.roots.is_empty() {
        fs_config.allowed_roots.clone_from(&args.roots);
    }
    if !args.files.is_empty() {
        fs_config.allowed_files.clone_from(&args.files);
    }
    fs_config.exclude.extend(args.exclude.iter().cloned());

    let mut validation_config = config.validation_config()?;
    if args.strict {
        validation_config.use_strict_frontmatter();
    }
    if args.no_links {
        validation_config.check_links = false;
    }

    let report = validate_fs(&fs_config, &validation_config)?;

    if args.json {
        output::write_json(&report, out)?;
    } else {
        output::write_error_listing(&report, out)?;
        let summary = output::validation_summary(&report);
        writeln!(out, "{}", paint(&summary, report.ok, color))?;
    }
    Ok(report.ok)
}

fn run_sync(
    args: &SyncArgs,
    config: &DocGateConfig,
    cwd: &Path,
    color: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let manifest = config.sync_manifest()?;
    if manifest.is_empty() {
        tracing::warn!("no sync mapping configured; nothing to do");
    }

    let mut sync_config = config.sync_config()?;
    let dest_root = cwd.join(
        args.dest_root
            .as_deref()
            .unwrap_or(&sync_config.destination_root),
    );
    sync_config.destination_root = dest_root;
    sync_config.dry_run = args.dry_run;

    let report = sync_sources(&manifest, &sync_config);

    if args.json {
        output::write_json(&report, out)?;
    } else {
        output::write_sync_entries(&report, out)?;
        writeln!(out)?;
        let summary = output::sync_summary(&report);
        writeln!(out, "{}", paint(&summary, report.is_complete(), color))?;
    }
    Ok(!args.strict || report.is_complete())
}
