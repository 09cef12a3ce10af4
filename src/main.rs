//! buildctx - resolve which files belong in a build context.
//!
//! Usage:
//!   buildctx [PATH]               List paths included in the build context
//!   buildctx patterns [PATH]      Show the compiled ignore patterns
//!   buildctx --help               Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use buildctx_core::DEFAULT_IGNORE_FILE;
use buildctx_scan::{ContextScanner, PatternSet, ScanConfig};

#[derive(Parser)]
#[command(
    name = "buildctx",
    version,
    about = "Resolve which files belong in a build context",
    long_about = "buildctx walks a directory and applies its .dockerignore rules, \
                  printing every path that would be sent as build context.\n\n\
                  Negated rules (`!pattern`) re-include a path even beneath an \
                  excluded directory. `.git`, `vendor` and `node_modules` are \
                  never included."
)]
struct Cli {
    /// Root of the build context (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Ignore file to read, relative to the root
    #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
    ignore_file: PathBuf,

    /// Additional pattern evaluated after the ignore file (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Skip matched directories entirely when no rule is negated
    #[arg(long)]
    fast_prune: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show how each ignore rule was compiled
    Patterns {
        /// Root of the build context
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Ignore file to read, relative to the root
        #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
        ignore_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Patterns { path, ignore_file }) => {
            run_patterns(&path, ignore_file)?;
        }
        None => {
            let config = ScanConfig::builder()
                .root(cli.path)
                .ignore_file(cli.ignore_file)
                .extra_patterns(cli.exclude)
                .fast_prune(cli.fast_prune)
                .build()
                .context("Invalid configuration")?;
            run_list(&config, cli.format)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` applies unless `-v` is given.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Resolve the build context and print the included paths.
fn run_list(config: &ScanConfig, format: OutputFormat) -> Result<()> {
    let scanner = ContextScanner::new();
    let report = scanner
        .scan(config)
        .with_context(|| format!("Failed to resolve build context for {}", config.root.display()))?;

    tracing::info!(
        root = %report.root.display(),
        included = report.len(),
        excluded = report.stats.excluded,
        "resolved build context"
    );

    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for path in &report.included {
                writeln!(out, "{path}")?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    out.flush()?;

    Ok(())
}

/// Print each compiled pattern with its flags and anchored expression.
fn run_patterns(path: &Path, ignore_file: PathBuf) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Invalid path {}", path.display()))?;

    let config = ScanConfig::builder()
        .root(root.clone())
        .ignore_file(ignore_file)
        .build()
        .context("Invalid configuration")?;
    let set = PatternSet::discover(&root, &config).context("Failed to load ignore patterns")?;

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{} pattern(s) from {} ({} rules with fixed names)",
        set.pattern_count(),
        config.ignore_file_in(&root).display(),
        set.entry_count()
    )?;
    writeln!(out, "{}", "─".repeat(70))?;

    for pattern in set.patterns() {
        let mut flags = Vec::new();
        if pattern.is_negated() {
            flags.push("negated");
        }
        if pattern.is_dir_only() {
            flags.push("dir");
        }
        writeln!(
            out,
            " {:<28} {:<12} {}",
            truncate(pattern.raw(), 28),
            flags.join(","),
            pattern.expression()
        )?;
    }

    writeln!(out, "{}", "─".repeat(70))?;
    writeln!(out, " always pruned: {}", set.pruned_names().join(", "))?;

    Ok(())
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
