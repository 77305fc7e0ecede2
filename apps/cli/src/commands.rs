//! CLI command definitions, routing, and tracing setup.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use mdindex_core::{IndexJob, ReportOptions, VerifyJob, render_report, run_index, run_verify};
use mdindex_shared::{
    AddrStyle, AppConfig, HeadingPolicy, IndexLayout, init_config, load_config, load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mdindex: index Markdown headings and verify existing indexes.
#[derive(Parser)]
#[command(
    name = "mdindex",
    version,
    about = "Extract a hierarchical heading index from Markdown and verify it against the source.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.mdindex/mdindex.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build a JSON index of a Markdown document's sections.
    Index {
        /// Markdown file to index.
        input: PathBuf,

        /// Output index path (defaults to output.default_index_path).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write logs to this file.
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// Heading acceptance policy.
        #[arg(long)]
        policy: Option<PolicyArg>,

        /// Address numbering style.
        #[arg(long)]
        addr_style: Option<AddrStyleArg>,

        /// Index file layout.
        #[arg(long)]
        layout: Option<LayoutArg>,
    },

    /// Check an index against the current Markdown document.
    Verify {
        /// Markdown file the index describes.
        markdown: PathBuf,

        /// Index file to check.
        index: PathBuf,

        /// Only list entries with issues.
        #[arg(long)]
        errors_only: bool,

        /// Only audit entries up to this heading level.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
        max_level: Option<u8>,

        /// Lines of document context around each listed entry.
        #[arg(long)]
        context: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum PolicyArg {
    Standard,
    Strict,
}

impl From<PolicyArg> for HeadingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Standard => Self::Standard,
            PolicyArg::Strict => Self::Strict,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum AddrStyleArg {
    Path,
    LevelCounter,
}

impl From<AddrStyleArg> for AddrStyle {
    fn from(arg: AddrStyleArg) -> Self {
        match arg {
            AddrStyleArg::Path => Self::Path,
            AddrStyleArg::LevelCounter => Self::LevelCounter,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LayoutArg {
    Records,
    Pretty,
}

impl From<LayoutArg> for IndexLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Records => Self::Records,
            LayoutArg::Pretty => Self::Pretty,
        }
    }
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

/// Load the config named by `--config`, or the default one.
pub(crate) fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr in the chosen format. An `index` run with `--log` (or
/// a configured default log path) also gets a plain-text file sink.
pub(crate) fn init_tracing(cli: &Cli, config: &AppConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match cli.verbose {
        0 => "mdindex=info",
        1 => "mdindex=debug",
        _ => "mdindex=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let (text, json) = match cli.log_format {
        LogFormat::Text => (
            Some(fmt::layer().with_writer(std::io::stderr).with_target(false)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    let file = match log_path(cli, config) {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(open_log(&path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text)
        .with(json)
        .with(file)
        .try_init()
        .wrap_err("failed to install tracing subscriber")?;
    Ok(())
}

fn log_path(cli: &Cli, config: &AppConfig) -> Option<PathBuf> {
    match &cli.command {
        Command::Index { log, .. } => log
            .clone()
            .or_else(|| config.output.default_log_path.as_ref().map(PathBuf::from)),
        _ => None,
    }
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create log directory {}", parent.display()))?;
    }
    File::create(path).wrap_err_with(|| format!("failed to open log file {}", path.display()))
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Index {
            input,
            output,
            log: _,
            policy,
            addr_style,
            layout,
        } => {
            if let Some(policy) = policy {
                config.indexer.policy = policy.into();
            }
            if let Some(style) = addr_style {
                config.indexer.addr_style = style.into();
            }
            if let Some(layout) = layout {
                config.output.layout = layout.into();
            }
            cmd_index(input, output, &config)
        }
        Command::Verify {
            markdown,
            index,
            errors_only,
            max_level,
            context,
        } => {
            let opts = ReportOptions {
                errors_only,
                max_level,
                context_lines: context.unwrap_or(config.verifier.context_lines),
            };
            cmd_verify(markdown, index, &opts, &config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_index(input: PathBuf, output: Option<PathBuf>, config: &AppConfig) -> Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output.default_index_path));
    info!(input = %input.display(), output = %output.display(), "indexing");

    let job = IndexJob {
        input,
        output,
        indexer: config.indexer.clone(),
        layout: config.output.layout,
    };
    let summary = run_index(&job)?;

    println!();
    println!("  Index written!");
    println!("  Output:   {}", summary.output.display());
    println!("  Lines:    {}", summary.lines);
    println!("  Headings: {}", summary.headings_seen);
    println!("  Accepted: {}", summary.accepted);
    println!("  Kept:     {}", summary.kept);
    println!("  Dropped:  {}", summary.dropped.len());
    println!("  Time:     {:.2}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_verify(
    markdown: PathBuf,
    index: PathBuf,
    opts: &ReportOptions,
    config: &AppConfig,
) -> Result<()> {
    let job = VerifyJob {
        markdown,
        index,
        verifier: config.verifier.clone(),
        anchor: Some(config.indexer.anchor),
    };
    let outcome = run_verify(&job)?;

    print!("{}", render_report(&outcome.document, &outcome.report, opts));
    if outcome.report.is_consistent() {
        info!("index is consistent with the document");
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
