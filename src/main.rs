//! Azure2Md - work item reports for Azure DevOps.
//!
//! Fetches work items from Azure DevOps projects and writes Markdown
//! reports with Mermaid Gantt charts.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use azure2md::core::{Config, LOCAL_CONFIG_FILE};
use azure2md::i18n::{resolve_language, system_language, SUPPORTED_LANGUAGES};
use azure2md::{App, GenerateOptions};

/// Work item reports for Azure DevOps
#[derive(Parser)]
#[command(name = "azure2md")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate reports (default)
    Generate(GenerateArgs),

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Where to write the configuration
        #[arg(short, long, default_value = LOCAL_CONFIG_FILE)]
        path: PathBuf,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Configuration file to show
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List supported report languages
    Languages,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    /// Configuration file (defaults to .azure2md.toml, then the user config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only generate this project (repeatable)
    #[arg(short, long = "project", value_name = "NAME")]
    projects: Vec<String>,

    /// Write one combined report
    #[arg(long, conflicts_with = "no_merge")]
    merge: bool,

    /// Write one report per project
    #[arg(long)]
    no_merge: bool,

    /// Report language (en-US, zh-CN or auto)
    #[arg(short, long)]
    lang: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl GenerateArgs {
    fn merge_override(&self) -> Option<bool> {
        if self.merge {
            Some(true)
        } else if self.no_merge {
            Some(false)
        } else {
            None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    // Handle commands
    match cli.command {
        None => cmd_generate(GenerateArgs::default())?,
        Some(Commands::Generate(args)) => cmd_generate(args)?,
        Some(Commands::Init { force, path }) => cmd_init(&path, force)?,
        Some(Commands::Config { path, config }) => cmd_config(path, config.as_deref())?,
        Some(Commands::Languages) => cmd_languages(),
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }

    Ok(())
}

/// Fetch work items and write reports.
fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let config = Config::load_with(args.config.as_deref())?;
    config.validate().context("Invalid configuration")?;

    let options = GenerateOptions {
        merge: args.merge_override(),
        projects: args.projects,
        language: args.lang,
        output_dir: args.output_dir,
    };
    let app = App::new(config, options);

    let written = run_generate(&app)?;
    if written.is_empty() {
        println!("No reports written.");
    }
    for path in &written {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(feature = "azure")]
fn run_generate(app: &App) -> Result<Vec<PathBuf>> {
    use azure2md::AzureDevOpsClient;

    let client = AzureDevOpsClient::from_config(&app.config().server);

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(app.run(&client))
}

#[cfg(not(feature = "azure"))]
fn run_generate(_app: &App) -> Result<Vec<PathBuf>> {
    anyhow::bail!(
        "Azure DevOps support is not enabled.\n\
         Rebuild with: cargo build --features azure"
    )
}

/// Write a starter configuration.
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, Config::sample())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    println!("Set server.url and your projects, then run: azure2md generate");

    Ok(())
}

/// Show configuration.
fn cmd_config(show_path: bool, explicit: Option<&Path>) -> Result<()> {
    if show_path {
        if let Some(path) = explicit {
            println!("{}", path.display());
        } else if let Some(path) = Config::global_config_path() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let mut config = Config::load_with(explicit)?;
    if let Some(source) = &config.source {
        println!("# Loaded from {}", source.display());
    }
    if let Some(token) = config.server.personal_access_token.as_mut() {
        *token = mask_token(token);
    }

    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// List supported report languages.
fn cmd_languages() {
    let current = resolve_language("auto", system_language);
    for (code, name) in SUPPORTED_LANGUAGES {
        let marker = if *code == current { " (auto)" } else { "" };
        println!("{code:<6} {name}{marker}");
    }
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "azure2md", &mut io::stdout());
}

/// Hide all but the first four characters of a secret.
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}****")
}
