//! gh-label-importer CLI
//!
//! Command line tool for importing labels into GitHub repositories

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use gh_label_importer::{
    config::{load_labels_from_file, load_labels_from_stdin, TOKEN_ENV_VAR},
    logging::init_logging,
    sync::LabelSnapshot,
    Error, Label, LabelOutcome, LabelStatus, LabelSyncer, Result, SyncConfig,
};

/// gh-label-importer CLI
#[derive(Parser)]
#[command(
    name = "gh-label-importer",
    version,
    about = "Import a label set into a GitHub repository",
    long_about = "List, create and delete GitHub repository labels, or import a whole label set, \
    optionally purging every existing label first."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub access token (defaults to $GITHUB_TOKEN)
    #[arg(short = 't', long, global = true)]
    access_token: Option<String>,

    /// Target repository (owner/repo format)
    #[arg(short = 'r', long, global = true)]
    repository: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Maximum concurrent API calls (unbounded when omitted)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display current labels
    List {
        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json", "yaml"])]
        format: String,

        /// Include pagination metadata
        #[arg(long)]
        meta: bool,
    },

    /// Create labels from a JSON/YAML file ("-" reads stdin)
    Create {
        /// Label file path
        file: PathBuf,
    },

    /// Delete labels by name
    Delete {
        /// Label names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Purge existing labels, then create labels from a JSON/YAML file
    Import {
        /// Label file path ("-" reads stdin)
        file: PathBuf,

        /// Keep existing labels
        #[arg(long)]
        no_purge: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("failed to set up logging")?;

    let config = build_config(&cli)?;
    let mut syncer = LabelSyncer::connect(config)
        .await
        .context("failed to connect to GitHub")?;

    let outcomes = match cli.command {
        Commands::List { format, meta } => {
            let snapshot = syncer.get_labels(meta).await?;
            print_labels(&snapshot, &format)?;
            return Ok(());
        }
        Commands::Create { file } => {
            let labels = load_label_file(&file)?;
            syncer.create_labels(&labels).await
        }
        Commands::Delete { names } => {
            let labels: Vec<Label> = names.into_iter().map(Label::named).collect();
            syncer.delete_labels(&labels).await
        }
        Commands::Import { file, no_purge } => {
            let labels = load_label_file(&file)?;
            let result = syncer.import_labels(&labels, !no_purge).await?;
            result.outcomes().cloned().collect()
        }
    };

    display_outcomes(&outcomes);

    if outcomes.iter().any(|o| o.status == LabelStatus::Error) {
        std::process::exit(1);
    }

    Ok(())
}

/// Assemble the sync configuration from flags and environment
fn build_config(cli: &Cli) -> Result<SyncConfig> {
    let token = get_access_token(cli.access_token.clone())?;
    let repository = require_repository(cli.repository.clone())?;

    let mut config = SyncConfig::new(token, &repository)?;
    config.options.base_uri = cli.api_url.clone();
    config.max_concurrency = cli.concurrency;
    config.validate()?;
    Ok(config)
}

/// Display current labels
fn print_labels(snapshot: &LabelSnapshot, format: &str) -> Result<()> {
    match format {
        "table" => {
            println!(
                "{:<30} {:<8} {:<50}",
                "Name".cyan(),
                "Color".cyan(),
                "Description".cyan()
            );
            println!("{}", "─".repeat(90));

            for label in &snapshot.labels {
                let description = label.description.as_deref().unwrap_or("(none)");
                println!(
                    "{:<30} {:<8} {:<50}",
                    label.name,
                    format!("#{}", label.color),
                    description
                );
            }

            if let Some(meta) = &snapshot.meta {
                println!(
                    "\n{} label(s) across {} page(s)",
                    snapshot.labels.len(),
                    meta.pages
                );
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&listing(snapshot))?),
        "yaml" => println!("{}", serde_yaml::to_string(&listing(snapshot))?),
        _ => return Err(Error::config_validation("Unsupported format")),
    }

    Ok(())
}

/// Serializable view of a snapshot; `meta` only appears when it was kept
fn listing(snapshot: &LabelSnapshot) -> serde_json::Value {
    let mut value = serde_json::json!({ "labels": snapshot.labels });
    if let Some(meta) = &snapshot.meta {
        value["meta"] = serde_json::json!(meta);
    }
    value
}

/// Display per-label outcomes and a summary line
fn display_outcomes(outcomes: &[LabelOutcome]) {
    for outcome in outcomes {
        let verb = format!("{:?}", outcome.operation).to_lowercase();
        match outcome.status {
            LabelStatus::Success => {
                println!("{} {} {}", "✓".green(), verb, outcome.name.cyan());
            }
            LabelStatus::Duplicate => {
                println!(
                    "{} {} {} (already exists)",
                    "=".yellow(),
                    verb,
                    outcome.name.cyan()
                );
            }
            LabelStatus::Error => {
                let message = outcome.error_message().unwrap_or("unknown error");
                println!(
                    "{} {} {}: {}",
                    "✗".red(),
                    verb,
                    outcome.name.cyan(),
                    message.red()
                );
            }
        }
    }

    let count = |status: LabelStatus| outcomes.iter().filter(|o| o.status == status).count();
    println!(
        "\n{} succeeded, {} duplicate, {} failed",
        count(LabelStatus::Success).to_string().green(),
        count(LabelStatus::Duplicate).to_string().yellow(),
        count(LabelStatus::Error).to_string().red()
    );
}

/// Require a repository argument
fn require_repository(repo: Option<String>) -> Result<String> {
    repo.ok_or_else(|| {
        Error::config_validation("Repository is required. Use -r or --repository flag")
    })
}

/// Get access token
fn get_access_token(arg_token: Option<String>) -> Result<String> {
    arg_token
        .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
        .ok_or_else(|| {
            Error::config_validation(
                "GitHub access token is required. Set via --access-token/-t or the GITHUB_TOKEN env var",
            )
        })
}

/// Load a label file, or stdin for "-"
fn load_label_file(path: &Path) -> Result<Vec<Label>> {
    if path.as_os_str() == "-" {
        load_labels_from_stdin()
    } else {
        load_labels_from_file(path)
    }
}
