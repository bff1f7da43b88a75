//! drift CLI
//!
//! Command-line tool for planning declarative schema migrations.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use drift_plan::{write_script, PlanError, Planner};
use drift_schema::{load_file, Snapshot};

/// Declarative schema migration planner.
#[derive(Parser)]
#[command(name = "drift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a migration script from a schema document.
    Generate {
        /// Desired-schema document (JSON).
        #[arg(short = 'f', long)]
        schema_file: PathBuf,

        /// Actual-state snapshot (JSON). Omit for an empty database.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Restrict planning to one schema.
        #[arg(long)]
        schema: Option<String>,

        /// Output file (stdout if not specified).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse and validate a schema document without planning.
    Validate {
        /// Desired-schema document (JSON).
        #[arg(short = 'f', long)]
        schema_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            schema_file,
            state,
            schema,
            out,
        } => generate(&schema_file, state.as_deref(), schema.as_deref(), out.as_deref()),
        Commands::Validate { schema_file } => {
            let set = load_file(&schema_file)?;
            info!(
                schemas = set.schemas.len(),
                file = %schema_file.display(),
                "schema document is valid"
            );
            Ok(())
        }
    }
}

fn generate(
    schema_file: &std::path::Path,
    state: Option<&std::path::Path>,
    schema: Option<&str>,
    out: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let mut desired = load_file(schema_file)?;
    let mut snapshot = match state {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Snapshot::new(),
    };

    if let Some(name) = schema {
        if desired.get_schema(name).is_none() {
            return Err(PlanError::UnknownSchema {
                name: name.to_string(),
            }
            .into());
        }
        desired = desired.filtered(name);
        snapshot = snapshot.filtered(name);
    }

    let plan = Planner::new().plan(&snapshot, &desired)?;
    if plan.is_empty() {
        info!("schemas already match; empty script generated");
    }
    let script = write_script(&plan);

    match out {
        Some(path) => {
            fs::write(path, &script)?;
            info!(file = %path.display(), statements = plan.len(), "script written");
        }
        None => print!("{script}"),
    }
    Ok(())
}
