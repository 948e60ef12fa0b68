use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use schemadraft::{Dialect, ProjectState, generate_ddl, load_project, serialize_project};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "schemadraft", version, about = "Relational schema designer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a project's tables as CREATE TABLE statements
    Ddl {
        /// Project document (JSON)
        input: PathBuf,
        /// postgres, mysql or sqlite (default: the project's dialect)
        #[arg(short, long)]
        dialect: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-export a project document in canonical form
    Export {
        /// Project document (JSON)
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_project(path: &Path) -> Result<ProjectState> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    load_project(&source).with_context(|| format!("Failed to load {}", path.display()))
}

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "written");
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Ddl {
            input,
            dialect,
            output,
        } => {
            let state = read_project(&input)?;
            let dialect = match dialect.as_deref().filter(|name| !name.is_empty()) {
                Some(name) => {
                    Dialect::from_str(name).ok_or_else(|| anyhow!("Unknown dialect: {}", name))?
                }
                None => state.dialect,
            };
            emit(output.as_deref(), &generate_ddl(&state, dialect))
        }
        Command::Export { input, output } => {
            let state = read_project(&input)?;
            let mut json = serialize_project(&state).context("Failed to serialize project")?;
            json.push('\n');
            emit(output.as_deref(), &json)
        }
    }
}
