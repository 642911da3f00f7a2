//! `classport` CLI - Import class schedules into a calendar store

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cmd;

#[derive(Parser)]
#[command(name = "classport")]
#[command(about = "Turn class schedule PDFs or pasted text into calendar-ready records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a schedule document (PDF or TXT) through review and commit
    Import {
        /// Schedule file to import
        file: PathBuf,

        /// Skip the interactive review and commit every candidate
        #[arg(short, long)]
        yes: bool,

        /// Calendar store to commit confirmed classes into
        #[arg(long, default_value = "classes.json")]
        calendar: PathBuf,

        /// Print candidates as JSON instead of committing
        #[arg(long)]
        json: bool,
    },

    /// Import pasted schedule text read from stdin
    Paste {
        /// Skip the interactive review and commit every candidate
        #[arg(short, long)]
        yes: bool,

        /// Calendar store to commit confirmed classes into
        #[arg(long, default_value = "classes.json")]
        calendar: PathBuf,

        /// Print candidates as JSON instead of committing
        #[arg(long)]
        json: bool,
    },

    /// Show the reconstructed text a document yields, without parsing
    Inspect {
        /// Schedule file to inspect
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { file, yes, calendar, json } => {
            cmd::import::cmd_import(&file, yes, &calendar, json).await?;
        }
        Commands::Paste { yes, calendar, json } => {
            cmd::import::cmd_paste(yes, &calendar, json).await?;
        }
        Commands::Inspect { file } => {
            cmd::import::cmd_inspect(&file).await?;
        }
    }

    Ok(())
}
