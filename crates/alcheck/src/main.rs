#![forbid(unsafe_code)]

mod check;
mod fetch;

use anyhow::Result;
use clap::{Parser, Subcommand};

use check::{check, CheckOptions};

#[derive(Parser)]
#[command(name = "alcheck", version, author)]
#[command(about = "Check digital-asset-links manifests (assetlinks.json)")]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an assetlinks.json and report its associations
    Check {
        /// Local file path, hostname, or URL
        source: String,

        /// Override the User-Agent header for remote fetches
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// Print the embedded statement-list schema
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Check { source, user_agent } => {
            check(CheckOptions { source, user_agent })?;
        }
        Commands::Schema => {
            println!("{:#}", alcheck_core::schema::schema_json());
        }
    }

    Ok(())
}
