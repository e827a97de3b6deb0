//! linkvars CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod document;
mod navigator;

use commands::{GlobalArgs, LinkArgs};

#[derive(Parser)]
#[command(name = "linkvars")]
#[command(version)]
#[command(about = "Resolve profile-aware link templates", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./linkvars.yml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Device profile to use (defaults to the profile registered for --vault)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Vault location used to pick the device profile (defaults to the current directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a template to a single string
    Resolve {
        #[command(flatten)]
        link: LinkArgs,
    },

    /// List every alternative of a template
    Expand {
        #[command(flatten)]
        link: LinkArgs,

        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a template and open the result
    Open {
        #[command(flatten)]
        link: LinkArgs,

        /// Option to open when the template offers a choice (1-based)
        #[arg(long, value_name = "N")]
        choose: Option<usize>,

        /// Channel to open addresses on
        #[arg(long, value_enum)]
        channel: Option<commands::open::ChannelArg>,

        /// Treat the rich channel as unavailable
        #[arg(long)]
        no_rich: bool,
    },

    /// Validate the settings file and show the active dictionary
    Check,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkvars=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let global = GlobalArgs {
        config: cli.config,
        profile: cli.profile,
        vault: cli.vault,
    };
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Resolve { link } => commands::resolve::execute(&global, &link, &mut stdout),
        Commands::Expand { link, json } => {
            commands::expand::execute(&global, &link, json, &mut stdout)
        }
        Commands::Open {
            link,
            choose,
            channel,
            no_rich,
        } => commands::open::execute(
            &global,
            &commands::open::OpenArgs {
                link,
                choose,
                channel,
                no_rich,
            },
            &mut stdout,
        ),
        Commands::Check => commands::check::execute(&global, &mut stdout),
    }
}
