mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{project::ProjectSubcommand, skill::SkillSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "portfolio",
    about = "Project and skill records in flat JSON files, served over HTTP with a chat relay",
    version,
    propagate_version = true
)]
struct Cli {
    /// Root directory (default: nearest ancestor with portfolio.yaml, else cwd)
    #[arg(long, global = true, env = "PORTFOLIO_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write portfolio.yaml and empty collection files where missing
    Init,

    /// Run the HTTP API and chat server
    Serve {
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port; 0 = OS-assigned)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage skills
    Skill {
        #[command(subcommand)]
        subcommand: SkillSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Serve { host, port } => cmd::serve::run(&root, host, port),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Skill { subcommand } => cmd::skill::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
