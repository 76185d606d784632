//! scoutsheet CLI: score scouting records against a form configuration.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "scoutsheet", version, about = "Scouting data scorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every team record against the configured equations
    Run {
        /// Directory of team record files (.json or .toml)
        #[arg(long)]
        teams: PathBuf,

        /// Form configuration file (overrides settings)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Settings file path
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Output directory (overrides settings)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv, html, json, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Equation to rank teams by
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Validate a form configuration file
    Validate {
        /// Form configuration file
        #[arg(long)]
        config: PathBuf,
    },

    /// Show how each equation scores a single team
    Explain {
        /// Form configuration file
        #[arg(long)]
        config: PathBuf,

        /// Team record file
        #[arg(long)]
        team: PathBuf,

        /// Record key holding the team number
        #[arg(long, default_value = "team_num")]
        team_number_key: String,
    },

    /// Create starter settings and form configuration
    Init,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "scoutsheet=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            teams,
            config,
            settings,
            output,
            format,
            sort_by,
        } => commands::run::execute(teams, config, settings, output, format, sort_by),
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::Explain {
            config,
            team,
            team_number_key,
        } => commands::explain::execute(config, team, team_number_key),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
