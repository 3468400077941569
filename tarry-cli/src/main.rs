//! Tarry CLI - decode, check and activate waits from the command line.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Family;
use std::path::PathBuf;
use tarry_core::observability::{TracingConfig, init_tracing};

/// Tarry - wait/resume checkpoints for flow runs.
#[derive(Parser)]
#[command(name = "tarry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a persisted value and print it as canonical JSON
    Decode {
        /// Family of the value
        #[arg(value_enum)]
        family: Family,

        /// Path to the JSON file, or - for stdin
        input: String,
    },

    /// Check whether a wait accepts a resume
    Check {
        /// Path to the wait JSON
        #[arg(long)]
        wait: String,

        /// Path to the resume JSON
        #[arg(long)]
        resume: String,
    },

    /// List the registered types of every family
    Types,

    /// Activate a wait against a fresh test run
    Begin {
        /// Path to the wait JSON
        #[arg(long)]
        wait: String,

        /// Kind of flow the run is in
        #[arg(long, default_value = "messaging")]
        flow_kind: String,

        /// Default country of the run's environment
        #[arg(long)]
        country: Option<String>,

        /// Start the run from an inbound message
        #[arg(long)]
        msg_trigger: bool,

        /// Path to a wait settings YAML file
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let from_env = TracingConfig::from_env();

    // explicit -v wins over the environment
    let log_filter = if verbosity > 0 {
        filter.to_string()
    } else {
        from_env.log_filter().to_string()
    };

    let config = TracingConfig::builder()
        .log_format(from_env.log_format())
        .log_filter(log_filter)
        .include_location(from_env.include_location())
        .build();

    init_tracing(&config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Decode { family, input } => commands::decode::run(family, &input),
        Commands::Check { wait, resume } => commands::check::run(&wait, &resume),
        Commands::Types => commands::types::run(),
        Commands::Begin {
            wait,
            flow_kind,
            country,
            msg_trigger,
            settings,
        } => {
            let settings = commands::load_settings(settings.as_deref())?;
            let options = commands::begin::BeginOptions {
                flow_kind: &flow_kind,
                country: country.as_deref(),
                msg_trigger,
            };
            commands::begin::run(&wait, &settings, options)
        }
    }
}
