//! # Dorm Wizard CLI
//!
//! Drives the registration wizard against a camelCase JSON draft file.

use clap::{Parser, Subcommand};
use dorm_wizard::config::RuntimeConfig;
use dorm_wizard::logging::{self, codes};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod file_submitter;

/// Dormitory registration wizard
#[derive(Parser)]
#[command(name = "dorm-wizard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output, including the wizard's own structured log
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every data-entry step of a draft
    Validate {
        /// Draft file (JSON)
        draft: PathBuf,

        /// Do not require the fields of each invoice title's own type
        #[arg(long, default_value_t = false)]
        lenient_invoice_titles: bool,
    },

    /// Print the summary sections and total of a draft
    Summary {
        /// Draft file (JSON)
        draft: PathBuf,
    },

    /// Walk the draft through every step and write the submission payload
    Submit {
        /// Draft file (JSON)
        draft: PathBuf,

        /// Payload output file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Print an empty draft to start from
    Template,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut config = RuntimeConfig::from_env();
    if cli.verbose {
        config.logging.enable_console_logging = true;
    }
    if let Err(e) = logging::config::init_runtime_preferences(config.logging.clone())
        .and_then(|()| logging::init_global_logging())
    {
        logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &e);
        return Err(e.into());
    }

    log::debug!("{}", logging::get_system_diagnostics());

    let ok = match cli.command {
        Commands::Validate {
            draft,
            lenient_invoice_titles,
        } => {
            if lenient_invoice_titles {
                config.wizard.enforce_invoice_title_type = false;
            }
            commands::validate(&draft, &config)?
        }
        Commands::Summary { draft } => commands::summary(&draft)?,
        Commands::Submit { draft, out } => commands::submit(&draft, &out, &config)?,
        Commands::Template => commands::template(&config)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
