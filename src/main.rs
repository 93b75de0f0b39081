use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;

use sitework::cli::{Cli, Commands, ConfigAction};
use sitework::commands::{
    Context, cmd_ask, cmd_board, cmd_config_path, cmd_config_set, cmd_config_show, cmd_entity,
    cmd_overview,
};
use sitework::config::{Config, LOG_ENV};
use sitework::domain::{
    Approval, Bid, Document, EmailMessage, Invoice, Payment, Quote, Rfi, Submittal,
};
use sitework::error::Result;
use sitework::logging;

async fn run(command: Commands, mock: bool, config: Config) -> Result<()> {
    let connect = || Context::new(config.clone(), mock);

    match command {
        Commands::Bids { action } => cmd_entity::<Bid>(&connect()?, action).await,
        Commands::Rfis { action } => cmd_entity::<Rfi>(&connect()?, action).await,
        Commands::Submittals { action } => cmd_entity::<Submittal>(&connect()?, action).await,
        Commands::Invoices { action } => cmd_entity::<Invoice>(&connect()?, action).await,
        Commands::Payments { action } => cmd_entity::<Payment>(&connect()?, action).await,
        Commands::Quotes { action } => cmd_entity::<Quote>(&connect()?, action).await,
        Commands::Approvals { action } => cmd_entity::<Approval>(&connect()?, action).await,
        Commands::Documents { action } => cmd_entity::<Document>(&connect()?, action).await,
        Commands::Emails { action } => cmd_entity::<EmailMessage>(&connect()?, action).await,

        Commands::Board {
            board,
            project,
            move_card,
        } => cmd_board(&connect()?, board, project.as_deref(), move_card).await,
        Commands::Ask { project, prompt } => {
            cmd_ask(&connect()?, project.as_deref(), &prompt).await
        }
        Commands::Overview { project, json } => {
            cmd_overview(&connect()?, project.as_deref(), json).await
        }

        Commands::Config { action } => run_config(action),
    }
}

/// Config commands run without a connection. Only `show` applies the
/// environment overrides; `set` reads the file alone and `path` reads nothing.
fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show { json } => cmd_config_show(&Config::load()?, json),
        ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
        ConfigAction::Path => cmd_config_path(),
    }
}

fn init_logging_from_env() {
    logging::init(&std::env::var(LOG_ENV).unwrap_or_default());
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mock = cli.mock;

    let result = match cli.command {
        Commands::Config { action } => {
            init_logging_from_env();
            run_config(action)
        }
        command => match Config::load() {
            Ok(config) => {
                logging::init(config.log_level());
                run(command, mock, config).await
            }
            Err(e) => {
                init_logging_from_env();
                Err(e)
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
