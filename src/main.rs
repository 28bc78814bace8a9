mod cli;
mod logging;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use vault_duper::client::VaultClient;
use vault_duper::prompt::{AlwaysConfirm, ConfirmAction, StdinConfirm};
use vault_duper::{config, DedupeEngine, RunReport};

fn main() -> Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Process { yes }) => {
            if let Err(err) = run_process(&config, yes) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Export) => {
            if let Err(err) = run_export(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Dedupe { input }) => {
            if let Err(err) = run_dedupe_file(&config, input) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::ListFolders) => {
            if let Err(err) = run_list_folders(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_process(config: &config::AppConfig, yes: bool) -> Result<()> {
    let client = VaultClient::new(&config.base_url)?;
    let engine = DedupeEngine::new(config.clone());

    let report = if yes {
        engine.run(&client, &AlwaysConfirm)?
    } else {
        let confirm: &dyn ConfirmAction = &StdinConfirm {
            default: Some(false),
        };
        engine.run(&client, confirm)?
    };

    print_report(&report);
    Ok(())
}

fn run_export(config: &config::AppConfig) -> Result<()> {
    let client = VaultClient::new(&config.base_url)?;
    let engine = DedupeEngine::new(config.clone());
    engine.export(&client)?;
    Ok(())
}

fn run_dedupe_file(config: &config::AppConfig, input: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| PathBuf::from(&config.export_path));
    let engine = DedupeEngine::new(config.clone());
    let report = engine.dedupe_file(&input)?;
    print_report(&report);
    Ok(())
}

fn run_list_folders(config: &config::AppConfig) -> Result<()> {
    let client = VaultClient::new(&config.base_url)?;
    let folders = client.get_folders()?;
    println!("{}", serde_json::to_string_pretty(&folders)?);
    Ok(())
}

fn print_report(report: &RunReport) {
    info!(
        "Fetch: {}, Dedupe: {}",
        format!("{:.2}s", report.fetch_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.dedupe_duration.as_secs_f64()).green(),
    );
    info!(
        "{} total, {} unique, {} duplicates, {} orphans",
        format!("{}", report.total).cyan(),
        format!("{}", report.unique).green(),
        format!("{}", report.duplicates).red(),
        format!("{}", report.orphans).red(),
    );
}
