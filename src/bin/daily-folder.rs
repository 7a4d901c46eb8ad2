//! Daily Folder CLI Binary
//!
//! Command-line interface for finding and creating date folders.

use clap::Parser;
use daily_folder::config::ConfigLoader;
use daily_folder::logging::init_logging;
use daily_folder::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
        logging.output = "file+stderr".to_string();
    }
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let context = CliContext::new(config, cli.config.clone(), cli.store.clone())
        .with_scope(cli.scope)
        .with_format(cli.format.clone());

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            process::exit(1);
        }
    };

    match runtime.block_on(context.execute(&cli.command)) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
