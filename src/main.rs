use aq3stat_client::config::{load_config, print_schema};
use aq3stat_client::startup::{run, Cli, Command};
use aq3stat_client::utils::logger::init_logging;
use clap::Parser;

#[tokio::main]
async fn main() {
    let command = Cli::parse().command;

    if command == Command::Schema {
        match print_schema() {
            Ok(schema) => println!("{}", schema),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config, command).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
