mod categorizer;
mod cli;
mod code;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod parser;
mod reports;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CategoriesCommands, Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir, user } => cli::init::run(data_dir, user),
        Commands::Import { file, user } => cli::import::run(&file, &user),
        Commands::Month { month, user } => cli::month::run(&month, &user),
        Commands::Categorize { user } => cli::categorize::run(&user),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add { name, description } => {
                cli::categories::add(&name, description.as_deref())
            }
        },
        Commands::Assign {
            code,
            category,
            user,
        } => cli::assign::run(&code, &category, &user),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
