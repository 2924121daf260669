pub mod assign;
pub mod categories;
pub mod categorize;
pub mod import;
pub mod init;
pub mod month;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kasboek",
    about = "Household-finance bookkeeping for Rabobank CSV exports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up kasboek: choose a data directory and initialize the database.
    Init {
        /// Path for kasboek data (default: ~/Documents/kasboek)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Default user name for imports and reports
        #[arg(long)]
        user: Option<String>,
    },
    /// Import a Rabobank CSV export and auto-categorize transactions.
    Import {
        /// Path to the CSV file to import
        file: String,
        /// User to import for (default: from settings)
        #[arg(long)]
        user: Option<String>,
    },
    /// Monthly expense overview with per-category sums and averages.
    Month {
        /// Month to report on: YYYY-MM
        month: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Re-run category inference on uncategorized transactions.
    Categorize {
        #[arg(long)]
        user: Option<String>,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Assign a category to one transaction; similar ones follow.
    Assign {
        /// Dedup code of the transaction (32 hex characters)
        code: String,
        /// Category name to assign
        #[arg(long)]
        category: String,
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List all categories.
    List,
    /// Add a new category.
    Add {
        /// Category name
        name: String,
        /// Short description
        #[arg(long)]
        description: Option<String>,
    },
}
