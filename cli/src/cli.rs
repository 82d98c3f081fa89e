use clap::{Parser, Subcommand};
use shared::config::{DEFAULT_BASE_URL, PAGE_LIMIT};
use shared::model::CarId;

/// Manage the garage and race its cars from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Backend origin
    #[arg(long, env = "GARAGE_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Cars per page
    #[arg(long, default_value_t = PAGE_LIMIT)]
    pub limit: usize,

    #[command(subcommand)]
    pub command: Action,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Print one page of the garage
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add a car
    Create {
        name: String,
        #[arg(long, default_value = "#ffffff")]
        color: String,
    },
    /// Rename or repaint a car; omitted fields keep their value
    Update {
        id: CarId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a car
    Delete { id: CarId },
    /// Add random cars
    Generate {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Race every car of one page
    Race {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}
