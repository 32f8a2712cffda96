//! Subcommand implementations, one per file.

mod agents;
mod config;
mod search;

pub use agents::{run_agents_list, run_agents_show};
pub use config::run_config_path;
pub use search::run_search;
