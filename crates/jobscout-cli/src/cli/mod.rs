//! CLI for the jobscout aggregator.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use jobscout_core::config;
use jobscout_core::model::{ExperienceLevel, FilterCriteria};

use commands::{run_agents_list, run_agents_show, run_config_path, run_search};

/// Top-level CLI for jobscout.
#[derive(Debug, Parser)]
#[command(name = "jobscout")]
#[command(about = "jobscout: aggregate job postings from many sources and analyse them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch from every enabled source, merge, filter and summarise.
    Search(SearchArgs),

    /// Inspect configured sources.
    Agents {
        #[command(subcommand)]
        command: AgentsCommand,
    },

    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location.
    Path,
}

#[derive(Debug, Subcommand)]
pub enum AgentsCommand {
    /// List every configured source with its status.
    List,
    /// Show one source's configuration.
    Show {
        /// Registry name, e.g. `remoteok`.
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring of the job title.
    #[arg(long)]
    pub title: Option<String>,
    /// Keyword matched against title, description and skills (repeatable; any matches).
    #[arg(long = "keyword", value_name = "WORD")]
    pub keywords: Vec<String>,
    /// Location substring.
    #[arg(long)]
    pub location: Option<String>,
    /// Additional location (repeatable; any matches).
    #[arg(long = "in", value_name = "LOCATION")]
    pub locations: Vec<String>,
    /// Required skill (repeatable; all must match).
    #[arg(long = "skill", value_name = "SKILL")]
    pub skills: Vec<String>,
    /// Only remote positions.
    #[arg(long)]
    pub remote_only: bool,
    #[arg(long)]
    pub min_salary: Option<u64>,
    #[arg(long)]
    pub max_salary: Option<u64>,
    /// entry, mid, senior or lead.
    #[arg(long)]
    pub experience: Option<ExperienceLevel>,
    /// Require (true) or exclude (false) degree-gated postings.
    #[arg(long)]
    pub degree: Option<bool>,
    /// Page size; 0 prints every match. Defaults to `default_limit` from config.
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, default_value = "0")]
    pub offset: usize,
    /// Enable a source for this run only (repeatable).
    #[arg(long = "enable", value_name = "AGENT")]
    pub enable: Vec<String>,
    /// Disable a source for this run only (repeatable).
    #[arg(long = "disable", value_name = "AGENT")]
    pub disable: Vec<String>,
    /// Run deadline in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Print the full response as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn criteria(&self, default_limit: usize) -> FilterCriteria {
        FilterCriteria {
            title: self.title.clone(),
            keywords: self.keywords.clone(),
            location: self.location.clone(),
            locations: self.locations.clone(),
            remote_only: self.remote_only,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            experience_level: self.experience,
            degree_required: self.degree,
            skills: self.skills.clone(),
            limit: self.limit.unwrap_or(default_limit),
            offset: self.offset,
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Search(args) => run_search(&cfg, &args).await?,
            CliCommand::Agents { command } => match command {
                AgentsCommand::List => run_agents_list(&cfg)?,
                AgentsCommand::Show { name } => run_agents_show(&cfg, &name)?,
            },
            CliCommand::Config { command } => match command {
                ConfigCommand::Path => run_config_path()?,
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
