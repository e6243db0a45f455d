use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use penning_calc::Interaction;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "penning_plot")]
#[command(about = "Plot simulated Penning trap trajectories against the analytic solution")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the simulation dumps
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory for figures and CSV files
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Load the run simulated without particle interactions
    #[arg(long, global = true)]
    pub without_interaction: bool,

    /// Write figures as PNG files
    #[arg(long, global = true)]
    pub render: bool,

    /// Write trajectories as CSV files
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Load a simulated run and plot it against the analytic solution
    Plot,
    /// Compute the analytic solution only
    Analytic,
}

impl Cli {
    /// Configuration file (or defaults) with the command line applied on top.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.without_interaction {
            config.interaction = Interaction::Without;
        }
        config.render |= self.render;
        config.export_csv |= self.export_csv;

        Ok(config)
    }

    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Plot)
    }
}
