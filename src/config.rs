//! Run configuration, optionally read from a TOML file.
//!
//! ```toml
//! data_dir = "output"
//! interaction = "without"
//! render = true
//!
//! [trap]
//! omega_0 = 2.0
//! omega_z = 1.0
//!
//! [grid]
//! total_time = 50.0
//! dt = 0.001
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use penning_calc::{InitialConditions, Interaction, PhysicalTrap, TimeGrid, TrapParams};
use serde::{Deserialize, Serialize};

use crate::render::PlotStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the simulation dumps
    pub data_dir: PathBuf,
    /// Directory for rendered figures and CSV exports
    pub output_dir: PathBuf,
    pub interaction: Interaction,
    pub render: bool,
    pub export_csv: bool,
    pub trap: TrapParams,
    /// When present, takes precedence over `trap`
    pub physical: Option<PhysicalTrap>,
    pub initial: InitialConditions,
    pub grid: TimeGrid,
    pub style: PlotStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("plots"),
            interaction: Interaction::default(),
            render: false,
            export_csv: false,
            trap: TrapParams::default(),
            physical: None,
            initial: InitialConditions::default(),
            grid: TimeGrid::default(),
            style: PlotStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Trap frequencies used for the analytic reference.
    pub fn trap_params(&self) -> TrapParams {
        self.physical
            .map(|p| p.to_params())
            .unwrap_or(self.trap)
    }
}
