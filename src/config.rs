use serde::Deserialize;
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_SIMULATION_PATH: &str = "config/simulation.toml";

/// Driver settings for ticking an effect document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of refreshes to run.
    pub ticks: u64,
    /// Seed for `random` generators; entropy when absent.
    pub seed: Option<u64>,
    /// Print every n-th tick (0 disables printing).
    pub print_every: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 40,
            seed: None,
            print_every: 1,
        }
    }
}

impl SimulationConfig {
    /// Load simulation settings from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_SIMULATION_PATH))
    }

    /// Load settings from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimulationConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimulationConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_SIMULATION_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Simulation config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SimulationConfig::default()
            }
        }
    }

    /// Whether `tick` should be printed.
    pub fn prints(&self, tick: u64) -> bool {
        self.print_every != 0 && tick % self.print_every == 0
    }
}
