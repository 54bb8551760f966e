use anyhow::Result;
use boxcraft_world::{ExplosionConfig, SpawnConfig, TICKS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/sim.toml";

/// Simulation tuning loaded from TOML, with every field defaulted so a
/// partial (or missing) file still yields a runnable configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks per in-game day.
    pub ticks_per_day: u64,
    /// Mob spawn admission and despawn tuning.
    pub spawn: SpawnConfig,
    /// Ignition and explosion tuning.
    pub explosion: ExplosionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: TICKS_PER_DAY,
            spawn: SpawnConfig::default(),
            explosion: ExplosionConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on
    /// errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
