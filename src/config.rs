// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlaceError, PlaceResult};
use crate::net::SignalType;

/// Knobs for model construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceBaseConfig {
    /// Construction aborts when utilization (percent) reaches this value
    pub max_utilization: f64,
    /// Movable cells taller than this many site rows count as macros
    pub macro_height_factor: i32,
    /// Nets of these types never enter the model
    pub skip_signal_types: Vec<SignalType>,
}

impl Default for PlaceBaseConfig {
    fn default() -> Self {
        Self {
            max_utilization: 100.1,
            macro_height_factor: 6,
            skip_signal_types: vec![SignalType::Power, SignalType::Ground, SignalType::Reset],
        }
    }
}

impl PlaceBaseConfig {
    pub fn from_toml_str(content: &str) -> PlaceResult<Self> {
        let config: PlaceBaseConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PlaceResult<Self> {
        let path_str = path.as_ref().display().to_string();
        log::info!("Loading config file: {path_str}");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_max_utilization(mut self, limit: f64) -> Self {
        self.max_utilization = limit;
        self
    }

    pub fn skips(&self, signal: SignalType) -> bool {
        self.skip_signal_types.contains(&signal)
    }

    pub fn validate(&self) -> PlaceResult<()> {
        if !(self.max_utilization > 0.0) {
            return Err(PlaceError::Config(format!(
                "max_utilization must be positive, got {}",
                self.max_utilization
            )));
        }
        if self.macro_height_factor <= 0 {
            return Err(PlaceError::Config(format!(
                "macro_height_factor must be positive, got {}",
                self.macro_height_factor
            )));
        }
        Ok(())
    }
}
