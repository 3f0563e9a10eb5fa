// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use log::{debug, info};

use super::Lef;
use crate::error::{PlaceError, PlaceResult};

pub struct LefReader;

impl LefReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> PlaceResult<Lef> {
        let path_str = path.as_ref().display().to_string();
        info!("Loading LEF file: {path_str}");

        let content = fs::read_to_string(path)?;
        info!("LEF file size: {} bytes", content.len());

        let lef = super::lef_parser::parse_lef(&content)
            .map_err(|e| PlaceError::Parse(format!("{path_str}: {e}")))?;

        let total_pins: usize = lef.macros.iter().map(|m| m.pins.len()).sum();
        let total_shapes: usize = lef
            .macros
            .iter()
            .flat_map(|m| &m.pins)
            .map(|p| p.shapes().len())
            .sum();
        debug!("Statistics: {total_pins} pins, {total_shapes} shapes");

        Ok(lef)
    }

    /// Read several files into one library, in order
    pub fn read_all<P: AsRef<Path>>(&self, paths: &[P]) -> PlaceResult<Lef> {
        let mut lef = Lef::default();
        for path in paths {
            lef.merge(self.read(path)?);
        }
        Ok(lef)
    }
}

impl Default for LefReader {
    fn default() -> Self {
        Self::new()
    }
}
