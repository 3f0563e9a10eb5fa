// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use log::info;

use super::{def_parser::parse_def, Def};
use crate::error::{PlaceError, PlaceResult};

pub struct DefReader;

impl DefReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> PlaceResult<Def> {
        let path_str = path.as_ref().display().to_string();
        info!("Loading DEF file: {path_str}");

        let content = fs::read_to_string(path)?;
        info!("DEF file size: {} bytes", content.len());

        parse_def(&content).map_err(|e| PlaceError::Parse(format!("{path_str}: {e}")))
    }
}

impl Default for DefReader {
    fn default() -> Self {
        Self::new()
    }
}
