// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefRect {
    pub layer: String,
    pub xl: f64,
    pub yl: f64,
    pub xh: f64,
    pub yh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefPlacement {
    pub placement_type: String, // PLACED, FIXED, COVER, UNPLACED
    pub x: f64,
    pub y: f64,
    pub orientation: String, // N, S, E, W, FN, FS, FE, FW
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefComponent {
    pub name: String,
    pub macro_name: String,
    pub placement: Option<DefPlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefPin {
    pub name: String,
    pub net: String,
    pub use_type: String,
    pub direction: String,
    pub placement: Option<DefPlacement>,
    /// Shapes relative to the pin location
    pub rects: Vec<DefRect>,
}

/// `( instance pin )` or `( PIN name )` net endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefConnection {
    Instance { instance: String, pin: String },
    Boundary(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefNet {
    pub name: String,
    pub use_type: String,
    pub connections: Vec<DefConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefRow {
    pub name: String,
    pub site_name: String,
    pub x: f64,
    pub y: f64,
    pub orientation: String,
    pub num_x: i32,
    pub num_y: i32,
    pub step_x: f64,
    pub step_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Def {
    pub design: String,
    /// DBU per micron from `UNITS DISTANCE MICRONS`
    pub dbu: Option<f64>,
    pub die_area_points: Vec<(f64, f64)>,
    pub rows: Vec<DefRow>,
    pub components: Vec<DefComponent>,
    pub pins: Vec<DefPin>,
    pub nets: Vec<DefNet>,
}

impl Def {
    pub fn component(&self, name: &str) -> Option<&DefComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn pin(&self, name: &str) -> Option<&DefPin> {
        self.pins.iter().find(|p| p.name == name)
    }
}

pub mod def_parser;
pub mod parser;
pub mod preprocessor;
pub mod reader;
