// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LefRect {
    pub layer: String,
    pub xl: f64,
    pub yl: f64,
    pub xh: f64,
    pub yh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LefPolygon {
    pub layer: String,
    pub points: Vec<(f64, f64)>,
}

impl LefPolygon {
    /// Bounding rectangle of the outline, `None` without points
    pub fn bounding_rect(&self) -> Option<LefRect> {
        let (&(x0, y0), rest) = self.points.split_first()?;
        let init = (x0, y0, x0, y0);
        let (xl, yl, xh, yh) = rest.iter().fold(init, |(xl, yl, xh, yh), &(x, y)| {
            (xl.min(x), yl.min(y), xh.max(x), yh.max(y))
        });
        Some(LefRect {
            layer: self.layer.clone(),
            xl,
            yl,
            xh,
            yh,
        })
    }
}

/// Shapes of one `PORT` or `OBS` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LefPort {
    pub rects: Vec<LefRect>,
    pub polygons: Vec<LefPolygon>,
}

pub type LefObstruction = LefPort;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LefPin {
    pub name: String,
    pub direction: String,
    pub use_type: String,
    pub shape: String,
    pub ports: Vec<LefPort>,
}

impl LefPin {
    /// Every port rectangle, polygons by their bounding rectangle
    pub fn shapes(&self) -> Vec<LefRect> {
        self.ports
            .iter()
            .flat_map(|port| {
                port.rects
                    .iter()
                    .cloned()
                    .chain(port.polygons.iter().filter_map(LefPolygon::bounding_rect))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LefMacro {
    pub name: String,
    pub class: String,
    pub site_name: String,
    pub origin_x: f64,
    pub origin_y: f64,
    pub size_x: f64,
    pub size_y: f64,
    pub pins: Vec<LefPin>,
    pub obstruction: Option<LefObstruction>,
}

impl LefMacro {
    pub fn pin(&self, name: &str) -> Option<&LefPin> {
        self.pins.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LefSite {
    pub name: String,
    pub class: String,
    pub size_x: f64,
    pub size_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lef {
    /// `UNITS DATABASE MICRONS`
    pub dbu: Option<f64>,
    pub sites: Vec<LefSite>,
    pub macros: Vec<LefMacro>,
}

impl Lef {
    pub fn macro_by_name(&self, name: &str) -> Option<&LefMacro> {
        self.macros.iter().find(|m| m.name == name)
    }

    pub fn site(&self, name: &str) -> Option<&LefSite> {
        self.sites.iter().find(|s| s.name == name)
    }

    /// Merge another library, e.g. cells after a tech LEF
    pub fn merge(&mut self, other: Lef) {
        if self.dbu.is_none() {
            self.dbu = other.dbu;
        }
        self.sites.extend(other.sites);
        self.macros.extend(other.macros);
    }
}

pub mod lef_parser;
pub mod reader;
