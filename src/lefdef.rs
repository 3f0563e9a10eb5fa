// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! LEF/DEF design source.
//!
//! Converts a parsed library and design into integer DBU rows, instances and
//! nets. LEF values are microns and are scaled by the DEF units; macro
//! geometry is shifted by the macro `ORIGIN` and mapped into the oriented
//! frame of each component.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::def::reader::DefReader;
use crate::def::{Def, DefConnection, DefPin, DefPlacement, DefRow};
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::error::{PlaceError, PlaceResult};
use crate::geom::Rect;
use crate::instance::PlacementStatus;
use crate::lef::reader::LefReader;
use crate::lef::{Lef, LefMacro, LefRect};
use crate::net::SignalType;
use crate::source::{
    DesignSource, PlacementSink, RawBoundaryTerminal, RawDesign, RawInstTermRef, RawInstance,
    RawNet, RawRow, RawTerminal,
};

/// DEF default when neither file declares units
pub const DEFAULT_DBU_PER_MICRON: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    N,
    S,
    W,
    E,
    FN,
    FS,
    FW,
    FE,
}

impl Orientation {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "N" | "R0" => Some(Orientation::N),
            "S" | "R180" => Some(Orientation::S),
            "W" | "R90" => Some(Orientation::W),
            "E" | "R270" => Some(Orientation::E),
            "FN" | "MY" => Some(Orientation::FN),
            "FS" | "MX" => Some(Orientation::FS),
            "FW" | "MYR90" => Some(Orientation::FW),
            "FE" | "MXR90" => Some(Orientation::FE),
            _ => None,
        }
    }

    /// Quarter turns exchange width and height
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Orientation::W | Orientation::E | Orientation::FW | Orientation::FE
        )
    }

    /// Rotate or mirror a point about the origin
    pub fn apply(self, x: i32, y: i32) -> (i32, i32) {
        match self {
            Orientation::N => (x, y),
            Orientation::S => (-x, -y),
            Orientation::W => (-y, x),
            Orientation::E => (y, -x),
            Orientation::FN => (-x, y),
            Orientation::FS => (x, -y),
            Orientation::FW => (-y, -x),
            Orientation::FE => (y, x),
        }
    }

    pub fn apply_rect(self, rect: &Rect) -> Rect {
        let (x0, y0) = self.apply(rect.lx, rect.ly);
        let (x1, y1) = self.apply(rect.ux, rect.uy);
        Rect::new(x0, y0, x1, y1)
    }

    /// Map `rect` from a `width` x `height` master frame into the oriented
    /// frame whose lower-left corner is the origin
    pub fn apply_in_frame(self, rect: &Rect, width: i32, height: i32) -> Rect {
        let frame = self.apply_rect(&Rect::new(0, 0, width, height));
        self.apply_rect(rect).translate(-frame.lx, -frame.ly)
    }
}

fn parse_orientation(keyword: &str, owner: &str) -> Orientation {
    Orientation::from_keyword(keyword).unwrap_or_else(|| {
        warn!("Unknown orientation {keyword} on {owner}, using N");
        Orientation::N
    })
}

/// Microns to DBU
pub fn to_dbu(microns: f64, dbu_per_micron: f64) -> i32 {
    (microns * dbu_per_micron).round() as i32
}

/// DEF values are already DBU
fn round(value: f64) -> i32 {
    value.round() as i32
}

fn lef_rect_to_dbu(rect: &LefRect, origin: (f64, f64), dbu: f64) -> Rect {
    Rect::new(
        to_dbu(rect.xl + origin.0, dbu),
        to_dbu(rect.yl + origin.1, dbu),
        to_dbu(rect.xh + origin.0, dbu),
        to_dbu(rect.yh + origin.1, dbu),
    )
}

fn die_rect(def: &Def) -> Rect {
    let mut points = def.die_area_points.iter();
    let Some(&(x, y)) = points.next() else {
        warn!("DEF has no DIEAREA, using an empty die");
        return Rect::default();
    };
    let first = Rect::new(round(x), round(y), round(x), round(y));
    points.fold(first, |acc, &(x, y)| {
        acc.union(&Rect::new(round(x), round(y), round(x), round(y)))
    })
}

fn convert_row(row: &DefRow, lef: &Lef, dbu: f64, diag: &mut Diagnostics) -> RawRow {
    let step_x = round(row.step_x);
    let step_y = round(row.step_y);
    let (site_width, site_height) = match lef.site(&row.site_name) {
        Some(site) => (to_dbu(site.size_x, dbu), to_dbu(site.size_y, dbu)),
        None => {
            diag.warn(
                DiagnosticKind::UnknownSite,
                &row.name,
                format!("site {} not found in the library, using the row step", row.site_name),
            );
            (step_x, step_y)
        }
    };

    // n sites at the given pitch; a zero step means abutted sites
    let extent = |count: i32, step: i32, site: i32| {
        let pitch = if step > 0 { step } else { site };
        (count.max(1) - 1) * pitch + site
    };
    let x = round(row.x);
    let y = round(row.y);
    RawRow {
        name: row.name.clone(),
        rect: Rect::with_size(
            x,
            y,
            extent(row.num_x, step_x, site_width),
            extent(row.num_y, step_y, site_height),
        ),
        site_width,
        site_height,
    }
}

fn convert_component(
    name: &str,
    placement: Option<&DefPlacement>,
    macro_def: &LefMacro,
    dbu: f64,
) -> RawInstance {
    let width = to_dbu(macro_def.size_x, dbu);
    let height = to_dbu(macro_def.size_y, dbu);
    let orient = placement.map_or(Orientation::N, |p| parse_orientation(&p.orientation, name));
    let (dx, dy) = if orient.swaps_axes() {
        (height, width)
    } else {
        (width, height)
    };
    let (x, y) = placement.map_or((0, 0), |p| (round(p.x), round(p.y)));
    let status = placement
        .and_then(|p| PlacementStatus::from_def_keyword(&p.placement_type))
        .unwrap_or_default();

    let origin = (macro_def.origin_x, macro_def.origin_y);
    let terminals = macro_def
        .pins
        .iter()
        .map(|pin| RawTerminal {
            name: pin.name.clone(),
            shapes: pin
                .shapes()
                .iter()
                .map(|r| orient.apply_in_frame(&lef_rect_to_dbu(r, origin, dbu), width, height))
                .collect(),
        })
        .collect();

    RawInstance {
        name: name.to_string(),
        rect: Rect::with_size(x, y, dx, dy),
        master_width: dx,
        master_height: dy,
        status,
        terminals,
    }
}

/// Absolute shapes of a DEF pin; empty when the pin is not placed
fn boundary_shapes(pin: &DefPin) -> Vec<Rect> {
    let Some(placement) = &pin.placement else {
        return Vec::new();
    };
    let (x, y) = (round(placement.x), round(placement.y));
    if pin.rects.is_empty() {
        return vec![Rect::new(x, y, x, y)];
    }
    let orient = parse_orientation(&placement.orientation, &pin.name);
    pin.rects
        .iter()
        .map(|r| {
            let local = Rect::new(round(r.xl), round(r.yl), round(r.xh), round(r.yh));
            orient.apply_rect(&local).translate(x, y)
        })
        .collect()
}

fn signal_type(use_type: &str, net: &str) -> SignalType {
    if use_type.is_empty() {
        return SignalType::Signal;
    }
    SignalType::from_keyword(use_type).unwrap_or_else(|| {
        debug!("Net {net} has unknown USE {use_type}, treated as SIGNAL");
        SignalType::Signal
    })
}

/// Build the raw design from a library and a design
pub fn convert(lef: &Lef, def: &Def, diag: &mut Diagnostics) -> PlaceResult<RawDesign> {
    let dbu = def.dbu.or(lef.dbu).unwrap_or(DEFAULT_DBU_PER_MICRON);
    if let (Some(def_dbu), Some(lef_dbu)) = (def.dbu, lef.dbu) {
        if def_dbu > lef_dbu {
            warn!("DEF units {def_dbu} exceed LEF database units {lef_dbu}");
        }
    }

    let rows = def
        .rows
        .iter()
        .map(|row| convert_row(row, lef, dbu, diag))
        .collect();

    let mut instances = Vec::with_capacity(def.components.len());
    for comp in &def.components {
        let macro_def = lef.macro_by_name(&comp.macro_name).ok_or_else(|| {
            PlaceError::UnknownMacro {
                component: comp.name.clone(),
                macro_name: comp.macro_name.clone(),
            }
        })?;
        instances.push(convert_component(
            &comp.name,
            comp.placement.as_ref(),
            macro_def,
            dbu,
        ));
    }

    let nets = def
        .nets
        .iter()
        .map(|net| {
            let mut raw = RawNet {
                name: net.name.clone(),
                signal: signal_type(&net.use_type, &net.name),
                inst_terms: Vec::new(),
                boundary_terms: Vec::new(),
            };
            for conn in &net.connections {
                match conn {
                    DefConnection::Instance { instance, .. } if instance == "*" => {
                        debug!("Skipping wildcard connection on net {}", net.name);
                    }
                    DefConnection::Instance { instance, pin } => {
                        raw.inst_terms.push(RawInstTermRef {
                            instance: instance.clone(),
                            terminal: pin.clone(),
                        })
                    }
                    DefConnection::Boundary(name) => {
                        raw.boundary_terms.push(RawBoundaryTerminal {
                            name: name.clone(),
                            shapes: def.pin(name).map(boundary_shapes).unwrap_or_default(),
                        })
                    }
                }
            }
            raw
        })
        .collect();

    Ok(RawDesign {
        die_area: die_rect(def),
        rows,
        instances,
        nets,
    })
}

/// Parsed LEF/DEF pair together with its converted raw design
#[derive(Debug, Clone)]
pub struct LefDefDesign {
    lef: Lef,
    def: Def,
    raw: RawDesign,
}

impl LefDefDesign {
    pub fn new(lef: Lef, def: Def, diag: &mut Diagnostics) -> PlaceResult<Self> {
        let raw = convert(&lef, &def, diag)?;
        info!(
            "Design {}: {} rows, {} components, {} nets",
            def.design,
            raw.rows.len(),
            raw.instances.len(),
            raw.nets.len()
        );
        Ok(Self { lef, def, raw })
    }

    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        lef_paths: &[P],
        def_path: Q,
        diag: &mut Diagnostics,
    ) -> PlaceResult<Self> {
        let lef = LefReader::new().read_all(lef_paths)?;
        let def = DefReader::new().read(def_path)?;
        Self::new(lef, def, diag)
    }

    pub fn lef(&self) -> &Lef {
        &self.lef
    }

    pub fn def(&self) -> &Def {
        &self.def
    }

    pub fn raw(&self) -> &RawDesign {
        &self.raw
    }

    pub fn dbu_per_micron(&self) -> f64 {
        self.def
            .dbu
            .or(self.lef.dbu)
            .unwrap_or(DEFAULT_DBU_PER_MICRON)
    }
}

impl DesignSource for LefDefDesign {
    fn die_area(&self) -> Rect {
        self.raw.die_area
    }

    fn rows(&self) -> &[RawRow] {
        &self.raw.rows
    }

    fn instances(&self) -> &[RawInstance] {
        &self.raw.instances
    }

    fn nets(&self) -> &[RawNet] {
        &self.raw.nets
    }
}

impl PlacementSink for LefDefDesign {
    fn apply_location(&mut self, instance: &str, x: i32, y: i32) {
        self.raw.apply_location(instance, x, y);
        if let Some(comp) = self.def.components.iter_mut().find(|c| c.name == instance) {
            let orientation = comp
                .placement
                .as_ref()
                .map_or_else(|| "N".to_string(), |p| p.orientation.clone());
            comp.placement = Some(DefPlacement {
                placement_type: "PLACED".to_string(),
                x: x as f64,
                y: y as f64,
                orientation,
            });
        }
    }
}
