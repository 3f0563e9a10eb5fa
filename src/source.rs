// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Raw design source interface.
//!
//! A source hands rows, instances and nets to model construction once, and
//! receives movable instance positions back through [`PlacementSink`].
//! [`RawDesign`] is the plain in-memory implementation; the LEF/DEF adapter
//! converts into it.

use serde::{Deserialize, Serialize};

use crate::geom::Rect;
use crate::instance::PlacementStatus;
use crate::net::SignalType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    pub rect: Rect,
    pub site_width: i32,
    pub site_height: i32,
}

/// Instance terminal with its shapes in the master's local frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTerminal {
    pub name: String,
    pub shapes: Vec<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    pub name: String,
    /// Placed bounding box
    pub rect: Rect,
    pub master_width: i32,
    pub master_height: i32,
    pub status: PlacementStatus,
    pub terminals: Vec<RawTerminal>,
}

impl RawInstance {
    pub fn terminal(&self, name: &str) -> Option<&RawTerminal> {
        self.terminals.iter().find(|t| t.name == name)
    }
}

/// Top-level port with shapes in absolute coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBoundaryTerminal {
    pub name: String,
    pub shapes: Vec<Rect>,
}

/// `( instance terminal )` net endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInstTermRef {
    pub instance: String,
    pub terminal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNet {
    pub name: String,
    pub signal: SignalType,
    pub inst_terms: Vec<RawInstTermRef>,
    pub boundary_terms: Vec<RawBoundaryTerminal>,
}

/// Supplier of the raw layout
pub trait DesignSource {
    fn die_area(&self) -> Rect;
    /// Rows; the first row's site size is authoritative
    fn rows(&self) -> &[RawRow];
    fn instances(&self) -> &[RawInstance];
    fn nets(&self) -> &[RawNet];
}

/// Receiver of new lower-left positions for movable instances
pub trait PlacementSink {
    fn apply_location(&mut self, instance: &str, x: i32, y: i32);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDesign {
    pub die_area: Rect,
    pub rows: Vec<RawRow>,
    pub instances: Vec<RawInstance>,
    pub nets: Vec<RawNet>,
}

impl DesignSource for RawDesign {
    fn die_area(&self) -> Rect {
        self.die_area
    }

    fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    fn instances(&self) -> &[RawInstance] {
        &self.instances
    }

    fn nets(&self) -> &[RawNet] {
        &self.nets
    }
}

impl PlacementSink for RawDesign {
    fn apply_location(&mut self, instance: &str, x: i32, y: i32) {
        match self.instances.iter_mut().find(|i| i.name == instance) {
            Some(inst) => {
                inst.rect = inst.rect.moved_to(x, y);
                inst.status = PlacementStatus::Placed;
            }
            None => log::warn!("Write-back for unknown instance {instance}"),
        }
    }
}
