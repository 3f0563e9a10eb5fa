// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

use crate::geom::Rect;
use crate::ids::PinId;

/// Placement status reported by the design source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlacementStatus {
    #[default]
    None,
    Unplaced,
    Suggested,
    Placed,
    Locked,
    Firm,
    Cover,
}

impl PlacementStatus {
    /// Locked, firm and cover instances are immutable to the placer
    pub fn is_fixed(self) -> bool {
        matches!(
            self,
            PlacementStatus::Locked | PlacementStatus::Firm | PlacementStatus::Cover
        )
    }

    /// Map a DEF component status keyword (DEF `FIXED` is a firm placement)
    pub fn from_def_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "UNPLACED" => Some(PlacementStatus::Unplaced),
            "PLACED" => Some(PlacementStatus::Placed),
            "FIXED" => Some(PlacementStatus::Firm),
            "COVER" => Some(PlacementStatus::Cover),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceKind {
    /// Real cell the placer may move
    Movable,
    /// Real cell whose position is immutable (macros, tap cells, ...)
    Fixed,
    /// Synthetic placeholder covering unusable core area
    Filler,
}

impl InstanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceKind::Movable => "MOVABLE",
            InstanceKind::Fixed => "FIXED",
            InstanceKind::Filler => "FILLER",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Instance {
    name: Option<String>,
    kind: InstanceKind,
    rect: Rect,
    pins: Vec<PinId>,
    ext_id: Option<i32>,
}

impl Instance {
    pub(crate) fn real(name: &str, rect: Rect, status: PlacementStatus) -> Self {
        let kind = if status.is_fixed() {
            InstanceKind::Fixed
        } else {
            InstanceKind::Movable
        };
        Self {
            name: Some(name.to_string()),
            kind,
            rect,
            pins: Vec::new(),
            ext_id: None,
        }
    }

    pub(crate) fn filler(rect: Rect) -> Self {
        Self {
            name: None,
            kind: InstanceKind::Filler,
            rect,
            pins: Vec::new(),
            ext_id: None,
        }
    }

    /// Source name; `None` for fillers
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> InstanceKind {
        self.kind
    }

    /// Fillers count as fixed
    pub fn is_fixed(&self) -> bool {
        !self.is_movable()
    }

    pub fn is_movable(&self) -> bool {
        self.kind == InstanceKind::Movable
    }

    pub fn is_filler(&self) -> bool {
        self.kind == InstanceKind::Filler
    }

    /// Backed by a real cell of the design source
    pub fn is_real(&self) -> bool {
        !self.is_filler()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn lx(&self) -> i32 {
        self.rect.lx
    }

    pub fn ly(&self) -> i32 {
        self.rect.ly
    }

    pub fn ux(&self) -> i32 {
        self.rect.ux
    }

    pub fn uy(&self) -> i32 {
        self.rect.uy
    }

    pub fn cx(&self) -> i32 {
        self.rect.cx()
    }

    pub fn cy(&self) -> i32 {
        self.rect.cy()
    }

    pub fn dx(&self) -> i32 {
        self.rect.dx()
    }

    pub fn dy(&self) -> i32 {
        self.rect.dy()
    }

    pub fn area(&self) -> i64 {
        self.rect.area()
    }

    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Dense index assigned by the optimizer
    pub fn ext_id(&self) -> Option<i32> {
        self.ext_id
    }

    pub(crate) fn set_ext_id(&mut self, ext_id: i32) {
        self.ext_id = Some(ext_id);
    }

    pub(crate) fn add_pin(&mut self, pin: PinId) {
        self.pins.push(pin);
    }

    /// Move lower-left corner to `(x, y)`; pins are refreshed by the owner
    pub(crate) fn set_location(&mut self, x: i32, y: i32) {
        self.rect = self.rect.moved_to(x, y);
    }

    /// Center the instance on `(x, y)` keeping half extents
    pub(crate) fn set_center_location(&mut self, x: i32, y: i32) {
        let half_x = self.dx() / 2;
        let half_y = self.dy() / 2;
        self.rect = Rect {
            lx: x - half_x,
            ly: y - half_y,
            ux: x + half_x,
            uy: y + half_y,
        };
    }
}
