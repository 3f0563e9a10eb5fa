// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Axis-aligned rectangle primitives in database units (DBU)

use serde::{Deserialize, Serialize};

/// Integer rectangle `(lx, ly) - (ux, uy)` with `lx <= ux` and `ly <= uy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub lx: i32,
    pub ly: i32,
    pub ux: i32,
    pub uy: i32,
}

impl Rect {
    /// Build a rectangle from two corners in any order
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            lx: x0.min(x1),
            ly: y0.min(y1),
            ux: x0.max(x1),
            uy: y0.max(y1),
        }
    }

    /// Rectangle with lower-left at `(x, y)` and the given extent
    pub fn with_size(x: i32, y: i32, dx: i32, dy: i32) -> Self {
        Self::new(x, y, x + dx, y + dy)
    }

    pub fn dx(&self) -> i32 {
        self.ux - self.lx
    }

    pub fn dy(&self) -> i32 {
        self.uy - self.ly
    }

    pub fn cx(&self) -> i32 {
        ((self.lx as i64 + self.ux as i64) / 2) as i32
    }

    pub fn cy(&self) -> i32 {
        ((self.ly as i64 + self.uy as i64) / 2) as i32
    }

    pub fn area(&self) -> i64 {
        self.dx() as i64 * self.dy() as i64
    }

    /// Half-perimeter of the rectangle
    pub fn half_perimeter(&self) -> i64 {
        self.dx() as i64 + self.dy() as i64
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.lx >= self.ux || self.ly >= self.uy
    }

    /// Overlapping region with positive area, if any.
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let lx = self.lx.max(other.lx);
        let ly = self.ly.max(other.ly);
        let ux = self.ux.min(other.ux);
        let uy = self.uy.min(other.uy);
        if lx >= ux || ly >= uy {
            None
        } else {
            Some(Rect { lx, ly, ux, uy })
        }
    }

    pub fn overlap_area(&self, other: &Rect) -> i64 {
        self.intersection(other).map_or(0, |r| r.area())
    }

    /// Smallest rectangle enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            lx: self.lx.min(other.lx),
            ly: self.ly.min(other.ly),
            ux: self.ux.max(other.ux),
            uy: self.uy.max(other.uy),
        }
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.lx <= other.lx && self.ly <= other.ly && self.ux >= other.ux && self.uy >= other.uy
    }

    /// Same extent, lower-left moved to `(x, y)`
    pub fn moved_to(&self, x: i32, y: i32) -> Rect {
        Rect {
            lx: x,
            ly: y,
            ux: x + self.dx(),
            uy: y + self.dy(),
        }
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            lx: self.lx + dx,
            ly: self.ly + dy,
            ux: self.ux + dx,
            uy: self.uy + dy,
        }
    }
}

/// Running bounding box over a set of rectangles.
///
/// Stays empty until the first rectangle is added, which lets callers tell
/// "no shapes at all" apart from a degenerate box at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundBox {
    bounds: Option<Rect>,
}

impl BoundBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rect: &Rect) {
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(rect),
            None => *rect,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn get(&self) -> Option<Rect> {
        self.bounds
    }
}

impl<'a> Extend<&'a Rect> for BoundBox {
    fn extend<I: IntoIterator<Item = &'a Rect>>(&mut self, iter: I) {
        for rect in iter {
            self.add(rect);
        }
    }
}

impl<'a> FromIterator<&'a Rect> for BoundBox {
    fn from_iter<I: IntoIterator<Item = &'a Rect>>(iter: I) -> Self {
        let mut bbox = BoundBox::new();
        bbox.extend(iter);
        bbox
    }
}
