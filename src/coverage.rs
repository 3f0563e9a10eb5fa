// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Fragmented-row handling.
//!
//! The core is cut into a site-resolution grid. Cells covered by a row are
//! usable, cells covered by a fixed instance are already obstructed, and
//! every remaining horizontal run of empty cells becomes one filler
//! rectangle so density accounting sees the whole core.

use crate::geom::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteState {
    Empty,
    Row,
    FixedInst,
}

/// Grid index range `[lower, upper)` covered by `[lo, hi]` on an axis
/// starting at `core_lo`, clamped to `[0, max_idx]`.
///
/// The lower bound rounds down and the upper bound rounds up, except that
/// an edge exactly on a grid line adds no extra cell.
pub fn site_span(lo: i32, hi: i32, core_lo: i32, site_size: i32, max_idx: usize) -> (usize, usize) {
    let site = site_size as i64;
    let lower = (lo as i64 - core_lo as i64).div_euclid(site);
    let dist = hi as i64 - core_lo as i64;
    let upper = if dist.rem_euclid(site) == 0 {
        dist.div_euclid(site)
    } else {
        dist.div_euclid(site) + 1
    };
    let clamp = |idx: i64| idx.clamp(0, max_idx as i64) as usize;
    (clamp(lower), clamp(upper))
}

#[derive(Debug, Clone)]
pub struct SiteGrid {
    core: Rect,
    site_x: i32,
    site_y: i32,
    count_x: usize,
    count_y: usize,
    cells: Vec<SiteState>,
}

impl SiteGrid {
    /// Empty grid over `core`; site sizes must be positive
    pub fn new(core: Rect, site_x: i32, site_y: i32) -> Self {
        let count_x = (core.dx() / site_x).max(0) as usize;
        let count_y = (core.dy() / site_y).max(0) as usize;
        Self {
            core,
            site_x,
            site_y,
            count_x,
            count_y,
            cells: vec![SiteState::Empty; count_x * count_y],
        }
    }

    pub fn count_x(&self) -> usize {
        self.count_x
    }

    pub fn count_y(&self) -> usize {
        self.count_y
    }

    pub fn state(&self, x: usize, y: usize) -> SiteState {
        self.cells[y * self.count_x + x]
    }

    /// Set every cell touched by `rect` to `state`
    pub fn mark(&mut self, rect: &Rect, state: SiteState) {
        let (x0, x1) = site_span(rect.lx, rect.ux, self.core.lx, self.site_x, self.count_x);
        let (y0, y1) = site_span(rect.ly, rect.uy, self.core.ly, self.site_y, self.count_y);
        for y in y0..y1 {
            let row = y * self.count_x;
            for cell in &mut self.cells[row + x0..row + x1.max(x0)] {
                *cell = state;
            }
        }
    }

    /// Rectangle of the cell run `[x0, x1)` on grid row `y`
    pub fn run_rect(&self, x0: usize, x1: usize, y: usize) -> Rect {
        let sx = self.site_x as i64;
        let sy = self.site_y as i64;
        let lx = self.core.lx as i64;
        let ly = self.core.ly as i64;
        Rect {
            lx: (lx + sx * x0 as i64) as i32,
            ly: (ly + sy * y as i64) as i32,
            ux: (lx + sx * x1 as i64) as i32,
            uy: (ly + sy * (y as i64 + 1)) as i32,
        }
    }

    /// Maximal horizontal runs of empty cells, scanned row-major.
    /// Runs never merge across grid rows.
    pub fn empty_runs(&self) -> Vec<Rect> {
        let mut runs = Vec::new();
        for y in 0..self.count_y {
            let mut x = 0;
            while x < self.count_x {
                if self.state(x, y) != SiteState::Empty {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.count_x && self.state(x, y) == SiteState::Empty {
                    x += 1;
                }
                runs.push(self.run_rect(start, x, y));
            }
        }
        runs
    }
}

/// Filler rectangles for the part of `core` covered neither by `rows` nor by
/// `fixed` obstructions
pub fn fragmented_row_fillers(
    core: Rect,
    site_x: i32,
    site_y: i32,
    rows: impl IntoIterator<Item = Rect>,
    fixed: impl IntoIterator<Item = Rect>,
) -> Vec<Rect> {
    let mut grid = SiteGrid::new(core, site_x, site_y);
    for row in rows {
        grid.mark(&row, SiteState::Row);
    }
    for inst in fixed {
        grid.mark(&inst, SiteState::FixedInst);
    }
    grid.empty_runs()
}
