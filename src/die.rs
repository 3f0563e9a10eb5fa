// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

use crate::error::{PlaceError, PlaceResult};
use crate::geom::{BoundBox, Rect};

/// Chip outline and placeable core envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    die: Rect,
    core: Rect,
}

/// Bounding union of the row rectangles, `None` without rows
pub fn core_rect_from_rows<'a>(rows: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
    rows.into_iter().collect::<BoundBox>().get()
}

impl Die {
    pub fn new(die: Rect, core: Rect) -> Self {
        Self { die, core }
    }

    /// Die copied from the outline, core derived from the rows
    pub fn from_rows<'a>(
        outline: Rect,
        rows: impl IntoIterator<Item = &'a Rect>,
    ) -> PlaceResult<Self> {
        let core = core_rect_from_rows(rows).ok_or(PlaceError::NoRows)?;
        Ok(Self::new(outline, core))
    }

    pub fn die_rect(&self) -> Rect {
        self.die
    }

    pub fn core_rect(&self) -> Rect {
        self.core
    }

    pub fn core_area(&self) -> i64 {
        self.core.area()
    }

    pub fn die_area(&self) -> i64 {
        self.die.area()
    }

    pub fn core_inside_die(&self) -> bool {
        self.die.contains(&self.core)
    }
}
