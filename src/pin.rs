// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Pin locations.
//!
//! An instance pin stores its offset from the owning instance's center, taken
//! from the master's shapes in the unplaced frame, so relocating the instance
//! only needs `inst.cx() + offset_cx`. Boundary pins sit at the center of
//! their shapes and carry a zero offset.

use crate::geom::{BoundBox, Rect};
use crate::ids::{InstId, NetId};
use crate::instance::Instance;

/// What a pin is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Terminal of an instance
    Instance { inst: InstId, name: String },
    /// Top-level port owned by the die; `shape_box` is `None` if unplaced
    Boundary { name: String, shape_box: Option<Rect> },
}

/// Optimizer bookkeeping flags; construction never sets them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PinFlags(u8);

impl PinFlags {
    pub const MIN_X: PinFlags = PinFlags(1 << 0);
    pub const MIN_Y: PinFlags = PinFlags(1 << 1);
    pub const MAX_X: PinFlags = PinFlags(1 << 2);
    pub const MAX_Y: PinFlags = PinFlags(1 << 3);

    pub fn empty() -> Self {
        PinFlags(0)
    }

    pub fn contains(self, other: PinFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PinFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: PinFlags) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Offset of the shapes' center from the master center, in the unplaced
/// frame. `None` when the terminal has no shapes.
pub fn instance_pin_offset(shapes: &[Rect], master_dx: i32, master_dy: i32) -> Option<(i32, i32)> {
    let bbox: BoundBox = shapes.iter().collect();
    bbox.get()
        .map(|b| (b.cx() - master_dx / 2, b.cy() - master_dy / 2))
}

#[derive(Debug, Clone)]
pub struct Pin {
    terminal: Terminal,
    net: NetId,
    cx: i32,
    cy: i32,
    offset_cx: i32,
    offset_cy: i32,
    flags: PinFlags,
}

impl Pin {
    /// Pin of `inst` placed with lower-left at `placed`, `offset` from the
    /// master center of a `master_dx` x `master_dy` template
    pub(crate) fn for_instance(
        inst: InstId,
        name: &str,
        placed: &Rect,
        master_dx: i32,
        master_dy: i32,
        offset: (i32, i32),
        net: NetId,
    ) -> Self {
        Self {
            terminal: Terminal::Instance {
                inst,
                name: name.to_string(),
            },
            net,
            cx: placed.lx + master_dx / 2 + offset.0,
            cy: placed.ly + master_dy / 2 + offset.1,
            offset_cx: offset.0,
            offset_cy: offset.1,
            flags: PinFlags::empty(),
        }
    }

    /// Boundary pin at the center of its absolute shapes, `(0, 0)` if none
    pub(crate) fn for_boundary(name: &str, shapes: &[Rect], net: NetId) -> Self {
        let shape_box = shapes.iter().collect::<BoundBox>().get();
        let (cx, cy) = shape_box.map_or((0, 0), |b| (b.cx(), b.cy()));
        Self {
            terminal: Terminal::Boundary {
                name: name.to_string(),
                shape_box,
            },
            net,
            cx,
            cy,
            offset_cx: 0,
            offset_cy: 0,
            flags: PinFlags::empty(),
        }
    }

    /// Re-derive the absolute center from the owner's current position
    pub fn update_location(&mut self, inst: &Instance) {
        self.cx = inst.cx() + self.offset_cx;
        self.cy = inst.cy() + self.offset_cy;
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn name(&self) -> &str {
        match &self.terminal {
            Terminal::Instance { name, .. } | Terminal::Boundary { name, .. } => name,
        }
    }

    /// Owning instance, `None` for boundary pins
    pub fn instance(&self) -> Option<InstId> {
        match self.terminal {
            Terminal::Instance { inst, .. } => Some(inst),
            Terminal::Boundary { .. } => None,
        }
    }

    /// Union of the boundary pin's shapes
    pub fn boundary_box(&self) -> Option<Rect> {
        match self.terminal {
            Terminal::Boundary { shape_box, .. } => shape_box,
            Terminal::Instance { .. } => None,
        }
    }

    pub fn is_instance_terminal(&self) -> bool {
        matches!(self.terminal, Terminal::Instance { .. })
    }

    pub fn is_boundary_terminal(&self) -> bool {
        matches!(self.terminal, Terminal::Boundary { .. })
    }

    pub fn net(&self) -> NetId {
        self.net
    }

    pub fn cx(&self) -> i32 {
        self.cx
    }

    pub fn cy(&self) -> i32 {
        self.cy
    }

    pub fn offset_cx(&self) -> i32 {
        self.offset_cx
    }

    pub fn offset_cy(&self) -> i32 {
        self.offset_cy
    }

    pub fn flags(&self) -> PinFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut PinFlags {
        &mut self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::PlacementStatus;

    #[test]
    fn test_offset_from_master_center() {
        // 20x10 master, pin shape centered at (15, 5)
        let shapes = [Rect::new(14, 4, 16, 6)];
        assert_eq!(instance_pin_offset(&shapes, 20, 10), Some((5, 0)));
        assert_eq!(instance_pin_offset(&[], 20, 10), None);
    }

    #[test]
    fn test_instance_pin_position() {
        let placed = Rect::new(100, 200, 120, 210);
        let pin = Pin::for_instance(
            InstId::from_index(0),
            "A",
            &placed,
            20,
            10,
            (5, 0),
            NetId::from_index(0),
        );
        assert_eq!((pin.cx(), pin.cy()), (115, 205));
        assert_eq!(pin.instance(), Some(InstId::from_index(0)));
        assert!(pin.flags().is_empty());
    }

    #[test]
    fn test_update_location_follows_instance() {
        let mut inst = Instance::real("u1", Rect::new(0, 0, 20, 10), PlacementStatus::Placed);
        let mut pin = Pin::for_instance(
            InstId::from_index(0),
            "Y",
            &inst.rect(),
            20,
            10,
            (-3, 2),
            NetId::from_index(0),
        );
        inst.set_location(1000, 500);
        pin.update_location(&inst);
        assert_eq!(pin.cx(), inst.cx() - 3);
        assert_eq!(pin.cy(), inst.cy() + 2);
    }

    #[test]
    fn test_boundary_pin_center_and_fallback() {
        let pin = Pin::for_boundary("in", &[Rect::new(0, 10, 4, 14)], NetId::from_index(1));
        assert_eq!((pin.cx(), pin.cy()), (2, 12));
        assert_eq!((pin.offset_cx(), pin.offset_cy()), (0, 0));
        assert!(pin.is_boundary_terminal());

        let unplaced = Pin::for_boundary("out", &[], NetId::from_index(1));
        assert_eq!((unplaced.cx(), unplaced.cy()), (0, 0));
        assert_eq!(unplaced.boundary_box(), None);
    }

    #[test]
    fn test_flags() {
        let mut flags = PinFlags::empty();
        flags.insert(PinFlags::MIN_X);
        flags.insert(PinFlags::MAX_Y);
        assert!(flags.contains(PinFlags::MIN_X));
        assert!(!flags.contains(PinFlags::MAX_X));
        flags.remove(PinFlags::MIN_X);
        assert!(!flags.contains(PinFlags::MIN_X));
        assert!(flags.contains(PinFlags::MAX_Y));
    }
}
