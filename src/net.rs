// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

use crate::geom::{BoundBox, Rect};
use crate::ids::PinId;
use crate::instance::Instance;
use crate::pin::{Pin, Terminal};

/// Net signal type, as in the DEF `USE` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    #[default]
    Signal,
    Power,
    Ground,
    Clock,
    Analog,
    Reset,
    Tieoff,
    Scan,
}

impl SignalType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SIGNAL" => Some(SignalType::Signal),
            "POWER" => Some(SignalType::Power),
            "GROUND" => Some(SignalType::Ground),
            "CLOCK" => Some(SignalType::Clock),
            "ANALOG" => Some(SignalType::Analog),
            "RESET" => Some(SignalType::Reset),
            "TIEOFF" => Some(SignalType::Tieoff),
            "SCAN" => Some(SignalType::Scan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Net {
    name: String,
    signal: SignalType,
    rect: Rect,
    pins: Vec<PinId>,
}

impl Net {
    pub(crate) fn new(name: &str, signal: SignalType) -> Self {
        Self {
            name: name.to_string(),
            signal,
            rect: Rect::default(),
            pins: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signal_type(&self) -> SignalType {
        self.signal
    }

    /// Pins in ingestion order
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    pub(crate) fn add_pin(&mut self, pin: PinId) {
        self.pins.push(pin);
    }

    /// Bounding box as of the last `update_box`
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

    /// Half-perimeter wirelength of the current box
    pub fn hpwl(&self) -> i64 {
        self.rect.half_perimeter()
    }

    /// Recompute the box from the owning instances' rectangles and the
    /// boundary pins' shapes. A net with no geometry gets an empty box.
    pub fn update_box(&mut self, insts: &[Instance], pins: &[Pin]) {
        let mut bbox = BoundBox::new();
        for pin in &self.pins {
            match pins[pin.index()].terminal() {
                Terminal::Instance { inst, .. } => bbox.add(&insts[inst.index()].rect()),
                Terminal::Boundary {
                    shape_box: Some(shape),
                    ..
                } => bbox.add(shape),
                Terminal::Boundary { shape_box: None, .. } => {}
            }
        }
        self.rect = bbox.get().unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{InstId, NetId};
    use crate::instance::PlacementStatus;

    #[test]
    fn test_signal_keywords() {
        assert_eq!(SignalType::from_keyword("GROUND"), Some(SignalType::Ground));
        assert_eq!(SignalType::from_keyword("clock"), Some(SignalType::Clock));
        assert_eq!(SignalType::from_keyword("WIRE"), None);
    }

    #[test]
    fn test_update_box_uses_instance_rects_and_boundary_shapes() {
        let insts = vec![
            Instance::real("a", Rect::new(0, 0, 10, 10), PlacementStatus::Placed),
            Instance::real("b", Rect::new(40, 20, 50, 30), PlacementStatus::Placed),
        ];
        let net_id = NetId::from_index(0);
        let pins = vec![
            Pin::for_instance(InstId::from_index(0), "Y", &insts[0].rect(), 10, 10, (0, 0), net_id),
            Pin::for_instance(InstId::from_index(1), "A", &insts[1].rect(), 10, 10, (0, 0), net_id),
            Pin::for_boundary("out", &[Rect::new(60, -5, 62, -3)], net_id),
        ];
        let mut net = Net::new("n1", SignalType::Signal);
        for i in 0..pins.len() {
            net.add_pin(PinId::from_index(i));
        }

        net.update_box(&insts, &pins);
        assert_eq!(net.rect(), Rect::new(0, -5, 62, 30));
        assert_eq!(net.hpwl(), 62 + 35);

        let first = net.rect();
        net.update_box(&insts, &pins);
        assert_eq!(net.rect(), first);
    }

    #[test]
    fn test_empty_net_has_zero_hpwl() {
        let mut net = Net::new("floating", SignalType::Signal);
        net.update_box(&[], &[]);
        assert_eq!(net.hpwl(), 0);
    }
}
