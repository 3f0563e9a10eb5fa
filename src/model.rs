// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Placement base model.
//!
//! Construction runs once, in order: die/core extraction, instance
//! ingestion, fragmented-row fillers, classification and area accounting,
//! nets and pins, utilization check. The model owns every instance, pin and
//! net; all cross references are arena indices.

use std::collections::HashMap;

use log::{debug, info};
use serde::Serialize;

use crate::config::PlaceBaseConfig;
use crate::coverage::fragmented_row_fillers;
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::die::Die;
use crate::error::{PlaceError, PlaceResult};
use crate::geom::Rect;
use crate::ids::{InstId, NetId, PinId};
use crate::instance::{Instance, InstanceKind};
use crate::net::Net;
use crate::pin::{instance_pin_offset, Pin, PinFlags};
use crate::source::{DesignSource, PlacementSink, RawRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelState {
    #[default]
    Uninitialized,
    Built,
}

/// Source identity of a pin
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TerminalKey {
    Instance { instance: String, terminal: String },
    Boundary(String),
}

impl TerminalKey {
    pub fn instance(instance: &str, terminal: &str) -> Self {
        TerminalKey::Instance {
            instance: instance.to_string(),
            terminal: terminal.to_string(),
        }
    }

    pub fn boundary(name: &str) -> Self {
        TerminalKey::Boundary(name.to_string())
    }
}

/// Area statistics of a built model, areas in DBU²
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaReport {
    pub core_area: i64,
    /// Clipped fixed area plus filler area
    pub non_place_area: i64,
    pub place_area: i64,
    pub std_area: i64,
    pub macro_area: i64,
    /// Percent of the free core area taken by movable instances
    pub utilization: f64,
}

/// Movable area over free core area, in percent
pub fn utilization_percent(place_area: i64, core_area: i64, non_place_area: i64) -> f64 {
    let free = core_area - non_place_area;
    if free <= 0 {
        if place_area == 0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        place_area as f64 / free as f64 * 100.0
    }
}

#[derive(Debug, Default)]
pub struct PlacementModel {
    state: ModelState,
    config: PlaceBaseConfig,
    die: Die,
    site_x: i32,
    site_y: i32,

    insts: Vec<Instance>,
    pins: Vec<Pin>,
    nets: Vec<Net>,

    inst_map: HashMap<String, InstId>,
    pin_map: HashMap<TerminalKey, PinId>,
    net_map: HashMap<String, NetId>,

    place_insts: Vec<InstId>,
    fixed_insts: Vec<InstId>,
    filler_insts: Vec<InstId>,
    non_place_insts: Vec<InstId>,

    place_area: i64,
    non_place_area: i64,
    macro_area: i64,
    std_area: i64,
}

impl PlacementModel {
    /// Uninitialized model
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from `source` in one shot
    pub fn build(
        source: &dyn DesignSource,
        config: &PlaceBaseConfig,
        diag: &mut Diagnostics,
    ) -> PlaceResult<Self> {
        let mut model = Self::new();
        model.build_from(source, config, diag)?;
        Ok(model)
    }

    /// Build into an uninitialized model. On error the model stays
    /// uninitialized.
    pub fn build_from(
        &mut self,
        source: &dyn DesignSource,
        config: &PlaceBaseConfig,
        diag: &mut Diagnostics,
    ) -> PlaceResult<()> {
        if self.state == ModelState::Built {
            return Err(PlaceError::AlreadyBuilt);
        }
        config.validate()?;

        let mut staged = Self {
            config: config.clone(),
            ..Self::default()
        };
        staged.init_die(source, diag)?;
        staged.init_instances(source);
        staged.init_fillers(source.rows());
        staged.classify_instances(diag);
        staged.init_nets(source, diag);
        staged.state = ModelState::Built;

        let report = staged.area_report();
        staged.log_info(&report);
        if report.utilization >= staged.config.max_utilization {
            return Err(PlaceError::OverUtilized {
                utilization: report.utilization,
                limit: staged.config.max_utilization,
            });
        }

        *self = staged;
        Ok(())
    }

    /// Release all storage and return to the uninitialized state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn init_die(&mut self, source: &dyn DesignSource, diag: &mut Diagnostics) -> PlaceResult<()> {
        let rows = source.rows();
        self.die = Die::from_rows(source.die_area(), rows.iter().map(|r| &r.rect))?;

        // first row's site is authoritative
        let first = &rows[0];
        if first.site_width <= 0 || first.site_height <= 0 {
            return Err(PlaceError::InvalidSiteSize {
                width: first.site_width,
                height: first.site_height,
            });
        }
        self.site_x = first.site_width;
        self.site_y = first.site_height;

        if !self.die.core_inside_die() {
            let core = self.die.core_rect();
            diag.warn(
                DiagnosticKind::CoreOutsideDie,
                "core",
                format!(
                    "core ({}, {}) - ({}, {}) exceeds the die area",
                    core.lx, core.ly, core.ux, core.uy
                ),
            );
        }

        let core = self.die.core_rect();
        info!("SiteSize: ({}, {})", self.site_x, self.site_y);
        info!("CoreAreaLxLy: ({}, {})", core.lx, core.ly);
        info!("CoreAreaUxUy: ({}, {})", core.ux, core.uy);
        Ok(())
    }

    fn init_instances(&mut self, source: &dyn DesignSource) {
        self.insts.reserve(source.instances().len());
        for raw in source.instances() {
            let id = InstId::from_index(self.insts.len());
            self.insts
                .push(Instance::real(&raw.name, raw.rect, raw.status));
            if self.inst_map.insert(raw.name.clone(), id).is_some() {
                log::warn!("Duplicate instance name {}, keeping the last one", raw.name);
            }
        }
    }

    fn init_fillers(&mut self, rows: &[RawRow]) {
        let fillers = fragmented_row_fillers(
            self.die.core_rect(),
            self.site_x,
            self.site_y,
            rows.iter().map(|r| r.rect),
            self.insts
                .iter()
                .filter(|i| i.kind() == InstanceKind::Fixed)
                .map(|i| i.rect()),
        );
        debug!("Fragmented rows: {} filler instances", fillers.len());
        self.insts.extend(fillers.into_iter().map(Instance::filler));
    }

    fn classify_instances(&mut self, diag: &mut Diagnostics) {
        let core = self.die.core_rect();
        let macro_height = self.site_y as i64 * self.config.macro_height_factor as i64;

        for (idx, inst) in self.insts.iter().enumerate() {
            let id = InstId::from_index(idx);
            match inst.kind() {
                InstanceKind::Movable => {
                    let area = inst.area();
                    self.place_insts.push(id);
                    self.place_area += area;
                    if inst.dy() as i64 > macro_height {
                        self.macro_area += area;
                    } else {
                        self.std_area += area;
                    }
                }
                InstanceKind::Fixed => match core.intersection(&inst.rect()) {
                    Some(clipped) => {
                        self.fixed_insts.push(id);
                        self.non_place_insts.push(id);
                        self.non_place_area += clipped.area();
                    }
                    None => diag.info(
                        DiagnosticKind::FixedOutsideCore,
                        inst.name().unwrap_or_default(),
                        "fixed instance outside of the core area, ignored",
                    ),
                },
                InstanceKind::Filler => {
                    self.filler_insts.push(id);
                    self.non_place_insts.push(id);
                    self.non_place_area += inst.area();
                }
            }
        }
    }

    fn init_nets(&mut self, source: &dyn DesignSource, diag: &mut Diagnostics) {
        for raw in source.nets() {
            // escape VDD/VSS/reset nets
            if self.config.skips(raw.signal) {
                debug!("Skipping {:?} net {}", raw.signal, raw.name);
                continue;
            }

            let net_id = NetId::from_index(self.nets.len());
            self.nets.push(Net::new(&raw.name, raw.signal));
            self.net_map.insert(raw.name.clone(), net_id);

            for term in &raw.inst_terms {
                let Some(inst_id) = self.inst_map.get(&term.instance).copied() else {
                    diag.warn(
                        DiagnosticKind::UnknownInstance,
                        &term.instance,
                        format!("net {} refers to an unknown instance", raw.name),
                    );
                    continue;
                };
                let raw_inst = &source.instances()[inst_id.index()];
                let shapes = raw_inst
                    .terminal(&term.terminal)
                    .map_or(&[][..], |t| t.shapes.as_slice());
                let offset =
                    match instance_pin_offset(shapes, raw_inst.master_width, raw_inst.master_height)
                    {
                        Some(offset) => offset,
                        None => {
                            diag.info(
                                DiagnosticKind::PinWithoutShapes,
                                &format!("{}/{}", term.instance, term.terminal),
                                "pin shape not found, using the instance center",
                            );
                            (0, 0)
                        }
                    };

                let pin = Pin::for_instance(
                    inst_id,
                    &term.terminal,
                    &self.insts[inst_id.index()].rect(),
                    raw_inst.master_width,
                    raw_inst.master_height,
                    offset,
                    net_id,
                );
                let pin_id =
                    self.push_pin(pin, TerminalKey::instance(&term.instance, &term.terminal));
                self.insts[inst_id.index()].add_pin(pin_id);
                self.nets[net_id.index()].add_pin(pin_id);
            }

            for bterm in &raw.boundary_terms {
                let pin = Pin::for_boundary(&bterm.name, &bterm.shapes, net_id);
                if pin.boundary_box().is_none() {
                    diag.warn(
                        DiagnosticKind::BoundaryPinUnplaced,
                        &bterm.name,
                        "toplevel port is not placed, regarded as placed at (0, 0)",
                    );
                }
                let pin_id = self.push_pin(pin, TerminalKey::boundary(&bterm.name));
                self.nets[net_id.index()].add_pin(pin_id);
            }
        }

        for net in &mut self.nets {
            net.update_box(&self.insts, &self.pins);
        }
    }

    fn push_pin(&mut self, pin: Pin, key: TerminalKey) -> PinId {
        let id = PinId::from_index(self.pins.len());
        self.pins.push(pin);
        self.pin_map.insert(key, id);
        id
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn is_built(&self) -> bool {
        self.state == ModelState::Built
    }

    pub fn config(&self) -> &PlaceBaseConfig {
        &self.config
    }

    pub fn die(&self) -> &Die {
        &self.die
    }

    pub fn site_size_x(&self) -> i32 {
        self.site_x
    }

    pub fn site_size_y(&self) -> i32 {
        self.site_y
    }

    pub fn insts(&self) -> &[Instance] {
        &self.insts
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn instance(&self, id: InstId) -> Option<&Instance> {
        self.insts.get(id.index())
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(id.index())
    }

    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.index())
    }

    /// Optimizer bookkeeping flags of a pin
    pub fn pin_flags_mut(&mut self, id: PinId) -> Option<&mut PinFlags> {
        self.pins.get_mut(id.index()).map(Pin::flags_mut)
    }

    /// Real instances the placer moves
    pub fn place_insts(&self) -> &[InstId] {
        &self.place_insts
    }

    /// Real fixed instances overlapping the core
    pub fn fixed_insts(&self) -> &[InstId] {
        &self.fixed_insts
    }

    pub fn filler_insts(&self) -> &[InstId] {
        &self.filler_insts
    }

    /// Fixed instances followed by fillers
    pub fn non_place_insts(&self) -> &[InstId] {
        &self.non_place_insts
    }

    pub fn instance_for(&self, name: &str) -> Option<InstId> {
        self.inst_map.get(name).copied()
    }

    pub fn pin_for(&self, key: &TerminalKey) -> Option<PinId> {
        self.pin_map.get(key).copied()
    }

    pub fn net_for(&self, name: &str) -> Option<NetId> {
        self.net_map.get(name).copied()
    }

    pub fn place_insts_area(&self) -> i64 {
        self.place_area
    }

    pub fn non_place_insts_area(&self) -> i64 {
        self.non_place_area
    }

    pub fn macro_insts_area(&self) -> i64 {
        self.macro_area
    }

    pub fn std_insts_area(&self) -> i64 {
        self.std_area
    }

    pub fn area_report(&self) -> AreaReport {
        let core_area = self.die.core_area();
        AreaReport {
            core_area,
            non_place_area: self.non_place_area,
            place_area: self.place_area,
            std_area: self.std_area,
            macro_area: self.macro_area,
            utilization: utilization_percent(self.place_area, core_area, self.non_place_area),
        }
    }

    /// Record the optimizer's dense index for an instance
    pub fn set_ext_id(&mut self, id: InstId, ext_id: i32) -> PlaceResult<()> {
        self.insts
            .get_mut(id.index())
            .ok_or(PlaceError::UnknownInstance(id))?
            .set_ext_id(ext_id);
        Ok(())
    }

    /// Move a movable instance's lower-left corner to `(x, y)`.
    /// Every pin of the instance is refreshed before returning; net boxes
    /// are not.
    pub fn relocate_instance(&mut self, id: InstId, x: i32, y: i32) -> PlaceResult<()> {
        self.movable_mut(id)?.set_location(x, y);
        self.refresh_pins(id);
        Ok(())
    }

    /// Center a movable instance on `(x, y)`, refreshing its pins
    pub fn relocate_instance_center(&mut self, id: InstId, x: i32, y: i32) -> PlaceResult<()> {
        self.movable_mut(id)?.set_center_location(x, y);
        self.refresh_pins(id);
        Ok(())
    }

    fn movable_mut(&mut self, id: InstId) -> PlaceResult<&mut Instance> {
        let inst = self
            .insts
            .get_mut(id.index())
            .ok_or(PlaceError::UnknownInstance(id))?;
        if !inst.is_movable() {
            return Err(PlaceError::ImmovableInstance(id));
        }
        Ok(inst)
    }

    fn refresh_pins(&mut self, id: InstId) {
        let inst = &self.insts[id.index()];
        for pin in inst.pins() {
            self.pins[pin.index()].update_location(inst);
        }
    }

    /// Recompute one net's box, returning it
    pub fn update_net_box(&mut self, id: NetId) -> Option<Rect> {
        let net = self.nets.get_mut(id.index())?;
        net.update_box(&self.insts, &self.pins);
        Some(net.rect())
    }

    pub fn update_net_boxes(&mut self) {
        for net in &mut self.nets {
            net.update_box(&self.insts, &self.pins);
        }
    }

    /// Total HPWL after refreshing every net box
    pub fn hpwl(&mut self) -> i64 {
        self.update_net_boxes();
        self.nets.iter().map(Net::hpwl).sum()
    }

    /// Net with the most pins
    pub fn max_fanout(&self) -> Option<(NetId, usize)> {
        self.nets
            .iter()
            .enumerate()
            .map(|(idx, net)| (NetId::from_index(idx), net.pins().len()))
            .max_by_key(|&(id, fanout)| (fanout, std::cmp::Reverse(id)))
    }

    /// Report every movable instance's lower-left to `sink`
    pub fn write_back(&self, sink: &mut dyn PlacementSink) -> usize {
        let mut count = 0;
        for id in &self.place_insts {
            let inst = &self.insts[id.index()];
            if let Some(name) = inst.name() {
                sink.apply_location(name, inst.lx(), inst.ly());
                count += 1;
            }
        }
        count
    }

    fn log_info(&self, report: &AreaReport) {
        info!("NumInstances: {}", self.insts.len());
        info!("NumPlaceInstances: {}", self.place_insts.len());
        info!("NumFixedInstances: {}", self.fixed_insts.len());
        info!("NumFillerInstances: {}", self.filler_insts.len());
        info!("NumNets: {}", self.nets.len());
        info!("NumPins: {}", self.pins.len());

        if let Some((id, fanout)) = self.max_fanout() {
            let total: usize = self.nets.iter().map(|n| n.pins().len()).sum();
            debug!(
                "MaxFanout: {} ({}), AvgFanout: {:.2}",
                fanout,
                self.nets[id.index()].name(),
                total as f64 / self.nets.len() as f64
            );
        }

        let die = self.die.die_rect();
        let core = self.die.core_rect();
        info!("DieAreaLxLy: ({}, {})", die.lx, die.ly);
        info!("DieAreaUxUy: ({}, {})", die.ux, die.uy);
        info!("CoreAreaLxLy: ({}, {})", core.lx, core.ly);
        info!("CoreAreaUxUy: ({}, {})", core.ux, core.uy);
        info!("CoreArea: {}", report.core_area);
        info!("NonPlaceInstsArea: {}", report.non_place_area);
        info!("PlaceInstsArea: {}", report.place_area);
        info!("Util(%): {:.2}", report.utilization);
        info!("StdInstsArea: {}", report.std_area);
        info!("MacroInstsArea: {}", report.macro_area);
    }
}
