// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! LEF/DEF Placement Base Library
//!
//! This library builds the placement base of a global placer: die and core
//! extraction, fragmented-row fillers, instance classification and area
//! accounting, pin and net bookkeeping, and HPWL. Designs come from any
//! [`DesignSource`]; LEF/DEF files are supported out of the box.

pub mod config;
pub mod coverage;
pub mod def;
pub mod diag;
pub mod die;
pub mod error;
pub mod export;
pub mod geom;
pub mod ids;
pub mod instance;
pub mod lef;
pub mod lefdef;
pub mod model;
pub mod net;
pub mod pin;
pub mod source;

// Re-export commonly used types
pub use config::PlaceBaseConfig;
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use die::Die;
pub use error::{PlaceError, PlaceResult};
pub use geom::Rect;
pub use ids::{InstId, NetId, PinId};
pub use instance::{Instance, InstanceKind, PlacementStatus};
pub use lefdef::{LefDefDesign, Orientation};
pub use model::{AreaReport, ModelState, PlacementModel, TerminalKey};
pub use net::{Net, SignalType};
pub use pin::{Pin, PinFlags, Terminal};
pub use source::{DesignSource, PlacementSink, RawDesign};
