// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::io::Write;

use csv::Writer;
use serde::Serialize;

use crate::error::{PlaceError, PlaceResult};
use crate::instance::Instance;
use crate::model::PlacementModel;
use crate::net::Net;

#[derive(Debug, Serialize)]
pub struct InstanceCsvRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Kind")]
    pub kind: &'static str,
    #[serde(rename = "Lx")]
    pub lx: i32,
    #[serde(rename = "Ly")]
    pub ly: i32,
    #[serde(rename = "Ux")]
    pub ux: i32,
    #[serde(rename = "Uy")]
    pub uy: i32,
    #[serde(rename = "Area")]
    pub area: i64,
    #[serde(rename = "Pins")]
    pub pins: usize,
}

#[derive(Debug, Serialize)]
pub struct NetCsvRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub signal: String,
    #[serde(rename = "Pins")]
    pub pins: usize,
    #[serde(rename = "Hpwl")]
    pub hpwl: i64,
}

/// Fillers have no name; they are listed by arena index
fn instance_to_csv_record(index: usize, inst: &Instance) -> InstanceCsvRecord {
    InstanceCsvRecord {
        name: inst
            .name()
            .map_or_else(|| format!("filler#{index}"), str::to_string),
        kind: inst.kind().as_str(),
        lx: inst.lx(),
        ly: inst.ly(),
        ux: inst.ux(),
        uy: inst.uy(),
        area: inst.area(),
        pins: inst.pins().len(),
    }
}

fn net_to_csv_record(net: &Net) -> NetCsvRecord {
    NetCsvRecord {
        name: net.name().to_string(),
        signal: format!("{:?}", net.signal_type()).to_uppercase(),
        pins: net.pins().len(),
        hpwl: net.hpwl(),
    }
}

fn csv_error(e: csv::Error) -> PlaceError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => PlaceError::Io(io),
        other => PlaceError::Parse(format!("CSV: {other:?}")),
    }
}

/// Write every instance, real and filler, as CSV
pub fn write_instances_csv<W: Write>(model: &PlacementModel, out: W) -> PlaceResult<()> {
    let mut writer = Writer::from_writer(out);
    for (index, inst) in model.insts().iter().enumerate() {
        writer
            .serialize(instance_to_csv_record(index, inst))
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every net with its current HPWL as CSV
pub fn write_nets_csv<W: Write>(model: &PlacementModel, out: W) -> PlaceResult<()> {
    let mut writer = Writer::from_writer(out);
    for net in model.nets() {
        writer.serialize(net_to_csv_record(net)).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the instance table to a CSV file
pub fn export_instances_to_csv(model: &PlacementModel, file_path: &str) -> PlaceResult<()> {
    let file = std::fs::File::create(file_path)?;
    write_instances_csv(model, file)
}
