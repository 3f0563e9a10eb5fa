// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::error::Error;

use clap::Parser;
use lefdef_placebase::export::export_instances_to_csv;
use lefdef_placebase::{Diagnostics, LefDefDesign, PlaceBaseConfig, PlacementModel};

/// Build the placement base of a LEF/DEF design and report its statistics
#[derive(Parser, Debug)]
#[command(version)]
struct ProgramOptions {
    /// LEF input files, technology first
    #[arg(short, long, required = true, num_args = 1..)]
    lef: Vec<String>,
    /// DEF input file
    #[arg(short, long)]
    def: String,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,
    /// Utilization limit in percent, overrides the configuration
    #[arg(long)]
    max_util: Option<f64>,
    /// Write the instance table to this CSV file
    #[arg(long)]
    csv: Option<String>,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    let level = if options.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    _main(&options)
}

fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let mut config = match &options.config {
        Some(path) => PlaceBaseConfig::load(path)?,
        None => PlaceBaseConfig::default(),
    };
    if let Some(limit) = options.max_util {
        config = config.with_max_utilization(limit);
    }

    let mut diag = Diagnostics::new();
    let design = LefDefDesign::from_files(&options.lef, &options.def, &mut diag)?;
    let mut model = PlacementModel::build(&design, &config, &mut diag)?;

    let report = model.area_report();
    println!("Instances:   {}", model.insts().len());
    println!("  movable:   {}", model.place_insts().len());
    println!("  fixed:     {}", model.fixed_insts().len());
    println!("  fillers:   {}", model.filler_insts().len());
    println!("Nets:        {}", model.nets().len());
    println!("Pins:        {}", model.pins().len());
    println!("Core area:   {}", report.core_area);
    println!("Util(%):     {:.2}", report.utilization);
    println!("HPWL:        {}", model.hpwl());
    if !diag.is_empty() {
        println!("Warnings:    {}", diag.warnings().count());
    }

    if let Some(path) = &options.csv {
        export_instances_to_csv(&model, path)?;
        if options.verbose {
            println!("wrote {path:?}");
        }
    }

    Ok(())
}
