// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;

use lefdef_placebase::def::def_parser::parse_def;
use lefdef_placebase::lef::lef_parser::parse_lef;
use lefdef_placebase::{
    DesignSource, DiagnosticKind, Diagnostics, LefDefDesign, PlaceBaseConfig, PlaceError,
    PlacementModel, PlacementStatus, Rect, TerminalKey,
};

const CELLS_LEF: &str = r#"
VERSION 5.8 ;
UNITS
  DATABASE MICRONS 1000 ;
END UNITS

SITE core
  CLASS CORE ;
  SIZE 0.2 BY 2.0 ;
END core

MACRO INV
  CLASS CORE ;
  ORIGIN 0 0 ;
  SIZE 0.4 BY 2.0 ;
  SITE core ;
  PIN A
    DIRECTION INPUT ;
    PORT
      LAYER metal1 ;
        RECT 0.05 1.2 0.15 1.6 ;
    END
  END A
  PIN Y
    DIRECTION OUTPUT ;
    PORT
      LAYER metal1 ;
        RECT 0.25 0.5 0.35 1.5 ;
    END
  END Y
  PIN VDD
    DIRECTION INOUT ;
    USE POWER ;
  END VDD
END INV

MACRO BLOCK
  CLASS BLOCK ;
  SIZE 4 BY 8 ;
  PIN P
    DIRECTION INPUT ;
    PORT
      LAYER metal2 ;
        RECT 0 0 0.2 0.2 ;
    END
  END P
END BLOCK

END LIBRARY
"#;

const TOP_DEF: &str = r#"
VERSION 5.8 ;
DIVIDERCHAR "/" ;
BUSBITCHARS "[]" ;
DESIGN top ;
UNITS DISTANCE MICRONS 1000 ;
DIEAREA ( 0 0 ) ( 10000 10000 ) ;

ROW row0 core 0 0 N DO 50 BY 1 STEP 200 0 ;
ROW row1 core 0 2000 FS DO 50 BY 1 STEP 200 0 ;
ROW row2 core 0 4000 N DO 50 BY 1 STEP 200 0 ;
ROW row3 core 0 6000 FS DO 25 BY 1 STEP 200 0 ;

COMPONENTS 4 ;
- u1 INV + PLACED ( 1000 0 ) N ;
- u2 INV + PLACED ( 2000 2000 ) FS ;
- u3 INV + UNPLACED ;
- blk BLOCK + FIXED ( 6000 0 ) N ;
END COMPONENTS

PINS 1 ;
- in + NET n1 + DIRECTION INPUT + USE SIGNAL
  + LAYER metal1 ( -50 0 ) ( 50 100 )
  + PLACED ( 0 5000 ) N ;
END PINS

NETS 3 ;
- n1 ( PIN in ) ( u1 A ) ( u2 A ) ;
- n2 ( u1 Y ) ( u2 Y ) + USE SIGNAL ;
- VDD ( * VDD ) ( u1 VDD ) + USE POWER ;
END NETS

END DESIGN
"#;

fn load_design() -> LefDefDesign {
    let lef = parse_lef(CELLS_LEF).unwrap();
    let def = parse_def(TOP_DEF).unwrap();
    let mut diag = Diagnostics::new();
    LefDefDesign::new(lef, def, &mut diag).unwrap()
}

fn build_model(design: &LefDefDesign) -> (PlacementModel, Diagnostics) {
    let mut diag = Diagnostics::new();
    let model = PlacementModel::build(design, &PlaceBaseConfig::default(), &mut diag).unwrap();
    (model, diag)
}

#[test]
fn test_conversion_to_dbu() {
    let design = load_design();
    assert_eq!(design.dbu_per_micron(), 1000.0);
    assert_eq!(design.die_area(), Rect::new(0, 0, 10000, 10000));

    let rows = design.rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].rect, Rect::new(0, 0, 10000, 2000));
    assert_eq!(rows[3].rect, Rect::new(0, 6000, 5000, 8000));
    assert_eq!((rows[0].site_width, rows[0].site_height), (200, 2000));

    let instances = design.instances();
    assert_eq!(instances.len(), 4);
    assert_eq!(instances[0].rect, Rect::new(1000, 0, 1400, 2000));
    assert_eq!(instances[0].status, PlacementStatus::Placed);
    assert_eq!(instances[2].status, PlacementStatus::Unplaced);
    assert_eq!(instances[3].status, PlacementStatus::Firm);
    assert_eq!(instances[3].rect, Rect::new(6000, 0, 10000, 8000));

    // the wildcard connection is dropped, the explicit one kept
    let vdd = design.nets().iter().find(|n| n.name == "VDD").unwrap();
    assert_eq!(vdd.inst_terms.len(), 1);
}

#[test]
fn test_flipped_instance_shapes() {
    let design = load_design();
    let u1 = &design.instances()[0];
    let u2 = &design.instances()[1];

    assert_eq!(u1.terminal("A").unwrap().shapes, vec![Rect::new(50, 1200, 150, 1600)]);
    // FS mirrors the master about its horizontal center line
    assert_eq!(u2.terminal("A").unwrap().shapes, vec![Rect::new(50, 400, 150, 800)]);
    assert!(u1.terminal("VDD").unwrap().shapes.is_empty());
}

#[test]
fn test_model_from_lefdef() {
    let design = load_design();
    let (mut model, diag) = build_model(&design);

    assert_eq!(model.die().core_rect(), Rect::new(0, 0, 10000, 8000));
    assert_eq!((model.site_size_x(), model.site_size_y()), (200, 2000));
    assert_eq!(model.place_insts().len(), 3);
    assert_eq!(model.fixed_insts().len(), 1);

    // the short top row leaves a gap left of the block
    let fillers: Vec<Rect> = model
        .filler_insts()
        .iter()
        .map(|&id| model.instance(id).unwrap().rect())
        .collect();
    assert_eq!(fillers, vec![Rect::new(5000, 6000, 6000, 8000)]);
    assert_eq!(model.non_place_insts_area(), 4000 * 8000 + 1000 * 2000);

    let u1_a = model.pin_for(&TerminalKey::instance("u1", "A")).unwrap();
    let u1_a = model.pin(u1_a).unwrap();
    assert_eq!((u1_a.cx(), u1_a.cy()), (1100, 1400));

    let u2_a = model.pin_for(&TerminalKey::instance("u2", "A")).unwrap();
    let u2_a = model.pin(u2_a).unwrap();
    assert_eq!((u2_a.offset_cx(), u2_a.offset_cy()), (-100, -400));
    assert_eq!((u2_a.cx(), u2_a.cy()), (2100, 2600));

    let port = model.pin_for(&TerminalKey::boundary("in")).unwrap();
    let port = model.pin(port).unwrap();
    assert_eq!((port.cx(), port.cy()), (0, 5050));

    assert!(model.net_for("VDD").is_none());
    let n1 = model.net_for("n1").unwrap();
    assert_eq!(model.net(n1).unwrap().rect(), Rect::new(-50, 0, 2400, 5100));
    assert_eq!(model.hpwl(), (2450 + 5100) + (1400 + 4000));

    assert_eq!(diag.count(DiagnosticKind::PinWithoutShapes), 0);
    assert_eq!(diag.count(DiagnosticKind::UnknownInstance), 0);
}

#[test]
fn test_write_back_updates_def_components() {
    let mut design = load_design();
    let (mut model, _) = build_model(&design);

    let u3 = model.instance_for("u3").unwrap();
    model.relocate_instance(u3, 400, 2000).unwrap();
    assert_eq!(model.write_back(&mut design), 3);

    let placement = design.def().component("u3").unwrap().placement.clone().unwrap();
    assert_eq!(placement.placement_type, "PLACED");
    assert_eq!((placement.x, placement.y), (400.0, 2000.0));
    assert_eq!(design.raw().instances[2].status, PlacementStatus::Placed);
    assert_eq!(design.raw().instances[2].rect, Rect::new(400, 2000, 800, 4000));

    // fixed components keep their placement
    let blk = design.def().component("blk").unwrap().placement.clone().unwrap();
    assert_eq!(blk.placement_type, "FIXED");
}

#[test]
fn test_unknown_macro_is_fatal() {
    let lef = parse_lef(CELLS_LEF).unwrap();
    let def = parse_def(&TOP_DEF.replace("- u3 INV", "- u3 NAND9")).unwrap();
    let mut diag = Diagnostics::new();
    match LefDefDesign::new(lef, def, &mut diag) {
        Err(PlaceError::UnknownMacro {
            component,
            macro_name,
        }) => {
            assert_eq!(component, "u3");
            assert_eq!(macro_name, "NAND9");
        }
        other => panic!("expected UnknownMacro, got {other:?}"),
    }
}

#[test]
fn test_unknown_site_falls_back_to_step() {
    let lef = parse_lef(CELLS_LEF).unwrap();
    let def = parse_def(&TOP_DEF.replace("ROW row0 core", "ROW row0 wide")).unwrap();
    let mut diag = Diagnostics::new();
    let design = LefDefDesign::new(lef, def, &mut diag).unwrap();

    assert_eq!(diag.subjects(DiagnosticKind::UnknownSite), vec!["row0"]);
    // the first row's step stands in for the site width; the height is
    // undefined, so building fails
    assert_eq!(design.rows()[0].site_width, 200);
    let mut diag = Diagnostics::new();
    assert!(matches!(
        PlacementModel::build(&design, &PlaceBaseConfig::default(), &mut diag),
        Err(PlaceError::InvalidSiteSize { .. })
    ));
}

#[test]
fn test_from_files() {
    let dir = std::env::temp_dir();
    let lef_path = dir.join("lefdef_placebase_from_files.lef");
    let def_path = dir.join("lefdef_placebase_from_files.def");
    fs::write(&lef_path, CELLS_LEF).unwrap();
    fs::write(&def_path, TOP_DEF).unwrap();

    let mut diag = Diagnostics::new();
    let design = LefDefDesign::from_files(&[&lef_path], &def_path, &mut diag).unwrap();
    assert_eq!(design.def().design, "top");
    assert_eq!(design.lef().macros.len(), 2);

    let missing = dir.join("lefdef_placebase_missing.def");
    assert!(matches!(
        LefDefDesign::from_files(&[&lef_path], &missing, &mut diag),
        Err(PlaceError::Io(_))
    ));

    fs::remove_file(lef_path).unwrap();
    fs::remove_file(def_path).unwrap();
}
