// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! LEF parser tests
//!
//! Tests cover:
//! - Basic MACRO parsing
//! - Multi-line POLYGON and MASK support
//! - Pins with several ports
//! - Skipped technology blocks
//! - Reading and merging several files

use std::fs;

use lefdef_placebase::def::parser::ParseError;
use lefdef_placebase::lef::lef_parser::parse_lef;
use lefdef_placebase::lef::reader::LefReader;

const TECH_LEF: &str = r#"
VERSION 5.8 ;
BUSBITCHARS "[]" ;
DIVIDERCHAR "/" ;

UNITS
   DATABASE MICRONS 2000 ;
END UNITS

PROPERTYDEFINITIONS
   LAYER LEF58_TYPE STRING ;
END PROPERTYDEFINITIONS

LAYER M1
   TYPE ROUTING ;
   DIRECTION HORIZONTAL ;
   PITCH 0.2 ;
   WIDTH 0.07 ;
   SPACING 0.13 ;
END M1

VIA via12 DEFAULT
   LAYER M1 ;
      RECT -0.035 -0.035 0.035 0.035 ;
END via12

SITE CoreSite
   CLASS CORE ;
   SYMMETRY Y ;
   SIZE 0.2 BY 1.2 ;
END CoreSite

END LIBRARY
"#;

const CELL_LEF: &str = r#"
VERSION 5.8 ;

MACRO INVERTER
   CLASS CORE ;
   ORIGIN 0 0 ;
   FOREIGN INVERTER 0 0 ;
   SIZE 1.0 BY 1.2 ;
   SYMMETRY X Y ;
   SITE CoreSite ;

   PIN A
      DIRECTION INPUT ;
      USE SIGNAL ;
      PORT
         LAYER M1 ;
         RECT 0.1 0.4 0.3 0.6 ;
      END
   END A

   PIN Y
      DIRECTION OUTPUT ;
      USE SIGNAL ;
      SHAPE ABUTMENT ;
      PORT
         LAYER M1 ;
         POLYGON MASK 2 0.7 0.1 0.9 0.1
            0.9 1.1 0.7 1.1 ;
      END
      PORT
         LAYER M2 ;
         RECT 0.75 0.5 0.85 0.7 ;
      END
   END Y

   PIN VDD
      DIRECTION INOUT ;
      USE POWER ;
      PORT
         LAYER M1 ;
         RECT 0 1.15 1.0 1.25 ;
      END
   END VDD

   OBS
      LAYER M1 ;
         RECT 0.4 0.2 0.6 1.0 ;
   END
   OBS
      LAYER M2 ;
         RECT 0.4 0.2 0.6 0.4 ;
   END
END INVERTER

MACRO RAM
   CLASS BLOCK ;
   ORIGIN 0.5 1 ;
   SIZE 40 BY 30 ;
   PIN CLK
      DIRECTION INPUT ;
      USE CLOCK ;
      PORT
         LAYER M2 ;
         RECT -0.5 -1 0.5 0 ;
      END
   END CLK
END RAM

END LIBRARY
"#;

#[test]
fn test_technology_file() {
    let lef = parse_lef(TECH_LEF).unwrap();
    assert_eq!(lef.dbu, Some(2000.0));
    assert!(lef.macros.is_empty());
    assert_eq!(lef.sites.len(), 1);

    let site = lef.site("CoreSite").unwrap();
    assert_eq!(site.class, "CORE");
    assert_eq!((site.size_x, site.size_y), (0.2, 1.2));
}

#[test]
fn test_basic_macro_parsing() {
    let lef = parse_lef(CELL_LEF).unwrap();
    assert_eq!(lef.dbu, None);
    assert_eq!(lef.macros.len(), 2);

    let inv = lef.macro_by_name("INVERTER").unwrap();
    assert_eq!(inv.class, "CORE");
    assert_eq!(inv.site_name, "CoreSite");
    assert_eq!((inv.size_x, inv.size_y), (1.0, 1.2));
    assert_eq!((inv.origin_x, inv.origin_y), (0.0, 0.0));
    assert_eq!(inv.pins.len(), 3);

    let a = inv.pin("A").unwrap();
    assert_eq!(a.direction, "INPUT");
    assert_eq!(a.use_type, "SIGNAL");
    let shapes = a.shapes();
    assert_eq!(shapes.len(), 1);
    assert_eq!(
        (shapes[0].xl, shapes[0].yl, shapes[0].xh, shapes[0].yh),
        (0.1, 0.4, 0.3, 0.6)
    );

    let vdd = inv.pin("VDD").unwrap();
    assert_eq!(vdd.use_type, "POWER");
}

#[test]
fn test_polygon_and_multiple_ports() {
    let lef = parse_lef(CELL_LEF).unwrap();
    let y = lef.macro_by_name("INVERTER").unwrap().pin("Y").unwrap();

    assert_eq!(y.shape, "ABUTMENT");
    assert_eq!(y.ports.len(), 2);
    assert_eq!(y.ports[0].polygons.len(), 1);
    assert_eq!(
        y.ports[0].polygons[0].points,
        vec![(0.7, 0.1), (0.9, 0.1), (0.9, 1.1), (0.7, 1.1)]
    );
    assert_eq!(y.ports[1].rects[0].layer, "M2");

    // polygon bounding box first, then the second port's rectangle
    let shapes = y.shapes();
    assert_eq!(shapes.len(), 2);
    assert_eq!(
        (shapes[0].xl, shapes[0].yl, shapes[0].xh, shapes[0].yh),
        (0.7, 0.1, 0.9, 1.1)
    );
    assert_eq!(shapes[1].layer, "M2");
}

#[test]
fn test_obstructions_are_merged() {
    let lef = parse_lef(CELL_LEF).unwrap();
    let inv = lef.macro_by_name("INVERTER").unwrap();
    let obs = inv.obstruction.as_ref().unwrap();
    assert_eq!(obs.rects.len(), 2);
    assert_eq!(obs.rects[1].layer, "M2");
}

#[test]
fn test_block_with_origin() {
    let lef = parse_lef(CELL_LEF).unwrap();
    let ram = lef.macro_by_name("RAM").unwrap();
    assert_eq!(ram.class, "BLOCK");
    assert_eq!((ram.origin_x, ram.origin_y), (0.5, 1.0));
    assert_eq!((ram.size_x, ram.size_y), (40.0, 30.0));
    assert_eq!(ram.pin("CLK").unwrap().use_type, "CLOCK");
    assert!(ram.obstruction.is_none());
}

#[test]
fn test_malformed_macro() {
    let err = parse_lef("MACRO BROKEN\n   CLASS CORE ;\n").unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEof("BROKEN".to_string()));

    let err = parse_lef("MACRO BAD\n   SIZE 1 BY ;\nEND BAD\n").unwrap_err();
    assert!(err.to_string().contains("Line 2"));

    let err = parse_lef("MACRO BAD\n   PIN A\n   PORT\n   RECT 0 0 1 ;\n   END\n   END A\nEND BAD\n")
        .unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn test_read_and_merge_files() {
    let dir = std::env::temp_dir();
    let tech = dir.join("lefdef_placebase_tech.lef");
    let cells = dir.join("lefdef_placebase_cells.lef");
    fs::write(&tech, TECH_LEF).unwrap();
    fs::write(&cells, CELL_LEF).unwrap();

    let reader = LefReader::new();
    let lef = reader.read_all(&[&tech, &cells]).unwrap();
    assert_eq!(lef.dbu, Some(2000.0));
    assert_eq!(lef.sites.len(), 1);
    assert_eq!(lef.macros.len(), 2);
    assert!(lef.macro_by_name("RAM").is_some());

    assert!(reader.read(dir.join("lefdef_placebase_missing.lef")).is_err());

    fs::remove_file(tech).unwrap();
    fs::remove_file(cells).unwrap();
}
