// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use log::{debug, info, trace};
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{i32 as int32, multispace0, multispace1},
    combinator::opt,
    multi::many1,
    number::complete::double,
    IResult, Parser,
};

use super::parser::component::DefComponentParser;
use super::parser::net::DefNetParser;
use super::parser::pin::DefPinParser;
use super::parser::{ParseError, ParseResult, SectionParser};
use super::preprocessor::{preprocess_def, LogicalLine};
use super::{Def, DefRow};

/// Sections the placement base does not read
const SKIPPED_SECTIONS: &[&str] = &[
    "VIAS",
    "SPECIALNETS",
    "BLOCKAGES",
    "REGIONS",
    "GROUPS",
    "FILLS",
    "NONDEFAULTRULES",
    "STYLES",
    "SCANCHAINS",
    "SLOTS",
    "PINPROPERTIES",
    "PROPERTYDEFINITIONS",
];

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ';')(input)
}

fn point(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("(")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = tag(")")(input)?;
    Ok((input, (x, y)))
}

/// `UNITS DISTANCE MICRONS dbu`
fn parse_units(input: &str) -> IResult<&str, f64> {
    let (input, _) = tag("UNITS")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("DISTANCE")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("MICRONS")(input)?;
    let (input, _) = multispace1(input)?;
    double(input)
}

/// `DIEAREA ( x y ) ( x y ) ...`, two corners or a rectilinear outline
fn parse_die_area(input: &str) -> IResult<&str, Vec<(f64, f64)>> {
    let (input, _) = tag("DIEAREA")(input)?;
    many1(point).parse(input)
}

fn parse_repeat(input: &str) -> IResult<&str, (i32, i32)> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("DO")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, nx) = int32(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("BY")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, ny) = int32(input)?;
    Ok((input, (nx, ny)))
}

fn parse_step(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("STEP")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, sx) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, sy) = double(input)?;
    Ok((input, (sx, sy)))
}

/// `ROW name site x y orient [DO nx BY ny [STEP sx sy]]`
fn parse_row(input: &str) -> IResult<&str, DefRow> {
    let (input, _) = tag("ROW")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = multispace1(input)?;
    let (input, site_name) = identifier(input)?;
    let (input, _) = multispace1(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, orientation) = identifier(input)?;
    let (input, repeat) = opt(parse_repeat).parse(input)?;
    let (input, step) = opt(parse_step).parse(input)?;

    let (num_x, num_y) = repeat.unwrap_or((1, 1));
    let (step_x, step_y) = step.unwrap_or((0.0, 0.0));
    Ok((
        input,
        DefRow {
            name: name.to_string(),
            site_name: site_name.to_string(),
            x,
            y,
            orientation: orientation.to_string(),
            num_x,
            num_y,
            step_x,
            step_y,
        },
    ))
}

fn run<'a, O>(
    parser: impl Fn(&'a str) -> IResult<&'a str, O>,
    line: &'a LogicalLine,
) -> ParseResult<O> {
    parser(&line.text)
        .map(|(_, out)| out)
        .map_err(|e| ParseError::syntax(line, format!("malformed {}: {e}", line.keyword())))
}

fn skip_section(lines: &[LogicalLine], start: usize, section: &str) -> ParseResult<usize> {
    lines[start..]
        .iter()
        .position(|l| l.text == format!("END {section}"))
        .map(|offset| start + offset + 1)
        .ok_or_else(|| ParseError::UnexpectedEof(format!("{section} section")))
}

pub fn parse_def(input: &str) -> ParseResult<Def> {
    debug!("Starting DEF parsing...");
    let lines = preprocess_def(input);
    let mut def = Def::default();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        let tokens = line.tokens();
        i += 1;

        match tokens.as_slice() {
            ["DESIGN", name, ..] => def.design = name.to_string(),
            ["UNITS", ..] => def.dbu = Some(run(parse_units, line)?),
            ["DIEAREA", ..] => def.die_area_points = run(parse_die_area, line)?,
            ["ROW", ..] => def.rows.push(run(parse_row, line)?),
            ["COMPONENTS", ..] => {
                let (items, next) =
                    SectionParser::new(DefComponentParser).parse_section(&lines, i, "COMPONENTS")?;
                def.components = items;
                i = next;
            }
            ["PINS", ..] => {
                let (items, next) =
                    SectionParser::new(DefPinParser).parse_section(&lines, i, "PINS")?;
                def.pins = items;
                i = next;
            }
            ["NETS", ..] => {
                let (items, next) =
                    SectionParser::new(DefNetParser).parse_section(&lines, i, "NETS")?;
                def.nets = items;
                i = next;
            }
            ["END", "DESIGN"] => break,
            [section, ..] if SKIPPED_SECTIONS.contains(section) => {
                debug!("Skipping {section} section");
                i = skip_section(&lines, i, section)?;
            }
            _ => trace!("Ignoring statement {line}"),
        }
    }

    info!(
        "DEF parsed: {} rows, {} components, {} pins, {} nets",
        def.rows.len(),
        def.components.len(),
        def.pins.len(),
        def.nets.len()
    );
    Ok(def)
}
