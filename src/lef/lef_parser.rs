// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use log::{debug, info, trace};
use nom::{
    bytes::complete::tag,
    character::complete::{i32 as int32, multispace0, multispace1},
    combinator::opt,
    multi::many1,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

use super::{Lef, LefMacro, LefObstruction, LefPin, LefPolygon, LefPort, LefRect, LefSite};
use crate::def::parser::{ParseError, ParseResult};
use crate::def::preprocessor::{preprocess_lef, LogicalLine};

/// Top-level blocks skipped until `END <name>`
const SKIPPED_BLOCKS: &[&str] = &["LAYER", "VIA", "VIARULE", "NONDEFAULTRULE"];

fn mask(input: &str) -> IResult<&str, i32> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("MASK")(input)?;
    let (input, _) = multispace1(input)?;
    int32(input)
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    preceded(multispace1, double).parse(input)
}

/// `RECT [MASK n] xl yl xh yh`
fn parse_rect(input: &str) -> IResult<&str, (f64, f64, f64, f64)> {
    let (input, _) = tag("RECT")(input)?;
    let (input, _) = opt(mask).parse(input)?;
    let (input, x0) = coordinate(input)?;
    let (input, y0) = coordinate(input)?;
    let (input, x1) = coordinate(input)?;
    let (input, y1) = coordinate(input)?;
    Ok((input, (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))))
}

/// `POLYGON [MASK n] x1 y1 x2 y2 ...`
fn parse_polygon(input: &str) -> IResult<&str, Vec<(f64, f64)>> {
    let (input, _) = tag("POLYGON")(input)?;
    let (input, _) = opt(mask).parse(input)?;
    many1((coordinate, coordinate)).parse(input)
}

/// `SIZE w BY h`
fn parse_size(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = tag("SIZE")(input)?;
    let (input, w) = coordinate(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("BY")(input)?;
    let (input, h) = coordinate(input)?;
    Ok((input, (w, h)))
}

/// `ORIGIN x y`
fn parse_origin(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = tag("ORIGIN")(input)?;
    let (input, x) = coordinate(input)?;
    let (input, y) = coordinate(input)?;
    Ok((input, (x, y)))
}

/// `DATABASE MICRONS n`
fn parse_database(input: &str) -> IResult<&str, f64> {
    let (input, _) = tag("DATABASE")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("MICRONS")(input)?;
    let (input, _) = multispace0(input)?;
    double(input)
}

fn run<'a, O>(
    parser: impl Fn(&'a str) -> IResult<&'a str, O>,
    line: &'a LogicalLine,
) -> ParseResult<O> {
    parser(&line.text)
        .map(|(_, out)| out)
        .map_err(|e| ParseError::syntax(line, format!("malformed {}: {e}", line.keyword())))
}

/// Walks the logical lines of one LEF file
struct LefParser<'a> {
    lines: &'a [LogicalLine],
    pos: usize,
}

impl<'a> LefParser<'a> {
    fn new(lines: &'a [LogicalLine]) -> Self {
        Self { lines, pos: 0 }
    }

    fn next_line(&mut self, block: &str) -> ParseResult<&'a LogicalLine> {
        let lines = self.lines;
        let line = lines
            .get(self.pos)
            .ok_or_else(|| ParseError::UnexpectedEof(block.to_string()))?;
        self.pos += 1;
        Ok(line)
    }

    fn parse(mut self) -> ParseResult<Lef> {
        let mut lef = Lef::default();
        let lines = self.lines;

        while let Some(line) = lines.get(self.pos) {
            self.pos += 1;
            match line.tokens().as_slice() {
                ["UNITS"] => lef.dbu = self.parse_units()?.or(lef.dbu),
                ["SITE", name] => lef.sites.push(self.parse_site(name)?),
                ["MACRO", name] => {
                    let macro_def = self.parse_macro(name)?;
                    debug!(
                        "Found macro: {} (size: {:.3}x{:.3}, pins: {})",
                        macro_def.name,
                        macro_def.size_x,
                        macro_def.size_y,
                        macro_def.pins.len()
                    );
                    lef.macros.push(macro_def);
                }
                ["END", "LIBRARY"] => break,
                [kind, name, ..] if SKIPPED_BLOCKS.contains(kind) => {
                    trace!("Skipping {kind} {name}");
                    self.skip_block(name)?;
                }
                [kind] if matches!(*kind, "SPACING" | "PROPERTYDEFINITIONS") => {
                    self.skip_block(kind)?;
                }
                _ => trace!("Ignoring statement {line}"),
            }
        }

        info!(
            "LEF parsed: {} sites, {} macros",
            lef.sites.len(),
            lef.macros.len()
        );
        Ok(lef)
    }

    fn skip_block(&mut self, name: &str) -> ParseResult<()> {
        loop {
            if matches!(self.next_line(name)?.tokens().as_slice(), ["END", n] if *n == name) {
                return Ok(());
            }
        }
    }

    fn parse_units(&mut self) -> ParseResult<Option<f64>> {
        let mut dbu = None;
        loop {
            let line = self.next_line("UNITS")?;
            match line.tokens().as_slice() {
                ["END", "UNITS"] => return Ok(dbu),
                ["DATABASE", ..] => dbu = Some(run(parse_database, line)?),
                _ => {}
            }
        }
    }

    fn parse_site(&mut self, name: &str) -> ParseResult<LefSite> {
        let mut site = LefSite {
            name: name.to_string(),
            ..Default::default()
        };
        loop {
            let line = self.next_line(name)?;
            match line.tokens().as_slice() {
                ["END", n] if *n == name => return Ok(site),
                ["CLASS", class, ..] => site.class = class.to_string(),
                ["SIZE", ..] => (site.size_x, site.size_y) = run(parse_size, line)?,
                _ => {}
            }
        }
    }

    fn parse_macro(&mut self, name: &str) -> ParseResult<LefMacro> {
        let mut macro_def = LefMacro {
            name: name.to_string(),
            ..Default::default()
        };
        loop {
            let line = self.next_line(name)?;
            match line.tokens().as_slice() {
                ["END", n] if *n == name => return Ok(macro_def),
                ["CLASS", class @ ..] => macro_def.class = class.join(" "),
                ["SITE", site, ..] => macro_def.site_name = site.to_string(),
                ["SIZE", ..] => (macro_def.size_x, macro_def.size_y) = run(parse_size, line)?,
                ["ORIGIN", ..] => {
                    (macro_def.origin_x, macro_def.origin_y) = run(parse_origin, line)?
                }
                ["PIN", pin_name] => macro_def.pins.push(self.parse_pin(pin_name)?),
                ["OBS"] => {
                    let obs = self.parse_geometry("OBS")?;
                    match macro_def.obstruction.as_mut() {
                        Some(existing) => merge_port(existing, obs),
                        None => macro_def.obstruction = Some(obs),
                    }
                }
                // FOREIGN, SYMMETRY, SOURCE, PROPERTY, ...
                _ => {}
            }
        }
    }

    fn parse_pin(&mut self, name: &str) -> ParseResult<LefPin> {
        let mut pin = LefPin {
            name: name.to_string(),
            ..Default::default()
        };
        loop {
            let line = self.next_line(name)?;
            match line.tokens().as_slice() {
                ["END", n] if *n == name => return Ok(pin),
                ["DIRECTION", dir, ..] => pin.direction = dir.to_string(),
                ["USE", use_type, ..] => pin.use_type = use_type.to_string(),
                ["SHAPE", shape, ..] => pin.shape = shape.to_string(),
                ["PORT", ..] => pin.ports.push(self.parse_geometry("PORT")?),
                _ => {}
            }
        }
    }

    /// `LAYER` / `RECT` / `POLYGON` statements up to a bare `END`
    fn parse_geometry(&mut self, block: &str) -> ParseResult<LefPort> {
        let mut port = LefPort::default();
        let mut layer = String::new();
        loop {
            let line = self.next_line(block)?;
            match line.tokens().as_slice() {
                ["END"] => return Ok(port),
                ["LAYER", name, ..] => layer = name.to_string(),
                ["RECT", ..] => {
                    let (xl, yl, xh, yh) = run(parse_rect, line)?;
                    port.rects.push(LefRect {
                        layer: layer.clone(),
                        xl,
                        yl,
                        xh,
                        yh,
                    });
                }
                ["POLYGON", ..] => {
                    let points = run(parse_polygon, line)?;
                    port.polygons.push(LefPolygon {
                        layer: layer.clone(),
                        points,
                    });
                }
                // VIA, WIDTH, CLASS, ...
                _ => {}
            }
        }
    }
}

fn merge_port(into: &mut LefObstruction, other: LefObstruction) {
    into.rects.extend(other.rects);
    into.polygons.extend(other.polygons);
}

pub fn parse_lef(input: &str) -> ParseResult<Lef> {
    debug!("Starting LEF parsing...");
    let lines = preprocess_lef(input);
    LefParser::new(&lines).parse()
}
