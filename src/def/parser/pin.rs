// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! PINS item parser.
//!
//! ```text
//! - clk + NET clk + DIRECTION INPUT + USE CLOCK
//!   + LAYER metal2 ( -70 0 ) ( 70 140 )
//!   + PLACED ( 5000 0 ) N ;
//! ```
//! Shapes stay relative to the pin location; `PORT` groups are flattened.

use super::common::{attribute_groups, coordinate_pairs, item_name, parse_placement};
use super::{DefItemParser, ParseResult};
use crate::def::{DefPin, DefPlacement, DefRect};

#[derive(Debug, Clone, Default)]
pub struct PinContext {
    pub name: String,
    pub net: String,
    pub use_type: String,
    pub direction: String,
    pub placement: Option<DefPlacement>,
    pub rects: Vec<DefRect>,
}

pub struct DefPinParser;

impl DefItemParser for DefPinParser {
    type Item = DefPin;
    type Context = PinContext;

    fn parse_header(&self, tokens: &[&str]) -> Option<Self::Context> {
        Some(PinContext {
            name: item_name(tokens)?.to_string(),
            ..Default::default()
        })
    }

    fn parse_attributes(&self, context: &mut Self::Context, tokens: &[&str]) -> Result<(), String> {
        for group in attribute_groups(tokens).skip(1) {
            match group {
                ["NET", net, ..] => context.net = net.to_string(),
                ["DIRECTION", dir, ..] => context.direction = dir.to_string(),
                ["USE", use_type, ..] => context.use_type = use_type.to_string(),
                ["LAYER", layer, rest @ ..] => {
                    // optional MASK/SPACING/DESIGNRULEWIDTH before the points
                    let points = coordinate_pairs(rest);
                    let [(x0, y0), (x1, y1)] = points[..] else {
                        return Err(format!("pin {} has a malformed LAYER shape", context.name));
                    };
                    context.rects.push(DefRect {
                        layer: layer.to_string(),
                        xl: x0.min(x1),
                        yl: y0.min(y1),
                        xh: x0.max(x1),
                        yh: y0.max(y1),
                    });
                }
                [kind, ..] if matches!(*kind, "PLACED" | "FIXED" | "COVER") => {
                    let placement = parse_placement(group)
                        .ok_or_else(|| format!("bad placement for pin {}", context.name))?;
                    context.placement = Some(placement);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item> {
        Ok(DefPin {
            name: context.name,
            net: context.net,
            use_type: context.use_type,
            direction: context.direction,
            placement: context.placement,
            rects: context.rects,
        })
    }

    fn item_name() -> &'static str {
        "PIN"
    }
}
