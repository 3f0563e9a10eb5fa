// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! COMPONENTS item parser: `- name macro [+ PLACED|FIXED|COVER ( x y ) orient]`

use super::common::{attribute_groups, item_name, parse_placement};
use super::{DefItemParser, ParseResult};
use crate::def::{DefComponent, DefPlacement};

#[derive(Debug, Clone)]
pub struct ComponentContext {
    pub name: String,
    pub macro_name: String,
    pub placement: Option<DefPlacement>,
}

pub struct DefComponentParser;

impl DefItemParser for DefComponentParser {
    type Item = DefComponent;
    type Context = ComponentContext;

    fn parse_header(&self, tokens: &[&str]) -> Option<Self::Context> {
        let name = item_name(tokens)?;
        Some(ComponentContext {
            name: name.to_string(),
            macro_name: tokens.get(2).map(|s| s.to_string()).unwrap_or_default(),
            placement: None,
        })
    }

    fn parse_attributes(&self, context: &mut Self::Context, tokens: &[&str]) -> Result<(), String> {
        if context.macro_name.is_empty() || context.macro_name == "+" {
            return Err(format!("component {} has no master", context.name));
        }

        for group in attribute_groups(tokens).skip(1) {
            match group.first().copied() {
                Some("PLACED" | "FIXED" | "COVER" | "UNPLACED") => {
                    let placement = parse_placement(group)
                        .ok_or_else(|| format!("bad placement for {}", context.name))?;
                    context.placement = Some(placement);
                }
                // SOURCE, WEIGHT, HALO, REGION, PROPERTY, ...
                _ => {}
            }
        }
        Ok(())
    }

    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item> {
        Ok(DefComponent {
            name: context.name,
            macro_name: context.macro_name,
            placement: context.placement,
        })
    }

    fn item_name() -> &'static str {
        "COMPONENT"
    }
}
