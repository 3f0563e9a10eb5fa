// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! NETS item parser: `- name ( inst pin ) ( PIN port ) ... [+ USE type] ;`
//!
//! Only the connection list before the first `+` is read; routing points
//! in `+ ROUTED` groups also use parentheses and are ignored.

use super::common::{attribute_groups, item_name};
use super::{DefItemParser, ParseResult};
use crate::def::{DefConnection, DefNet};

#[derive(Debug, Clone, Default)]
pub struct NetContext {
    pub name: String,
    pub use_type: String,
    pub connections: Vec<DefConnection>,
}

pub struct DefNetParser;

impl DefNetParser {
    fn parse_connections(head: &[&str]) -> Result<Vec<DefConnection>, String> {
        let mut connections = Vec::new();
        let mut i = 2; // past "- name"
        while i < head.len() {
            match head.get(i..i + 4) {
                Some(["(", "PIN", port, ")"]) => {
                    connections.push(DefConnection::Boundary(port.to_string()));
                }
                Some(["(", inst, pin, ")"]) => connections.push(DefConnection::Instance {
                    instance: inst.to_string(),
                    pin: pin.to_string(),
                }),
                _ => return Err(format!("unexpected token '{}' in connections", head[i])),
            }
            i += 4;
        }
        Ok(connections)
    }
}

impl DefItemParser for DefNetParser {
    type Item = DefNet;
    type Context = NetContext;

    fn parse_header(&self, tokens: &[&str]) -> Option<Self::Context> {
        Some(NetContext {
            name: item_name(tokens)?.to_string(),
            ..Default::default()
        })
    }

    fn parse_attributes(&self, context: &mut Self::Context, tokens: &[&str]) -> Result<(), String> {
        let mut groups = attribute_groups(tokens);
        if let Some(head) = groups.next() {
            context.connections = Self::parse_connections(head)
                .map_err(|e| format!("net {}: {e}", context.name))?;
        }
        for group in groups {
            if let ["USE", use_type, ..] = group {
                context.use_type = use_type.to_string();
            }
        }
        Ok(())
    }

    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item> {
        Ok(DefNet {
            name: context.name,
            use_type: context.use_type,
            connections: context.connections,
        })
    }

    fn item_name() -> &'static str {
        "NET"
    }
}
