// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Section parsing framework for DEF files
//!
//! A section is a header statement (`COMPONENTS 12`), a run of `- name ...`
//! item statements and a closing `END COMPONENTS`. Each item kind supplies a
//! [`DefItemParser`]; [`SectionParser`] drives it over preprocessed lines.

pub mod common;
pub mod component;
pub mod net;
pub mod pin;

use std::fmt;

use log::{debug, trace, warn};

use super::preprocessor::LogicalLine;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Error types that can occur during parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Section or block not closed before end of input
    UnexpectedEof(String),
    /// Malformed statement with its source location
    Syntax { location: String, message: String },
}

impl ParseError {
    pub fn syntax(line: &LogicalLine, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            location: line.location(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof(what) => write!(f, "Unexpected end of file in {what}"),
            ParseError::Syntax { location, message } => write!(f, "{location}: {message}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Generic trait for parsing specific item types in DEF files
pub trait DefItemParser {
    /// The type of item this parser produces
    type Item;
    /// The context type used during parsing
    type Context;

    /// Parse the `- NAME ...` head of an item statement
    fn parse_header(&self, tokens: &[&str]) -> Option<Self::Context>;

    /// Parse the `+ KEYWORD ...` attributes and other trailing tokens
    fn parse_attributes(&self, context: &mut Self::Context, tokens: &[&str]) -> Result<(), String>;

    /// Finalize the item from the accumulated context
    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item>;

    /// Get the name of this item type for debugging
    fn item_name() -> &'static str;
}

pub struct SectionParser<P: DefItemParser> {
    parser: P,
    strict: bool,
}

impl<P: DefItemParser> SectionParser<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            strict: false,
        }
    }

    /// Fail on malformed items instead of skipping them
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse items from `start_index` up to the `END <section>` statement.
    /// Returns the items and the index just past the `END` line.
    pub fn parse_section(
        &self,
        lines: &[LogicalLine],
        start_index: usize,
        section: &str,
    ) -> ParseResult<(Vec<P::Item>, usize)> {
        let mut items = Vec::new();
        let mut i = start_index;

        debug!("Parsing {} section at {}", section, lines.get(i).map_or(String::new(), |l| l.location()));

        while i < lines.len() {
            let line = &lines[i];
            let tokens = line.tokens();
            i += 1;

            if common::is_section_end(&tokens, section) {
                debug!("Completed {} section: {} items", section, items.len());
                return Ok((items, i));
            }

            let Some(mut context) = self.parser.parse_header(&tokens) else {
                trace!("Skipping non-item line: {line}");
                continue;
            };
            trace!("Parsing {} #{}: {}", P::item_name(), items.len() + 1, line.text);

            if let Err(message) = self.parser.parse_attributes(&mut context, &tokens) {
                if self.strict {
                    return Err(ParseError::syntax(line, message));
                }
                warn!("{}: skipping {}: {}", line.location(), P::item_name(), message);
                continue;
            }
            items.push(self.parser.finalize(context)?);
        }

        Err(ParseError::UnexpectedEof(format!("{section} section")))
    }
}
