// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! DEF/LEF Preprocessor
//!
//! Splits raw file content into logical statements:
//! - Removes comments (`#` at line start or after whitespace)
//! - Merges physical lines until `;`, splitting several statements on one line
//! - Ends a statement without `;` on lines opened by a block keyword
//!   (`END`, and for LEF `MACRO`, `PIN`, `PORT`, `OBS`, ...)
//! - Pads parentheses so `(0 0)` tokenizes like `( 0 0 )`
//! - Keeps source line numbers for error reporting

use std::fmt;

/// One logical statement, terminator stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    pub first_line: usize, // 0-indexed
    pub last_line: usize,
}

impl LogicalLine {
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// First token, or "" for an empty statement
    pub fn keyword(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    pub fn location(&self) -> String {
        if self.first_line == self.last_line {
            format!("Line {}", self.first_line + 1)
        } else {
            format!("Lines {}-{}", self.first_line + 1, self.last_line + 1)
        }
    }
}

impl fmt::Display for LogicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.text)
    }
}

/// DEF needs only `END` standalone
pub const DEF_STANDALONE: &[&str] = &["END", "PROPERTYDEFINITIONS"];

/// LEF blocks open and close without semicolons
pub const LEF_STANDALONE: &[&str] = &[
    "END",
    "MACRO",
    "PIN",
    "PORT",
    "OBS",
    "SITE",
    "UNITS",
    "LAYER",
    "VIA",
    "VIARULE",
    "SPACING",
    "NONDEFAULTRULE",
    "PROPERTYDEFINITIONS",
];

pub struct Preprocessor<'a> {
    standalone: &'a [&'a str],
}

impl<'a> Preprocessor<'a> {
    pub fn new(standalone: &'a [&'a str]) -> Self {
        Self { standalone }
    }

    pub fn run(&self, content: &str) -> Vec<LogicalLine> {
        let mut out = Vec::new();
        let mut current = String::new();
        let mut start = 0;

        for (i, raw) in content.lines().enumerate() {
            let line = remove_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            // a block keyword line without `;` stands on its own
            let first = line.split_whitespace().next().unwrap_or("");
            if !line.contains(';') && self.standalone.contains(&first) {
                flush(&mut out, &mut current, start, i.saturating_sub(1));
                out.push(LogicalLine {
                    text: pad_parens(line),
                    first_line: i,
                    last_line: i,
                });
                continue;
            }

            let mut in_quote = false;
            for c in line.chars() {
                if current.trim().is_empty() && !c.is_whitespace() {
                    current.clear();
                    start = i;
                }
                match c {
                    '"' => {
                        in_quote = !in_quote;
                        current.push(c);
                    }
                    ';' if !in_quote => {
                        flush_terminated(&mut out, &mut current, start, i);
                    }
                    '(' | ')' if !in_quote => {
                        current.push(' ');
                        current.push(c);
                        current.push(' ');
                    }
                    _ => current.push(c),
                }
            }
            current.push(' ');
        }

        let end = content.lines().count().saturating_sub(1);
        flush(&mut out, &mut current, start, end);
        out
    }
}

fn flush(out: &mut Vec<LogicalLine>, current: &mut String, start: usize, end: usize) {
    if !current.trim().is_empty() {
        flush_terminated(out, current, start, end.max(start));
    }
    current.clear();
}

fn flush_terminated(out: &mut Vec<LogicalLine>, current: &mut String, start: usize, end: usize) {
    let text = normalize(current);
    // a bare `;` is not a statement
    if !text.is_empty() {
        out.push(LogicalLine {
            text,
            first_line: start,
            last_line: end,
        });
    }
    current.clear();
}

fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn pad_parens(line: &str) -> String {
    normalize(&line.replace('(', " ( ").replace(')', " ) "))
}

fn remove_comment(line: &str) -> &str {
    match find_comment_start(line) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// `#` starts a comment at line start or after a space or tab
fn find_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    (0..bytes.len())
        .find(|&i| bytes[i] == b'#' && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t'))
}

/// Preprocess DEF content
pub fn preprocess_def(content: &str) -> Vec<LogicalLine> {
    Preprocessor::new(DEF_STANDALONE).run(content)
}

/// Preprocess LEF content
pub fn preprocess_lef(content: &str) -> Vec<LogicalLine> {
    Preprocessor::new(LEF_STANDALONE).run(content)
}
