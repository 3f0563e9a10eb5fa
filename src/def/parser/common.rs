// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Common token helpers for parsing DEF/LEF statements

use crate::def::DefPlacement;

/// Name of a `- NAME ...` item statement
pub fn item_name<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    match tokens {
        ["-", name, ..] => Some(*name),
        _ => None,
    }
}

/// `END <section>`
pub fn is_section_end(tokens: &[&str], section: &str) -> bool {
    matches!(tokens, ["END", name] if *name == section)
}

/// Parse coordinate pair from tokens like "(" "100" "200" ")"
pub fn parse_coordinate_pair(parts: &[&str], start_index: usize) -> Option<(f64, f64)> {
    match parts.get(start_index..start_index + 4)? {
        ["(", x, y, ")"] => Some((x.parse().ok()?, y.parse().ok()?)),
        _ => None,
    }
}

/// Every `( x y )` group in order
pub fn coordinate_pairs(parts: &[&str]) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let mut i = 0;
    while i < parts.len() {
        if let Some(point) = parse_coordinate_pair(parts, i) {
            points.push(point);
            i += 4;
        } else {
            i += 1;
        }
    }
    points
}

/// Split an item statement into its `+ KEYWORD ...` attribute groups.
/// The first group is the item head.
pub fn attribute_groups<'a, 'b>(tokens: &'b [&'a str]) -> impl Iterator<Item = &'b [&'a str]> {
    tokens.split(|t| *t == "+")
}

/// Extract value after a keyword (e.g., "DIRECTION INPUT" -> Some("INPUT"))
pub fn keyword_value<'a>(tokens: &[&'a str], keyword: &str) -> Option<&'a str> {
    tokens
        .iter()
        .position(|t| *t == keyword)
        .and_then(|i| tokens.get(i + 1).copied())
}

/// `PLACED|FIXED|COVER ( x y ) orient` or `UNPLACED` at the start of `group`
pub fn parse_placement(group: &[&str]) -> Option<DefPlacement> {
    let (&kind, rest) = group.split_first()?;
    match kind {
        "UNPLACED" => Some(DefPlacement {
            placement_type: kind.to_string(),
            x: 0.0,
            y: 0.0,
            orientation: "N".to_string(),
        }),
        "PLACED" | "FIXED" | "COVER" => {
            let (x, y) = parse_coordinate_pair(rest, 0)?;
            Some(DefPlacement {
                placement_type: kind.to_string(),
                x,
                y,
                orientation: rest.get(4).copied().unwrap_or("N").to_string(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_name() {
        assert_eq!(item_name(&["-", "OUTBUS<1>", "+", "NET"]), Some("OUTBUS<1>"));
        assert_eq!(item_name(&["-INVALID"]), None);
        assert_eq!(item_name(&["+", "DIRECTION", "INPUT"]), None);
    }

    #[test]
    fn test_parse_coordinate_pair() {
        let parts = vec!["PLACED", "(", "100", "200", ")", "N"];
        assert_eq!(parse_coordinate_pair(&parts, 1), Some((100.0, 200.0)));
        assert_eq!(parse_coordinate_pair(&parts, 0), None);
        assert_eq!(parse_coordinate_pair(&parts, 4), None);
    }

    #[test]
    fn test_coordinate_pairs() {
        let parts = vec!["(", "0", "0", ")", "(", "10", "-5", ")", "junk"];
        assert_eq!(coordinate_pairs(&parts), vec![(0.0, 0.0), (10.0, -5.0)]);
    }

    #[test]
    fn test_keyword_value() {
        let tokens = vec!["+", "DIRECTION", "INPUT", "+", "USE", "SIGNAL"];
        assert_eq!(keyword_value(&tokens, "DIRECTION"), Some("INPUT"));
        assert_eq!(keyword_value(&tokens, "USE"), Some("SIGNAL"));
        assert_eq!(keyword_value(&tokens, "NET"), None);
    }

    #[test]
    fn test_attribute_groups() {
        let tokens = vec!["-", "u1", "INV", "+", "PLACED", "(", "1", "2", ")", "N"];
        let groups: Vec<_> = attribute_groups(&tokens).collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], &["-", "u1", "INV"]);
        assert_eq!(groups[1][0], "PLACED");
    }

    #[test]
    fn test_parse_placement() {
        let placement = parse_placement(&["FIXED", "(", "100", "200", ")", "FS"]).unwrap();
        assert_eq!(placement.placement_type, "FIXED");
        assert_eq!((placement.x, placement.y), (100.0, 200.0));
        assert_eq!(placement.orientation, "FS");

        let unplaced = parse_placement(&["UNPLACED"]).unwrap();
        assert_eq!(unplaced.placement_type, "UNPLACED");
        assert!(parse_placement(&["PLACED", "(", "1", ")"]).is_none());
    }
}
