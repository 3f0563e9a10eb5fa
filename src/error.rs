// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fmt;

use crate::ids::InstId;

/// Result type for model construction and mutation
pub type PlaceResult<T> = Result<T, PlaceError>;

/// Errors that abort model construction or reject a mutation
#[derive(Debug)]
pub enum PlaceError {
    /// The design has no rows, so the core area is undefined
    NoRows,
    /// The first row's site has a non-positive dimension
    InvalidSiteSize { width: i32, height: i32 },
    /// Movable area does not fit into the free core area
    OverUtilized { utilization: f64, limit: f64 },
    /// `build_from` called on a model that is already built
    AlreadyBuilt,
    /// Instance index outside of the model
    UnknownInstance(InstId),
    /// Relocation requested for a fixed or filler instance
    ImmovableInstance(InstId),
    /// A DEF component refers to a macro missing from the LEF library
    UnknownMacro { component: String, macro_name: String },
    Config(String),
    Parse(String),
    Io(std::io::Error),
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceError::NoRows => write!(f, "No rows found: core area is undefined"),
            PlaceError::InvalidSiteSize { width, height } => {
                write!(f, "Invalid site size: {width} x {height}")
            }
            PlaceError::OverUtilized { utilization, limit } => {
                write!(
                    f,
                    "Utilization {utilization:.2}% exceeds {limit:.2}%, please double-check die/row size"
                )
            }
            PlaceError::AlreadyBuilt => write!(f, "Placement model is already built"),
            PlaceError::UnknownInstance(id) => write!(f, "Unknown instance: {id}"),
            PlaceError::ImmovableInstance(id) => write!(f, "Instance {id} is not movable"),
            PlaceError::UnknownMacro {
                component,
                macro_name,
            } => write!(
                f,
                "Component {component} refers to unknown macro {macro_name}"
            ),
            PlaceError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            PlaceError::Parse(msg) => write!(f, "Parse error: {msg}"),
            PlaceError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for PlaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlaceError {
    fn from(err: std::io::Error) -> Self {
        PlaceError::Io(err)
    }
}

impl From<toml::de::Error> for PlaceError {
    fn from(err: toml::de::Error) -> Self {
        PlaceError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert!(PlaceError::NoRows.to_string().contains("No rows"));
        let err = PlaceError::OverUtilized {
            utilization: 100.2,
            limit: 100.1,
        };
        assert!(err.to_string().contains("100.20%"));
        assert!(PlaceError::ImmovableInstance(InstId::from_index(3))
            .to_string()
            .contains("inst#3"));
    }
}
