//! Transport modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0:?} (expected road, rail or flight)")]
pub struct InvalidMode(pub String);

/// A transport mode a candidate route uses.
///
/// # Examples
///
/// ```
/// use route_server::domain::Mode;
///
/// assert_eq!("Rail".parse::<Mode>().unwrap(), Mode::Rail);
/// assert_eq!(Mode::Flight.as_str(), "flight");
/// assert!("boat".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Road,
    Rail,
    Flight,
}

impl Mode {
    /// Every mode, in the order candidates are gathered.
    pub const ALL: [Mode; 3] = [Mode::Road, Mode::Rail, Mode::Flight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Road => "road",
            Mode::Rail => "rail",
            Mode::Flight => "flight",
        }
    }

    /// Display label, e.g. for table headings.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Road => "Road",
            Mode::Rail => "Rail",
            Mode::Flight => "Flight",
        }
    }

    /// The vehicle boarded at a hub, used in step instructions.
    pub fn vehicle(&self) -> &'static str {
        match self {
            Mode::Road => "car",
            Mode::Rail => "train",
            Mode::Flight => "flight",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" | "car" | "drive" => Ok(Mode::Road),
            "rail" | "train" => Ok(Mode::Rail),
            "flight" | "air" | "plane" => Ok(Mode::Flight),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}

/// Parse a comma-separated mode list such as `"road,rail"`.
///
/// Duplicates are dropped and the result follows [`Mode::ALL`] order, so the
/// candidate gathering order never depends on how the user typed the list.
/// Empty entries are ignored.
pub fn parse_mode_list(s: &str) -> Result<Vec<Mode>, InvalidMode> {
    let mut selected = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        selected.push(part.parse::<Mode>()?);
    }
    Ok(normalize_modes(selected))
}

/// Deduplicate and order a mode selection.
pub fn normalize_modes(modes: impl IntoIterator<Item = Mode>) -> Vec<Mode> {
    let mut modes: Vec<Mode> = modes.into_iter().collect();
    modes.sort();
    modes.dedup();
    modes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ROAD".parse::<Mode>().unwrap(), Mode::Road);
        assert_eq!(" flight ".parse::<Mode>().unwrap(), Mode::Flight);
        assert_eq!("train".parse::<Mode>().unwrap(), Mode::Rail);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "ferry".parse::<Mode>().unwrap_err();
        assert!(err.to_string().contains("ferry"));
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Rail).unwrap(), "\"rail\"");
        let mode: Mode = serde_json::from_str("\"flight\"").unwrap();
        assert_eq!(mode, Mode::Flight);
    }

    #[test]
    fn mode_list_is_ordered_and_deduplicated() {
        let modes = parse_mode_list("flight, road,flight,,rail").unwrap();
        assert_eq!(modes, vec![Mode::Road, Mode::Rail, Mode::Flight]);
    }

    #[test]
    fn empty_mode_list() {
        assert!(parse_mode_list("").unwrap().is_empty());
    }

    #[test]
    fn mode_list_propagates_errors() {
        assert!(parse_mode_list("road,bus").is_err());
    }
}
