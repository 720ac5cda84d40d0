//! The four participating schools and their experimental conditions.
//!
//! The table is compiled in. Its order is the order used for every
//! per-school table, chart and export.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static configuration attached to a school.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolInfo {
    pub name: &'static str,
    /// Target electrical conductivity of the nutrient solution.
    pub ec_target: f64,
    /// Display color as `#RRGGBB`.
    pub color: &'static str,
}

const SCHOOL_INFO: [SchoolInfo; 4] = [
    SchoolInfo { name: "송도고", ec_target: 1.0, color: "#AB63FA" },
    SchoolInfo { name: "하늘고", ec_target: 2.0, color: "#00CC96" },
    SchoolInfo { name: "아라고", ec_target: 4.0, color: "#636EFA" },
    SchoolInfo { name: "동산고", ec_target: 8.0, color: "#EF553B" },
];

/// A participating school. Variant order is the configured iteration order,
/// so `Ord` and ordered maps keyed by `School` follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum School {
    #[serde(rename = "송도고")]
    Songdo,
    #[serde(rename = "하늘고")]
    Haneul,
    #[serde(rename = "아라고")]
    Ara,
    #[serde(rename = "동산고")]
    Dongsan,
}

impl School {
    pub const ALL: [School; 4] = [School::Songdo, School::Haneul, School::Ara, School::Dongsan];

    pub fn info(self) -> &'static SchoolInfo {
        &SCHOOL_INFO[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn ec_target(self) -> f64 {
        self.info().ec_target
    }

    pub fn color(self) -> &'static str {
        self.info().color
    }

    /// Returns the first school, in configured order, whose name occurs
    /// anywhere in `text`. The caller is responsible for normalizing `text`.
    pub fn find_in(text: &str) -> Option<School> {
        School::ALL.into_iter().find(|s| text.contains(s.name()))
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for School {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        School::ALL
            .into_iter()
            .find(|school| school.name() == trimmed)
            .ok_or_else(|| format!("unknown school '{}'", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_order_and_targets() {
        let targets: Vec<f64> = School::ALL.iter().map(|s| s.ec_target()).collect();
        assert_eq!(targets, vec![1.0, 2.0, 4.0, 8.0]);
        assert!(School::Songdo < School::Dongsan);
    }

    #[test]
    fn finds_school_inside_sheet_name() {
        assert_eq!(School::find_in("2024_아라고 결과"), Some(School::Ara));
        assert_eq!(School::find_in("Sheet1"), None);
    }

    #[test]
    fn parses_exact_name() {
        assert_eq!("하늘고".parse::<School>(), Ok(School::Haneul));
        assert!("전체".parse::<School>().is_err());
    }
}
