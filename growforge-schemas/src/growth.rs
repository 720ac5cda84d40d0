use crate::file_formats::columns;
use crate::school::School;
use serde::{Deserialize, Serialize};

/// One measured plant from a school's sheet in the growth workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub specimen_id: Option<String>,
    pub fresh_weight_g: Option<f64>,
    pub leaf_count: Option<f64>,
    pub shoot_length_mm: Option<f64>,
    pub school: School,
    /// Copied from the school configuration when the row is loaded.
    pub ec_target: f64,
    /// Non-empty cells of sheet columns other than the four known ones,
    /// keyed by header, in sheet column order.
    #[serde(default)]
    pub extra: Vec<(String, CellValue)>,
}

/// A workbook cell value carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthMetric {
    FreshWeight,
    LeafCount,
    ShootLength,
}

impl GrowthMetric {
    pub const ALL: [GrowthMetric; 3] = [
        GrowthMetric::FreshWeight,
        GrowthMetric::LeafCount,
        GrowthMetric::ShootLength,
    ];

    pub fn value(self, record: &GrowthRecord) -> Option<f64> {
        match self {
            GrowthMetric::FreshWeight => record.fresh_weight_g,
            GrowthMetric::LeafCount => record.leaf_count,
            GrowthMetric::ShootLength => record.shoot_length_mm,
        }
    }

    /// Header of the workbook column holding this metric.
    pub fn column(self) -> &'static str {
        match self {
            GrowthMetric::FreshWeight => columns::FRESH_WEIGHT,
            GrowthMetric::LeafCount => columns::LEAF_COUNT,
            GrowthMetric::ShootLength => columns::SHOOT_LENGTH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GrowthMetric::FreshWeight => "Fresh weight (g)",
            GrowthMetric::LeafCount => "Leaf count",
            GrowthMetric::ShootLength => "Shoot length (mm)",
        }
    }
}
