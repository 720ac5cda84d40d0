use crate::school::School;
use serde::{Deserialize, Serialize};

/// One sensor reading from a school's environment log.
///
/// Numeric cells may be blank in the source file; those are `None` and are
/// left out of averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    /// Raw text of the `time` column.
    pub time: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    /// Measured electrical conductivity.
    pub ec: Option<f64>,
    pub school: School,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMetric {
    Temperature,
    Humidity,
    Ph,
    Ec,
}

impl EnvironmentMetric {
    pub const ALL: [EnvironmentMetric; 4] = [
        EnvironmentMetric::Temperature,
        EnvironmentMetric::Humidity,
        EnvironmentMetric::Ph,
        EnvironmentMetric::Ec,
    ];

    pub fn value(self, record: &EnvironmentRecord) -> Option<f64> {
        match self {
            EnvironmentMetric::Temperature => record.temperature,
            EnvironmentMetric::Humidity => record.humidity,
            EnvironmentMetric::Ph => record.ph,
            EnvironmentMetric::Ec => record.ec,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnvironmentMetric::Temperature => "Temperature (°C)",
            EnvironmentMetric::Humidity => "Humidity (%)",
            EnvironmentMetric::Ph => "pH",
            EnvironmentMetric::Ec => "Measured EC",
        }
    }
}
