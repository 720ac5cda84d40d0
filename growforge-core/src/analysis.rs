//! Grouped statistics over a loaded `Dataset`.
//!
//! Every per-school result is produced in configured school order, never
//! sorted by name or value, so tables and charts line up across runs.

use crate::dataset::Dataset;
use growforge_schemas::{
    environment::{EnvironmentMetric, EnvironmentRecord},
    growth::{GrowthMetric, GrowthRecord},
    school::School,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentSummary {
    pub school: School,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub ec_measured: Option<f64>,
    pub ec_target: f64,
    pub rows: usize,
}

impl EnvironmentSummary {
    pub fn metric(&self, metric: EnvironmentMetric) -> Option<f64> {
        match metric {
            EnvironmentMetric::Temperature => self.temperature,
            EnvironmentMetric::Humidity => self.humidity,
            EnvironmentMetric::Ph => self.ph,
            EnvironmentMetric::Ec => self.ec_measured,
        }
    }
}

/// Means over the environment rows of all schools together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentOverall {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub ec_measured: Option<f64>,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub school: School,
    pub ec_target: f64,
    pub fresh_weight_g: Option<f64>,
    pub leaf_count: Option<f64>,
    pub shoot_length_mm: Option<f64>,
    pub count: usize,
}

impl GrowthSummary {
    pub fn metric(&self, metric: GrowthMetric) -> Option<f64> {
        match metric {
            GrowthMetric::FreshWeight => self.fresh_weight_g,
            GrowthMetric::LeafCount => self.leaf_count,
            GrowthMetric::ShootLength => self.shoot_length_mm,
        }
    }
}

/// One line of the experiment overview: every configured school, whether
/// or not it has data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub school: School,
    pub ec_target: f64,
    pub specimens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestSchool {
    pub school: School,
    pub value: f64,
}

/// Arithmetic mean of the present, non-NaN values.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn environment_mean<'a, I>(records: I, metric: EnvironmentMetric) -> Option<f64>
where
    I: IntoIterator<Item = &'a EnvironmentRecord>,
{
    mean(records.into_iter().map(|r| metric.value(r)))
}

fn growth_mean(records: &[GrowthRecord], metric: GrowthMetric) -> Option<f64> {
    mean(records.iter().map(|r| metric.value(r)))
}

pub fn environment_summary(dataset: &Dataset) -> Vec<EnvironmentSummary> {
    dataset
        .environment()
        .iter()
        .map(|(&school, records)| EnvironmentSummary {
            school,
            temperature: environment_mean(records, EnvironmentMetric::Temperature),
            humidity: environment_mean(records, EnvironmentMetric::Humidity),
            ph: environment_mean(records, EnvironmentMetric::Ph),
            ec_measured: environment_mean(records, EnvironmentMetric::Ec),
            ec_target: school.ec_target(),
            rows: records.len(),
        })
        .collect()
}

pub fn environment_overall(dataset: &Dataset) -> EnvironmentOverall {
    EnvironmentOverall {
        temperature: environment_mean(dataset.combined_environment(), EnvironmentMetric::Temperature),
        humidity: environment_mean(dataset.combined_environment(), EnvironmentMetric::Humidity),
        ph: environment_mean(dataset.combined_environment(), EnvironmentMetric::Ph),
        ec_measured: environment_mean(dataset.combined_environment(), EnvironmentMetric::Ec),
        rows: dataset.combined_environment().count(),
    }
}

pub fn growth_summary(dataset: &Dataset) -> Vec<GrowthSummary> {
    dataset
        .growth()
        .iter()
        .map(|(&school, records)| GrowthSummary {
            school,
            ec_target: school.ec_target(),
            fresh_weight_g: growth_mean(records, GrowthMetric::FreshWeight),
            leaf_count: growth_mean(records, GrowthMetric::LeafCount),
            shoot_length_mm: growth_mean(records, GrowthMetric::ShootLength),
            count: records.len(),
        })
        .collect()
}

pub fn experiment_overview(dataset: &Dataset) -> Vec<OverviewRow> {
    School::ALL
        .into_iter()
        .map(|school| OverviewRow {
            school,
            ec_target: school.ec_target(),
            specimens: dataset.growth_for(school).map_or(0, |rows| rows.len()),
        })
        .collect()
}

/// The school with the largest value. Schools without a value are skipped
/// and ties keep the earliest school in iteration order.
pub fn argmax<I>(values: I) -> Option<BestSchool>
where
    I: IntoIterator<Item = (School, Option<f64>)>,
{
    values
        .into_iter()
        .filter_map(|(school, value)| value.filter(|v| !v.is_nan()).map(|value| BestSchool { school, value }))
        .fold(None, |best: Option<BestSchool>, candidate| match best {
            Some(b) if b.value >= candidate.value => Some(b),
            _ => Some(candidate),
        })
}

pub fn best_growth_school(summaries: &[GrowthSummary], metric: GrowthMetric) -> Option<BestSchool> {
    argmax(summaries.iter().map(|s| (s.school, s.metric(metric))))
}
