use crate::loader::TextEncoding;
use crate::resolver::MatchPolicy;
use growforge_schemas::{environment::EnvironmentRecord, growth::GrowthRecord, school::School};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A per-school problem that leaves that school out of the environment
/// tables without stopping the load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadWarning {
    EnvironmentFileMissing { school: School, logical_name: String },
    EnvironmentFileUnreadable { school: School, path: PathBuf, reason: String },
}

impl LoadWarning {
    pub fn school(&self) -> School {
        match self {
            LoadWarning::EnvironmentFileMissing { school, .. }
            | LoadWarning::EnvironmentFileUnreadable { school, .. } => *school,
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::EnvironmentFileMissing { school, logical_name } => {
                write!(f, "{}: environment file '{}' not found", school, logical_name)
            }
            LoadWarning::EnvironmentFileUnreadable { school, path, reason } => {
                write!(f, "{}: failed to load '{}': {}", school, path.display(), reason)
            }
        }
    }
}

/// A file that was read into the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    /// `None` for the growth workbook, which covers every school.
    pub school: Option<School>,
    pub path: PathBuf,
    /// Text encoding, for CSV sources.
    pub encoding: Option<TextEncoding>,
}

/// Everything noteworthy about a load that is not itself data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub data_dir: PathBuf,
    /// Policy the file names were resolved with.
    pub match_policy: MatchPolicy,
    /// Files in the data directory that were considered for matching.
    pub candidate_count: usize,
    pub warnings: Vec<LoadWarning>,
    /// Workbook sheets that were not assigned to any school.
    pub unmatched_sheets: Vec<String>,
    /// Set when the workbook exists but could not be read; growth views are
    /// unavailable in that case.
    pub growth_error: Option<String>,
    pub sources: Vec<SourceFile>,
}

impl Diagnostics {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            match_policy: MatchPolicy::default(),
            candidate_count: 0,
            warnings: Vec::new(),
            unmatched_sheets: Vec::new(),
            growth_error: None,
            sources: Vec::new(),
        }
    }

    pub fn warnings_for(&self, school: School) -> impl Iterator<Item = &LoadWarning> {
        self.warnings.iter().filter(move |w| w.school() == school)
    }
}

/// The loaded experiment. Maps are keyed by `School`, so iteration follows
/// the configured school order and absent schools simply have no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    environment: BTreeMap<School, Vec<EnvironmentRecord>>,
    growth: BTreeMap<School, Vec<GrowthRecord>>,
    diagnostics: Diagnostics,
}

impl Dataset {
    pub fn new(
        environment: BTreeMap<School, Vec<EnvironmentRecord>>,
        growth: BTreeMap<School, Vec<GrowthRecord>>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self { environment, growth, diagnostics }
    }

    pub fn environment(&self) -> &BTreeMap<School, Vec<EnvironmentRecord>> {
        &self.environment
    }

    pub fn growth(&self) -> &BTreeMap<School, Vec<GrowthRecord>> {
        &self.growth
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn environment_for(&self, school: School) -> Option<&[EnvironmentRecord]> {
        self.environment.get(&school).map(Vec::as_slice)
    }

    pub fn growth_for(&self, school: School) -> Option<&[GrowthRecord]> {
        self.growth.get(&school).map(Vec::as_slice)
    }

    /// All environment rows, school by school in configured order.
    pub fn combined_environment(&self) -> impl Iterator<Item = &EnvironmentRecord> {
        self.environment.values().flatten()
    }

    /// All growth rows, school by school in configured order.
    pub fn combined_growth(&self) -> impl Iterator<Item = &GrowthRecord> {
        self.growth.values().flatten()
    }

    pub fn has_growth(&self) -> bool {
        self.diagnostics.growth_error.is_none()
    }
}
