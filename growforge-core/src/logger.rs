use crate::{dataset::Diagnostics, dataset::LoadWarning, error::GrowforgeError};
use csv::Writer;
use growforge_schemas::school::School;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct DiagnosticEntry {
    kind: &'static str,
    school: Option<School>,
    path: Option<String>,
    detail: String,
}

/// Writes the diagnostics of a load as CSV, one line per finding.
pub struct DiagnosticsLogger {
    path: PathBuf,
    writer: Writer<fs::File>,
}

impl DiagnosticsLogger {
    pub fn new(path: &Path) -> Result<Self, GrowforgeError> {
        let writer = Writer::from_path(path).map_err(|e| GrowforgeError::CsvError(path.to_path_buf(), e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn log_diagnostics(&mut self, diagnostics: &Diagnostics) -> Result<(), GrowforgeError> {
        self.write(DiagnosticEntry {
            kind: "data_dir",
            school: None,
            path: Some(diagnostics.data_dir.display().to_string()),
            detail: format!(
                "{} match, {} candidate files",
                diagnostics.match_policy, diagnostics.candidate_count
            ),
        })?;

        for source in &diagnostics.sources {
            self.write(DiagnosticEntry {
                kind: "source",
                school: source.school,
                path: Some(source.path.display().to_string()),
                detail: source.encoding.map(|e| e.to_string()).unwrap_or_default(),
            })?;
        }

        for warning in &diagnostics.warnings {
            let (kind, path) = match warning {
                LoadWarning::EnvironmentFileMissing { .. } => ("missing_file", None),
                LoadWarning::EnvironmentFileUnreadable { path, .. } => {
                    ("unreadable_file", Some(path.display().to_string()))
                }
            };
            self.write(DiagnosticEntry {
                kind,
                school: Some(warning.school()),
                path,
                detail: warning.to_string(),
            })?;
        }

        for sheet in &diagnostics.unmatched_sheets {
            self.write(DiagnosticEntry {
                kind: "unmatched_sheet",
                school: None,
                path: None,
                detail: sheet.clone(),
            })?;
        }

        if let Some(message) = &diagnostics.growth_error {
            self.write(DiagnosticEntry {
                kind: "growth_error",
                school: None,
                path: None,
                detail: message.clone(),
            })?;
        }

        self.writer
            .flush()
            .map_err(|e| GrowforgeError::FileIO(self.path.clone(), e))
    }

    fn write(&mut self, entry: DiagnosticEntry) -> Result<(), GrowforgeError> {
        self.writer
            .serialize(entry)
            .map_err(|e| GrowforgeError::CsvError(self.path.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_one_line_per_finding() {
        let tmp = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new(Path::new("data"));
        diagnostics.warnings.push(LoadWarning::EnvironmentFileMissing {
            school: School::Dongsan,
            logical_name: "동산고_환경데이터.csv".to_string(),
        });
        diagnostics.unmatched_sheets.push("요약".to_string());

        let path = tmp.path().join("diagnostics.csv");
        DiagnosticsLogger::new(&path).unwrap().log_diagnostics(&diagnostics).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "kind,school,path,detail");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "data_dir,,data,\"substring match, 0 candidate files\"");
        assert!(lines[2].starts_with("missing_file,동산고,"));
        assert_eq!(lines[3], "unmatched_sheet,,,요약");
    }
}
