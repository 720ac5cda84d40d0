use crate::{
    dataset::tables::{Dataset, Diagnostics, LoadWarning, SourceFile},
    error::GrowforgeError,
    loader,
    resolver::{FileResolver, MatchPolicy, ScanMode},
    workbook,
};
use growforge_schemas::{
    environment::EnvironmentRecord,
    file_formats::{environment_file_name, GROWTH_WORKBOOK_NAME},
    school::School,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A fluent builder that configures and runs a full dataset load.
///
/// Defaults: search from the current directory, recursive scan of the data
/// directory, substring matching.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    root: PathBuf,
    scan: ScanMode,
    policy: MatchPolicy,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            scan: ScanMode::default(),
            policy: MatchPolicy::default(),
        }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory the `data` directory is searched from.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_scan_mode(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the load.
    ///
    /// # Errors
    ///
    /// `DataDirNotFound` when no data directory exists and `WorkbookNotFound`
    /// when the growth workbook cannot be resolved. Problems with a single
    /// school's CSV or with the contents of the workbook do not fail the load;
    /// they are recorded in the dataset's diagnostics.
    pub fn load(&self) -> Result<Dataset, GrowforgeError> {
        let resolver = FileResolver::discover(&self.root, self.scan, self.policy)?;
        info!("Loading experiment data from '{}'", resolver.data_dir().display());

        let mut diagnostics = Diagnostics::new(resolver.data_dir());
        diagnostics.match_policy = resolver.policy();
        diagnostics.candidate_count = resolver.candidates().count();
        debug!(
            "{} candidate files, {} matching",
            diagnostics.candidate_count, diagnostics.match_policy
        );
        let environment = load_environment_tables(&resolver, &mut diagnostics);

        let workbook_path = resolver
            .resolve(GROWTH_WORKBOOK_NAME)
            .ok_or_else(|| GrowforgeError::WorkbookNotFound(GROWTH_WORKBOOK_NAME.to_string()))?;

        let growth = match workbook::load_growth_workbook(workbook_path) {
            Ok(book) => {
                diagnostics.unmatched_sheets = book.unmatched_sheets;
                diagnostics.sources.push(SourceFile {
                    school: None,
                    path: workbook_path.to_path_buf(),
                    encoding: None,
                });
                book.tables
            }
            Err(e) => {
                error!("Growth workbook unusable: {}", e);
                diagnostics.growth_error = Some(e.to_string());
                BTreeMap::new()
            }
        };

        info!(
            "Loaded environment data for {} schools and growth data for {} schools",
            environment.len(),
            growth.len()
        );
        Ok(Dataset::new(environment, growth, diagnostics))
    }
}

fn load_environment_tables(
    resolver: &FileResolver,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<School, Vec<EnvironmentRecord>> {
    let mut tables = BTreeMap::new();

    for school in School::ALL {
        let logical_name = environment_file_name(school);
        let Some(path) = resolver.resolve(&logical_name) else {
            let warning = LoadWarning::EnvironmentFileMissing { school, logical_name };
            warn!("{}", warning);
            diagnostics.warnings.push(warning);
            continue;
        };

        match loader::load_environment_csv(path, school) {
            Ok(table) => {
                diagnostics.sources.push(SourceFile {
                    school: Some(school),
                    path: path.to_path_buf(),
                    encoding: Some(table.encoding),
                });
                tables.insert(school, table.records);
            }
            Err(e) => {
                let warning = LoadWarning::EnvironmentFileUnreadable {
                    school,
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                };
                warn!("{}", warning);
                diagnostics.warnings.push(warning);
            }
        }
    }

    tables
}
