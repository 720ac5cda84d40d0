//! Locating the data directory and matching logical file names against the
//! files actually on disk.
//!
//! File names created on different systems can carry the same Hangul text in
//! composed or decomposed form, so both sides of every comparison are put in
//! NFC first.

use crate::error::GrowforgeError;
use growforge_schemas::file_formats::DATA_DIR_NAME;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Unicode canonical composition of `text`.
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// How a logical file name is compared with a candidate's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The logical name occurs anywhere in the candidate name. Survives
    /// prefixes and suffixes such as `(1)` added by browsers and file managers.
    #[default]
    Substring,
    /// The names are equal.
    Exact,
}

impl MatchPolicy {
    pub fn matches(self, logical: &str, candidate: &str) -> bool {
        self.matches_normalized(&nfc(logical), &nfc(candidate))
    }

    fn matches_normalized(self, logical: &str, candidate: &str) -> bool {
        match self {
            MatchPolicy::Substring => candidate.contains(logical),
            MatchPolicy::Exact => candidate == logical,
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Substring => f.write_str("substring"),
            MatchPolicy::Exact => f.write_str("exact"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchPolicy::Substring),
            "exact" => Ok(MatchPolicy::Exact),
            other => Err(format!("unknown match policy '{}' (expected substring or exact)", other)),
        }
    }
}

/// Which files inside the data directory are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Every regular file below the data directory.
    #[default]
    Recursive,
    /// Only regular files directly inside the data directory.
    Flat,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Recursive => f.write_str("recursive"),
            ScanMode::Flat => f.write_str("flat"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recursive" => Ok(ScanMode::Recursive),
            "flat" => Ok(ScanMode::Flat),
            other => Err(format!("unknown scan mode '{}' (expected recursive or flat)", other)),
        }
    }
}

/// Finds the `data` directory for `root`.
///
/// `root/data` wins if it exists. Otherwise the subdirectories of `root` are
/// walked depth first in file-name order and the first directory named
/// exactly `data` is returned.
pub fn locate_data_dir(root: &Path) -> Result<PathBuf, GrowforgeError> {
    let direct = root.join(DATA_DIR_NAME);
    if direct.is_dir() {
        return Ok(direct);
    }

    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry while searching for data dir: {}", e);
                None
            }
        })
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == DATA_DIR_NAME)
        .map(|entry| entry.into_path())
        .ok_or_else(|| GrowforgeError::DataDirNotFound(root.to_path_buf()))
}

#[derive(Debug, Clone)]
struct Candidate {
    path: PathBuf,
    normalized_name: String,
}

/// Resolves logical file names to files inside one data directory.
///
/// Candidates are listed once at construction and kept sorted by path, so a
/// given directory state always resolves the same way.
#[derive(Debug, Clone)]
pub struct FileResolver {
    data_dir: PathBuf,
    policy: MatchPolicy,
    candidates: Vec<Candidate>,
}

impl FileResolver {
    pub fn new(data_dir: PathBuf, scan: ScanMode, policy: MatchPolicy) -> Result<Self, GrowforgeError> {
        let mut paths = list_files(&data_dir, scan)?;
        paths.sort();

        let candidates = paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                Some(Candidate { normalized_name: nfc(&name), path })
            })
            .collect::<Vec<_>>();

        debug!(
            "Indexed {} candidate files in {} ({} scan, {} match)",
            candidates.len(),
            data_dir.display(),
            scan,
            policy
        );

        Ok(Self { data_dir, policy, candidates })
    }

    /// Locates the data directory under `root` and indexes it.
    pub fn discover(root: &Path, scan: ScanMode, policy: MatchPolicy) -> Result<Self, GrowforgeError> {
        let data_dir = locate_data_dir(root)?;
        Self::new(data_dir, scan, policy)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Path> {
        self.candidates.iter().map(|c| c.path.as_path())
    }

    /// First candidate whose name satisfies the match policy, if any.
    pub fn resolve(&self, logical_name: &str) -> Option<&Path> {
        let logical = nfc(logical_name);
        self.candidates
            .iter()
            .find(|c| self.policy.matches_normalized(&logical, &c.normalized_name))
            .map(|c| c.path.as_path())
    }
}

fn list_files(dir: &Path, scan: ScanMode) -> Result<Vec<PathBuf>, GrowforgeError> {
    match scan {
        ScanMode::Recursive => Ok(WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()),
        ScanMode::Flat => {
            let entries = fs::read_dir(dir).map_err(|e| GrowforgeError::FileIO(dir.to_path_buf(), e))?;
            Ok(entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use unicode_normalization::UnicodeNormalization;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn nfc_matches_decomposed_name() {
        let logical = "송도고_환경데이터.csv";
        let decomposed: String = logical.nfd().collect();
        assert_ne!(logical.as_bytes(), decomposed.as_bytes());
        assert!(MatchPolicy::Exact.matches(logical, &decomposed));
        assert!(MatchPolicy::Substring.matches(logical, &decomposed));
    }

    #[test]
    fn substring_accepts_decorated_names_exact_does_not() {
        let logical = "하늘고_환경데이터.csv";
        let decorated = "복사본_하늘고_환경데이터.csv";
        assert!(MatchPolicy::Substring.matches(logical, decorated));
        assert!(!MatchPolicy::Exact.matches(logical, decorated));
    }

    #[test]
    fn policy_and_scan_mode_parse() {
        assert_eq!("Exact".parse::<MatchPolicy>(), Ok(MatchPolicy::Exact));
        assert_eq!("flat".parse::<ScanMode>(), Ok(ScanMode::Flat));
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
    }

    #[test]
    fn prefers_direct_data_child() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data")).unwrap();
        fs::create_dir_all(tmp.path().join("a/data")).unwrap();
        assert_eq!(locate_data_dir(tmp.path()).unwrap(), tmp.path().join("data"));
    }

    #[test]
    fn finds_nested_data_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("project/inputs/data")).unwrap();
        assert_eq!(
            locate_data_dir(tmp.path()).unwrap(),
            tmp.path().join("project/inputs/data")
        );
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("other")).unwrap();
        assert!(matches!(
            locate_data_dir(tmp.path()),
            Err(GrowforgeError::DataDirNotFound(_))
        ));
    }

    #[test]
    fn flat_scan_ignores_nested_files() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        touch(&data.join("raw/아라고_환경데이터.csv"));

        let flat = FileResolver::new(data.clone(), ScanMode::Flat, MatchPolicy::Substring).unwrap();
        assert!(flat.resolve("아라고_환경데이터.csv").is_none());

        let recursive = FileResolver::new(data.clone(), ScanMode::Recursive, MatchPolicy::Substring).unwrap();
        assert_eq!(
            recursive.resolve("아라고_환경데이터.csv"),
            Some(data.join("raw/아라고_환경데이터.csv").as_path())
        );
    }

    #[test]
    fn resolve_returns_first_sorted_match() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        touch(&data.join("b_동산고_환경데이터.csv"));
        touch(&data.join("a_동산고_환경데이터.csv"));

        let resolver = FileResolver::new(data.clone(), ScanMode::Flat, MatchPolicy::Substring).unwrap();
        assert_eq!(
            resolver.resolve("동산고_환경데이터.csv"),
            Some(data.join("a_동산고_환경데이터.csv").as_path())
        );
        assert_eq!(resolver.candidates().count(), 2);
    }
}
