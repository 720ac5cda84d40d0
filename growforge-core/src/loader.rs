//! Reading a school's environment CSV.
//!
//! Files come from different authoring tools: some are UTF-8 (often with a
//! BOM), others are saved in the Korean legacy code page. UTF-8 is tried
//! first and EUC-KR is the fallback.

use crate::error::GrowforgeError;
use csv::{ReaderBuilder, Trim};
use encoding_rs::EUC_KR;
use growforge_schemas::{environment::EnvironmentRecord, school::School};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    Utf8,
    /// EUC-KR as extended by CP949.
    EucKr,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("utf-8"),
            TextEncoding::EucKr => f.write_str("euc-kr"),
        }
    }
}

/// Decodes `bytes` as UTF-8 (BOM tolerated), falling back to EUC-KR.
/// Returns `None` when neither decoding is clean.
pub fn decode_text(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Some((text.to_owned(), TextEncoding::Utf8));
    }

    EUC_KR
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| (text.into_owned(), TextEncoding::EucKr))
}

/// A CSV row before it is tagged with its school.
#[derive(Debug, Deserialize)]
struct EnvironmentRow {
    #[serde(default)]
    time: String,
    temperature: Option<f64>,
    humidity: Option<f64>,
    ph: Option<f64>,
    ec: Option<f64>,
}

/// Environment records of one school plus the encoding the file was read with.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentTable {
    pub records: Vec<EnvironmentRecord>,
    pub encoding: TextEncoding,
}

pub fn load_environment_csv(path: &Path, school: School) -> Result<EnvironmentTable, GrowforgeError> {
    let bytes = fs::read(path).map_err(|e| GrowforgeError::FileIO(path.to_path_buf(), e))?;
    let (text, encoding) =
        decode_text(&bytes).ok_or_else(|| GrowforgeError::UndecodableText(path.to_path_buf()))?;

    if encoding != TextEncoding::Utf8 {
        debug!("{} is not UTF-8, decoded as {}", path.display(), encoding);
    }

    let records = parse_environment_csv(&text, school)
        .map_err(|e| GrowforgeError::CsvError(path.to_path_buf(), e))?;

    debug!("Loaded {} environment rows for {} from {}", records.len(), school, path.display());
    Ok(EnvironmentTable { records, encoding })
}

/// Parses decoded CSV text with a `time,temperature,humidity,ph,ec` header.
/// Columns beyond those are ignored; blank numeric cells become `None`.
pub fn parse_environment_csv(text: &str, school: School) -> Result<Vec<EnvironmentRecord>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<EnvironmentRow>()
        .map(|row| {
            row.map(|row| EnvironmentRecord {
                time: row.time,
                temperature: row.temperature,
                humidity: row.humidity,
                ph: row.ph,
                ec: row.ec,
                school,
            })
        })
        .collect()
}
