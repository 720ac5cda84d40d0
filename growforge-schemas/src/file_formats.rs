//! Names of the files, sheets and columns the experiment data comes in.
//!
//! All literals here are in NFC form.

use crate::school::School;

/// Name of the directory holding the input files.
pub const DATA_DIR_NAME: &str = "data";

pub const ENVIRONMENT_FILE_SUFFIX: &str = "_환경데이터.csv";

/// The single workbook with one growth sheet per school.
pub const GROWTH_WORKBOOK_NAME: &str = "4개교_생육결과데이터.xlsx";

pub const ENVIRONMENT_EXPORT_NAME: &str = "env_data.csv";
pub const GROWTH_EXPORT_NAME: &str = "growth_results.xlsx";

/// Logical file name of a school's environment log, e.g. `송도고_환경데이터.csv`.
pub fn environment_file_name(school: School) -> String {
    format!("{}{}", school.name(), ENVIRONMENT_FILE_SUFFIX)
}

pub mod columns {
    pub const TIME: &str = "time";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const PH: &str = "ph";
    pub const EC: &str = "ec";

    pub const SPECIMEN_ID: &str = "개체번호";
    pub const FRESH_WEIGHT: &str = "생중량(g)";
    pub const LEAF_COUNT: &str = "잎 수(장)";
    pub const SHOOT_LENGTH: &str = "지상부 길이(mm)";

    /// Tag columns appended at load time.
    pub const SCHOOL: &str = "school";
    pub const EC_TARGET: &str = "ec_target";

    pub const GROWTH_EXPORT_HEADERS: [&str; 6] =
        [SPECIMEN_ID, FRESH_WEIGHT, LEAF_COUNT, SHOOT_LENGTH, SCHOOL, EC_TARGET];
}
