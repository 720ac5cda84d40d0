#![allow(dead_code)]

use growforge_schemas::{
    file_formats::{environment_file_name, GROWTH_WORKBOOK_NAME},
    school::School,
};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const GROWTH_HEADERS: [&str; 4] = ["개체번호", "생중량(g)", "잎 수(장)", "지상부 길이(mm)"];

/// Specimens per school in the default fixture.
pub fn specimen_count(school: School) -> usize {
    match school {
        School::Songdo => 3,
        School::Haneul => 4,
        School::Ara => 2,
        School::Dongsan => 5,
    }
}

pub fn environment_text(school: School) -> String {
    let base = 18.0 + school.ec_target();
    let mut text = String::from("time,temperature,humidity,ph,ec\n");
    for hour in 0..3 {
        text.push_str(&format!(
            "2025-05-26 {:02}:00,{:.1},{:.1},{:.2},{:.2}\n",
            10 + hour,
            base + hour as f64,
            55.0 + hour as f64,
            6.0,
            school.ec_target() * 0.95
        ));
    }
    text
}

pub fn write_environment(data_dir: &Path, file_name: &str, school: School) -> PathBuf {
    let path = data_dir.join(file_name);
    fs::write(&path, environment_text(school)).unwrap();
    path
}

/// Writes a growth workbook with one sheet per `(sheet name, school)` pair
/// plus any extra empty sheets.
pub fn write_workbook(path: &Path, sheets: &[(&str, School)], extra_sheets: &[&str]) {
    let mut workbook = Workbook::new();
    for (name, school) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (col, header) in GROWTH_HEADERS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for i in 0..specimen_count(*school) {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, (i + 1) as f64).unwrap();
            sheet.write_number(row, 1, school.ec_target() + i as f64).unwrap();
            sheet.write_number(row, 2, 5.0 + i as f64).unwrap();
            sheet.write_number(row, 3, 100.0 + 10.0 * i as f64).unwrap();
        }
    }
    for name in extra_sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        sheet.write_string(0, 0, "메모").unwrap();
    }
    workbook.save(path).unwrap();
}

/// A temp directory holding `data/` with all four environment files and the
/// growth workbook (four school sheets and one summary sheet).
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn complete() -> Self {
        let fixture = Self::empty();
        for school in School::ALL {
            write_environment(&fixture.data_dir(), &environment_file_name(school), school);
        }
        let sheets: Vec<(&str, School)> = School::ALL.iter().map(|s| (s.name(), *s)).collect();
        write_workbook(&fixture.data_dir().join(GROWTH_WORKBOOK_NAME), &sheets, &["요약"]);
        fixture
    }

    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn remove(&self, file_name: &str) {
        fs::remove_file(self.data_dir().join(file_name)).unwrap();
    }
}
