//! Downloadable artifacts. Both are pure functions of the dataset.

use crate::{dataset::Dataset, error::GrowforgeError};
use csv::WriterBuilder;
use growforge_schemas::{file_formats::columns, growth::CellValue};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const ENVIRONMENT_EXPORT_HEADERS: [&str; 6] = [
    columns::TIME,
    columns::TEMPERATURE,
    columns::HUMIDITY,
    columns::PH,
    columns::EC,
    columns::SCHOOL,
];

/// All environment rows as UTF-8 CSV with a BOM, so spreadsheet programs
/// pick the right encoding for the Korean school names.
pub fn environment_csv(dataset: &Dataset) -> Result<Vec<u8>, GrowforgeError> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(&mut buffer);
        writer
            .write_record(ENVIRONMENT_EXPORT_HEADERS)
            .map_err(GrowforgeError::CsvWrite)?;
        for record in dataset.combined_environment() {
            writer.serialize(record).map_err(GrowforgeError::CsvWrite)?;
        }
        writer.flush().map_err(|e| GrowforgeError::CsvWrite(e.into()))?;
    }
    Ok(buffer)
}

/// All growth rows on a single sheet. The four known columns come first,
/// then every other sheet column in first-seen order, then the `school` and
/// `ec_target` tags.
pub fn growth_workbook(dataset: &Dataset) -> Result<Vec<u8>, GrowforgeError> {
    let extra_headers = extra_growth_headers(dataset);
    let (known, tags) = columns::GROWTH_EXPORT_HEADERS.split_at(4);
    let tag_col = (known.len() + extra_headers.len()) as u16;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = known
        .iter()
        .copied()
        .chain(extra_headers.iter().map(String::as_str))
        .chain(tags.iter().copied());
    for (col, header) in headers.enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }

    for (i, record) in dataset.combined_growth().enumerate() {
        let row = i as u32 + 1;
        if let Some(id) = &record.specimen_id {
            match id.parse::<f64>() {
                Ok(number) => sheet.write_number(row, 0, number)?,
                Err(_) => sheet.write_string(row, 0, id)?,
            };
        }
        write_optional_number(sheet, row, 1, record.fresh_weight_g)?;
        write_optional_number(sheet, row, 2, record.leaf_count)?;
        write_optional_number(sheet, row, 3, record.shoot_length_mm)?;

        for (name, value) in &record.extra {
            let Some(offset) = extra_headers.iter().position(|h| h == name) else {
                continue;
            };
            let col = (known.len() + offset) as u16;
            match value {
                CellValue::Number(number) => sheet.write_number(row, col, *number)?,
                CellValue::Text(text) => sheet.write_string(row, col, text)?,
            };
        }

        sheet.write_string(row, tag_col, record.school.name())?;
        sheet.write_number(row, tag_col + 1, record.ec_target)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Headers of non-standard growth columns across all schools, first-seen order.
pub fn extra_growth_headers(dataset: &Dataset) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for (name, _) in dataset.combined_growth().flat_map(|r| r.extra.iter()) {
        if !headers.contains(name) {
            headers.push(name.clone());
        }
    }
    headers
}

fn write_optional_number(sheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_number(row, col, value)?;
    }
    Ok(())
}

pub fn write_environment_csv(dataset: &Dataset, path: &Path) -> Result<(), GrowforgeError> {
    let bytes = environment_csv(dataset)?;
    fs::write(path, bytes).map_err(|e| GrowforgeError::FileIO(path.to_path_buf(), e))
}

pub fn write_growth_workbook(dataset: &Dataset, path: &Path) -> Result<(), GrowforgeError> {
    let bytes = growth_workbook(dataset)?;
    fs::write(path, bytes).map_err(|e| GrowforgeError::FileIO(path.to_path_buf(), e))
}
