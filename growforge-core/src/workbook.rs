//! Reading the growth workbook: one sheet per school.

use crate::error::GrowforgeError;
use crate::resolver::nfc;
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use growforge_schemas::{
    file_formats::columns,
    growth::{CellValue, GrowthRecord},
    school::School,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Sheet names split by whether they belong to a school.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetPartition {
    pub matched: Vec<(String, School)>,
    pub unmatched: Vec<String>,
}

/// Assigns each sheet to the first school whose name occurs in the NFC form
/// of the sheet name. A school claims only its first sheet; later sheets
/// naming the same school are reported as unmatched.
pub fn partition_sheets<I, S>(sheet_names: I) -> SheetPartition
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut partition = SheetPartition::default();
    for name in sheet_names {
        let name = name.into();
        match School::find_in(&nfc(&name)) {
            Some(school) if !partition.matched.iter().any(|(_, s)| *s == school) => {
                partition.matched.push((name, school));
            }
            Some(school) => {
                debug!("Sheet '{}' repeats school {}", name, school);
                partition.unmatched.push(name);
            }
            None => partition.unmatched.push(name),
        }
    }
    partition
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthWorkbook {
    pub tables: BTreeMap<School, Vec<GrowthRecord>>,
    pub unmatched_sheets: Vec<String>,
}

pub fn load_growth_workbook(path: &Path) -> Result<GrowthWorkbook, GrowforgeError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| GrowforgeError::WorkbookError(path.to_path_buf(), e))?;

    let partition = partition_sheets(workbook.sheet_names());
    for sheet in &partition.unmatched {
        info!("Sheet '{}' does not belong to any school, skipping", sheet);
    }

    let mut tables = BTreeMap::new();
    for (sheet, school) in partition.matched {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| GrowforgeError::WorkbookError(path.to_path_buf(), e))?;
        let records = parse_growth_sheet(&sheet, &range, school);
        debug!("Sheet '{}' -> {} ({} rows)", sheet, school, records.len());
        tables.insert(school, records);
    }

    Ok(GrowthWorkbook {
        tables,
        unmatched_sheets: partition.unmatched,
    })
}

/// Converts a sheet to growth records. The first row is the header; header
/// cells are trimmed and NFC-normalized before lookup. Fully blank rows are
/// dropped and missing columns leave the field `None`. Any other named
/// column is kept per row in `extra`.
pub fn parse_growth_sheet(sheet: &str, range: &Range<Data>, school: School) -> Vec<GrowthRecord> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        warn!("Sheet '{}' is empty", sheet);
        return Vec::new();
    };

    let header: Vec<String> = header.iter().map(|cell| nfc(cell.to_string().trim())).collect();
    let column = |name: &str| header.iter().position(|h| h == name);

    let specimen_col = column(columns::SPECIMEN_ID);
    let weight_col = column(columns::FRESH_WEIGHT);
    let leaf_col = column(columns::LEAF_COUNT);
    let shoot_col = column(columns::SHOOT_LENGTH);

    if weight_col.is_none() && leaf_col.is_none() && shoot_col.is_none() {
        warn!("Sheet '{}' has none of the growth measurement columns", sheet);
    }

    let known = [columns::SPECIMEN_ID, columns::FRESH_WEIGHT, columns::LEAF_COUNT, columns::SHOOT_LENGTH];
    let tags = [columns::SCHOOL, columns::EC_TARGET];
    let extra_cols: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty() && !known.contains(&h.as_str()) && !tags.contains(&h.as_str()))
        .filter(|(i, h)| header.iter().position(|other| other == *h) == Some(*i))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    rows.filter(|row| !row.iter().all(|cell| cell.is_empty()))
        .map(|row| GrowthRecord {
            specimen_id: cell_text(row, specimen_col),
            fresh_weight_g: cell_number(row, weight_col),
            leaf_count: cell_number(row, leaf_col),
            shoot_length_mm: cell_number(row, shoot_col),
            school,
            ec_target: school.ec_target(),
            extra: extra_cols
                .iter()
                .filter_map(|&(i, name)| Some((name.to_string(), cell_value(row.get(i)?)?)))
                .collect(),
        })
        .collect()
}

fn cell_number(row: &[Data], col: Option<usize>) -> Option<f64> {
    col.and_then(|i| row.get(i)).and_then(|cell| cell.as_f64())
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::Int(v) => Some(CellValue::Number(*v as f64)),
        Data::Float(v) => Some(CellValue::Number(*v)),
        other => Some(CellValue::Text(other.to_string())),
    }
}

fn cell_text(row: &[Data], col: Option<usize>) -> Option<String> {
    col.and_then(|i| row.get(i))
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[Data]]) -> Range<Data> {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn partitions_by_school_name() {
        let partition = partition_sheets(vec!["송도고", "하늘고 (EC2)", "요약", "송도고_2"]);
        assert_eq!(
            partition.matched,
            vec![
                ("송도고".to_string(), School::Songdo),
                ("하늘고 (EC2)".to_string(), School::Haneul),
            ]
        );
        assert_eq!(partition.unmatched, vec!["요약".to_string(), "송도고_2".to_string()]);
    }

    #[test]
    fn parses_sheet_and_tags_target() {
        let range = sheet(&[
            &[s("개체번호"), s("생중량(g)"), s("잎 수(장)"), s("지상부 길이(mm)")],
            &[Data::Int(1), Data::Float(3.5), Data::Float(6.0), Data::Float(120.0)],
            &[Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            &[Data::Int(2), Data::Float(4.5), Data::Empty, Data::Float(100.0)],
        ]);

        let records = parse_growth_sheet("아라고", &range, School::Ara);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].specimen_id.as_deref(), Some("1"));
        assert_eq!(records[0].fresh_weight_g, Some(3.5));
        assert_eq!(records[1].leaf_count, None);
        assert!(records.iter().all(|r| r.school == School::Ara && r.ec_target == 4.0));
    }

    #[test]
    fn unknown_columns_are_kept_in_order() {
        let range = sheet(&[
            &[s("개체번호"), s("비고"), s("생중량(g)"), s("측정일"), s("")],
            &[Data::Int(1), s("시듦"), Data::Float(3.0), Data::Int(20250526), s("x")],
            &[Data::Int(2), Data::Empty, Data::Float(4.0), Data::Int(20250527), Data::Empty],
        ]);

        let records = parse_growth_sheet("송도고", &range, School::Songdo);
        assert_eq!(
            records[0].extra,
            vec![
                ("비고".to_string(), CellValue::Text("시듦".to_string())),
                ("측정일".to_string(), CellValue::Number(20250526.0)),
            ]
        );
        assert_eq!(records[1].extra, vec![("측정일".to_string(), CellValue::Number(20250527.0))]);
    }

    #[test]
    fn header_lookup_tolerates_padding() {
        let range = sheet(&[&[s(" 생중량(g) ")], &[Data::Float(2.0)]]);
        let records = parse_growth_sheet("동산고", &range, School::Dongsan);
        assert_eq!(records[0].fresh_weight_g, Some(2.0));
        assert_eq!(records[0].specimen_id, None);
    }
}
