use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, warn};

/// Reads one worksheet of an xlsx/xls/ods workbook; the first row is the header.
pub struct SpreadsheetReader {
    sheet_name: Option<String>,
}

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self { sheet_name: None }
    }

    /// Read the named sheet instead of the first one.
    pub fn with_sheet(sheet_name: Option<String>) -> Self {
        Self { sheet_name }
    }

    pub fn read_path(&self, path: &Path) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| ProcessingError::Spreadsheet(format!("failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_owned();
        let used_sheet = match &self.sheet_name {
            Some(name) if sheet_names.iter().any(|s| s == name) => name.clone(),
            Some(name) => {
                return Err(ProcessingError::Spreadsheet(format!(
                    "sheet '{}' not found, available: {:?}",
                    name, sheet_names
                )))
            }
            None => sheet_names.first().cloned().ok_or_else(|| {
                ProcessingError::Spreadsheet("workbook has no worksheet".to_string())
            })?,
        };
        debug!("Reading sheet '{}' of {}", used_sheet, path.display());

        let range = workbook
            .worksheet_range(&used_sheet)
            .map_err(|e| ProcessingError::Spreadsheet(e.to_string()))?;

        let mut rows = range.rows();
        let header = match rows.next() {
            Some(header) => header,
            None => {
                warn!("Sheet '{}' is empty", used_sheet);
                return Ok(Table::default());
            }
        };

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| match data_to_cell(cell) {
                Cell::Empty => format!("column_{}", i + 1),
                other => other.to_string(),
            })
            .collect();

        let mut table = Table::new(columns);
        for row in rows {
            let cells: Vec<Cell> = row.iter().map(data_to_cell).collect();
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            table.push_row(cells)?;
        }

        Ok(table)
    }
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a calamine cell to a table cell, keeping numbers numeric.
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(v) => Cell::Float(*v),
        Data::Int(v) => Cell::Int(*v),
        Data::Bool(v) => Cell::Bool(*v),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, XlsxError};
    use std::path::PathBuf;
    use tempfile::TempDir;

    // Sheet "Puntos": blank header in column B and a blank row between points.
    // Sheet "Otra": a single lat/lon pair.
    fn write_workbook(dir: &TempDir) -> std::result::Result<PathBuf, XlsxError> {
        let path = dir.path().join("puntos.xlsx");
        let mut workbook = Workbook::new();

        let puntos = workbook.add_worksheet().set_name("Puntos")?;
        puntos.write_string(0, 0, "Nombre")?;
        puntos.write_string(0, 2, "Latitud")?;
        puntos.write_string(0, 3, "Longitud")?;
        puntos.write_string(1, 0, "Punto A")?;
        puntos.write_string(1, 1, "nota")?;
        puntos.write_number(1, 2, 41.84346)?;
        puntos.write_number(1, 3, 1.03335)?;
        puntos.write_string(3, 0, "Punto B")?;
        puntos.write_number(3, 2, 41.61674)?;
        puntos.write_number(3, 3, 0.62218)?;

        let otra = workbook.add_worksheet().set_name("Otra")?;
        otra.write_string(0, 0, "Lat")?;
        otra.write_string(0, 1, "Lon")?;
        otra.write_number(1, 0, 40.4168)?;
        otra.write_number(1, 1, -3.7038)?;

        workbook.save(&path)?;
        Ok(path)
    }

    #[test]
    fn test_read_first_sheet() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_workbook(&dir).unwrap();

        let table = SpreadsheetReader::new().read_path(&path)?;

        assert_eq!(table.columns(), &["Nombre", "column_2", "Latitud", "Longitud"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Nombre"), Some(&Cell::text("Punto A")));
        assert_eq!(table.get(0, "column_2"), Some(&Cell::text("nota")));
        assert_eq!(table.get(0, "Latitud"), Some(&Cell::Float(41.84346)));
        assert_eq!(table.get(1, "Nombre"), Some(&Cell::text("Punto B")));
        assert_eq!(table.get(1, "column_2"), Some(&Cell::Empty));
        assert_eq!(table.get(1, "Longitud"), Some(&Cell::Float(0.62218)));
        Ok(())
    }

    #[test]
    fn test_read_named_sheet() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_workbook(&dir).unwrap();

        let table = SpreadsheetReader::with_sheet(Some("Otra".to_string())).read_path(&path)?;

        assert_eq!(table.columns(), &["Lat", "Lon"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "Lon"), Some(&Cell::Float(-3.7038)));
        Ok(())
    }

    #[test]
    fn test_unknown_sheet() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_workbook(&dir).unwrap();

        let result = SpreadsheetReader::with_sheet(Some("Hoja9".to_string())).read_path(&path);

        match result {
            Err(ProcessingError::Spreadsheet(message)) => {
                assert!(message.contains("Hoja9"));
                assert!(message.contains("Puntos"));
            }
            other => panic!("expected a missing sheet error, got {:?}", other.map(|t| t.len())),
        }
        Ok(())
    }

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Float(41.84346)), Cell::Float(41.84346));
        assert_eq!(data_to_cell(&Data::Int(31)), Cell::Int(31));
        assert_eq!(data_to_cell(&Data::String("41,8".to_string())), Cell::text("41,8"));
        assert_eq!(data_to_cell(&Data::String("  ".to_string())), Cell::Empty);
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(data_to_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_missing_workbook() {
        let result = SpreadsheetReader::new().read_path(Path::new("no/such/file.xlsx"));
        assert!(matches!(result, Err(ProcessingError::Spreadsheet(_))));
    }
}
