pub mod csv_reader;
pub mod spreadsheet_reader;

pub use csv_reader::{is_known_encoding, parse_delimiter, CsvTableReader};
pub use spreadsheet_reader::SpreadsheetReader;

use crate::error::{ProcessingError, Result};
use crate::models::Table;
use crate::utils::constants::{DEFAULT_DELIMITER, DEFAULT_ENCODING};
use crate::utils::filename::file_extension;
use std::path::Path;
use tracing::info;

/// Options for turning an input file into a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub encoding: String,
    pub has_headers: bool,
    /// Worksheet to read from spreadsheets (first sheet when `None`).
    pub sheet: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            encoding: DEFAULT_ENCODING.to_string(),
            has_headers: true,
            sheet: None,
        }
    }
}

/// Read a CSV or spreadsheet file, chosen by extension.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<Table> {
    let table = match file_extension(path).as_deref() {
        Some("csv") | Some("txt") | Some("tsv") => CsvTableReader::new()
            .with_delimiter(options.delimiter)
            .with_encoding(&options.encoding)?
            .with_headers(options.has_headers)
            .read_path(path)?,
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            SpreadsheetReader::with_sheet(options.sheet.clone()).read_path(path)?
        }
        _ => {
            return Err(ProcessingError::UnsupportedFormat(format!(
                "{} (expected .csv, .txt, .xlsx, .xls or .ods)",
                path.display()
            )))
        }
    };

    info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_table_dispatches_on_extension() -> Result<()> {
        let mut temp_file = tempfile::Builder::new().suffix(".CSV").tempfile()?;
        writeln!(temp_file, "Lat,Lon")?;
        writeln!(temp_file, "41.0,1.0")?;

        let table = read_table(temp_file.path(), &ReadOptions::default())?;
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_read_table_rejects_unknown_extension() {
        let result = read_table(Path::new("puntos.json"), &ReadOptions::default());
        assert!(matches!(result, Err(ProcessingError::UnsupportedFormat(_))));
    }
}
