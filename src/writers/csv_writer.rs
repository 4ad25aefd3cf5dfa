use crate::error::Result;
use crate::models::{Cell, Table};
use crate::utils::constants::DEFAULT_DELIMITER;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes a [`Table`] as UTF-8 CSV with a header row.
pub struct CsvTableWriter {
    delimiter: u8,
}

impl CsvTableWriter {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write to a file, creating parent directories as needed.
    pub fn write_path(&self, table: &Table, path: &Path) -> Result<OutputFileInfo> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        self.write_to(table, file)?;

        let info = OutputFileInfo {
            path: path.to_path_buf(),
            rows: table.len(),
            columns: table.columns().len(),
            size_bytes: std::fs::metadata(path)?.len(),
        };
        info!("Wrote {} rows to {}", info.rows, path.display());
        Ok(info)
    }

    pub fn write_to<W: Write>(&self, table: &Table, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(table.columns())?;
        for row in table.rows() {
            csv_writer.write_record(row.iter().map(format_cell))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the table to an in-memory CSV string.
    pub fn to_csv_string(&self, table: &Table) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(table, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for CsvTableWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Bool(true) => "True".to_string(),
        Cell::Bool(false) => "False".to_string(),
        _ => cell.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct OutputFileInfo {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub size_bytes: u64,
}

impl OutputFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Output: {}\nRows: {}  Columns: {}  Size: {:.1} KB",
            self.path.display(),
            self.rows,
            self.columns,
            self.size_bytes as f64 / 1024.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::CsvTableReader;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("Nombre", vec![Cell::text("Lleida, centro"), Cell::text("Tàrrega")]),
            ("X_ETRS89", vec![Cell::Float(302411.663), Cell::Float(345678.0)]),
            ("Huso", vec![Cell::Int(31), Cell::Int(31)]),
            ("Nota", vec![Cell::Empty, Cell::Bool(true)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_string() {
        let csv = CsvTableWriter::new().to_csv_string(&sample()).unwrap();
        assert_eq!(
            csv,
            "Nombre,X_ETRS89,Huso,Nota\n\"Lleida, centro\",302411.663,31,\nTàrrega,345678,31,True\n"
        );
    }

    #[test]
    fn test_written_file_reloads() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("out.csv");

        let info = CsvTableWriter::new().with_delimiter(b';').write_path(&sample(), &path)?;
        assert_eq!(info.rows, 2);
        assert_eq!(info.columns, 4);
        assert!(info.size_bytes > 0);

        let reloaded = CsvTableReader::new().with_delimiter(b';').read_path(&path)?;
        assert_eq!(reloaded.columns(), sample().columns());
        assert_eq!(reloaded.get(0, "Nombre"), Some(&Cell::text("Lleida, centro")));
        assert_eq!(reloaded.get(0, "X_ETRS89"), Some(&Cell::text("302411.663")));
        assert_eq!(reloaded.get(0, "Nota"), Some(&Cell::Empty));
        Ok(())
    }
}
