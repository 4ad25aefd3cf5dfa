use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Table};
use crate::utils::constants::DEFAULT_DELIMITER;
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a delimiter argument: a single ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(ProcessingError::InvalidFormat(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    value
                ))),
            }
        }
    }
}

/// Reads delimited text files into a [`Table`] of text cells.
pub struct CsvTableReader {
    delimiter: u8,
    encoding: &'static Encoding,
    has_headers: bool,
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            encoding: encoding_rs::UTF_8,
            has_headers: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the text encoding by WHATWG label (`utf-8`, `latin1`, `windows-1252`, ...).
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ProcessingError::Encoding(label.to_string()))?;
        Ok(self)
    }

    /// Without headers, columns are named `column_1`, `column_2`, ...
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn read_path(&self, path: &Path) -> Result<Table> {
        let bytes = fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.read_bytes(&bytes)
    }

    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Table> {
        // decode() sniffs a BOM before falling back to the configured encoding
        let (text, used, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                "Input is not valid {}; malformed sequences were replaced",
                used.name()
            );
        }
        self.read_str(&text)
    }

    pub fn read_str(&self, text: &str) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let columns: Vec<String> = if self.has_headers {
            match records.next() {
                Some(header) => header?.iter().map(|h| h.to_string()).collect(),
                None => return Ok(Table::default()),
            }
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (line, record) in records.enumerate() {
            let record = record?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            if self.has_headers && record.len() > columns.len() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Row {} has {} fields, header has {}",
                    line + 2,
                    record.len(),
                    columns.len()
                )));
            }
            rows.push(record.iter().map(Cell::from_field).collect());
        }

        let columns = if self.has_headers {
            columns
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (1..=width).map(|i| format!("column_{}", i)).collect()
        };

        for row in &mut rows {
            row.resize(columns.len(), Cell::Empty);
        }

        Table::from_rows(columns, rows)
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check an encoding label without building a reader.
pub fn is_known_encoding(label: &str) -> bool {
    Encoding::for_label(label.trim().as_bytes()).is_some()
}
