use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default output filename: convertido_ETRS89_UTM-{YYMMDD}.csv
pub fn generate_default_output_filename(output_dir: &Path) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("convertido_ETRS89_UTM-{:02}{:02}{:02}.csv", year, month, day);
    output_dir.join(filename)
}

/// Lower-cased extension of a path, if any
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
