use crate::error::{ProcessingError, Result};
use crate::models::Cell;
use crate::utils::coordinates::is_valid_lat_lon;

/// Parse one cell as a coordinate value; anything unparseable becomes NaN.
pub fn parse_cell(cell: &Cell, use_decimal_comma: bool) -> f64 {
    match cell {
        Cell::Float(v) => *v,
        Cell::Int(v) => *v as f64,
        Cell::Text(text) => parse_text(text, use_decimal_comma),
        Cell::Empty | Cell::Bool(_) => f64::NAN,
    }
}

fn parse_text(text: &str, use_decimal_comma: bool) -> f64 {
    let trimmed = text.trim();
    let parsed = if use_decimal_comma {
        trimmed.replace(',', ".").parse::<f64>()
    } else {
        trimmed.parse::<f64>()
    };
    parsed.unwrap_or(f64::NAN)
}

/// Parse a column of cells into a parallel sequence of floats.
pub fn parse_coordinates<'a, I>(cells: I, use_decimal_comma: bool) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Cell>,
{
    cells
        .into_iter()
        .map(|cell| parse_cell(cell, use_decimal_comma))
        .collect()
}

/// Rows that survived the range filter, with their parsed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRows {
    pub indices: Vec<usize>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub n_valid: usize,
    pub n_drop: usize,
}

/// Keep rows whose latitude is in [-90, 90] and longitude in [-180, 180].
///
/// Fails with `NoValidRows` when nothing survives.
pub fn filter_valid_rows(latitudes: &[f64], longitudes: &[f64]) -> Result<ValidRows> {
    if latitudes.len() != longitudes.len() {
        return Err(ProcessingError::InvalidFormat(format!(
            "Latitude and longitude columns differ in length ({} vs {})",
            latitudes.len(),
            longitudes.len()
        )));
    }

    let mut valid = ValidRows {
        indices: Vec::new(),
        latitudes: Vec::new(),
        longitudes: Vec::new(),
        n_valid: 0,
        n_drop: 0,
    };

    for (i, (&lat, &lon)) in latitudes.iter().zip(longitudes).enumerate() {
        if is_valid_lat_lon(lat, lon) {
            valid.indices.push(i);
            valid.latitudes.push(lat);
            valid.longitudes.push(lon);
        }
    }

    valid.n_valid = valid.indices.len();
    valid.n_drop = latitudes.len() - valid.n_valid;

    if valid.n_valid == 0 {
        return Err(ProcessingError::NoValidRows);
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_comma() {
        let cells = [Cell::text("41,84346"), Cell::text("1,03335")];

        let parsed = parse_coordinates(&cells, true);
        assert_eq!(parsed, vec![41.84346, 1.03335]);

        let parsed = parse_coordinates(&cells, false);
        assert!(parsed.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_parse_mixed_cells() {
        assert_eq!(parse_cell(&Cell::Float(40.5), false), 40.5);
        assert_eq!(parse_cell(&Cell::Int(-3), false), -3.0);
        assert_eq!(parse_cell(&Cell::text(" 2.25 "), false), 2.25);
        assert!(parse_cell(&Cell::Empty, false).is_nan());
        assert!(parse_cell(&Cell::Bool(true), false).is_nan());
        assert!(parse_cell(&Cell::text("n/a"), true).is_nan());
        // Thousands separators are not understood
        assert!(parse_cell(&Cell::text("1,234,5"), true).is_nan());
    }

    #[test]
    fn test_filter_counts() {
        let lats = [41.0, 95.0, f64::NAN, -90.0];
        let lons = [1.0, 1.0, 2.0, 180.0];

        let valid = filter_valid_rows(&lats, &lons).unwrap();
        assert_eq!(valid.indices, vec![0, 3]);
        assert_eq!(valid.latitudes, vec![41.0, -90.0]);
        assert_eq!(valid.longitudes, vec![1.0, 180.0]);
        assert_eq!(valid.n_valid, 2);
        assert_eq!(valid.n_drop, 2);
    }

    #[test]
    fn test_filter_no_valid_rows() {
        let result = filter_valid_rows(&[f64::NAN, 100.0], &[0.0, 0.0]);
        assert!(matches!(result, Err(ProcessingError::NoValidRows)));

        let result = filter_valid_rows(&[], &[]);
        assert!(matches!(result, Err(ProcessingError::NoValidRows)));
    }
}
