use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Whether a parsed pair lies inside geographic bounds (NaN never does)
pub fn is_valid_lat_lon(latitude: f64, longitude: f64) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&latitude) && (MIN_LON..=MAX_LON).contains(&longitude)
}

/// Round to `decimals` places, halves away from zero.
///
/// # Examples
/// ```
/// use etrs89_converter::utils::round_to;
///
/// assert_eq!(round_to(336724.5628, 2), 336724.56);
/// assert_eq!(round_to(0.125, 2), 0.13);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Pick default latitude/longitude columns from a header.
///
/// The first header containing "lat" (resp. "lon") wins, case-insensitive;
/// falls back to the first column.
pub fn guess_coordinate_columns(columns: &[String]) -> Result<(String, String)> {
    let first = columns.first().ok_or_else(|| {
        ProcessingError::InvalidFormat("Table has no columns".to_string())
    })?;

    let find = |needle: &str| {
        columns
            .iter()
            .find(|c| c.to_lowercase().contains(needle))
            .unwrap_or(first)
            .clone()
    };

    Ok((find("lat"), find("lon")))
}

/// Parse a CRS code of the form `EPSG:<n>` (case-insensitive prefix)
pub fn parse_epsg_code(code: &str) -> Option<u32> {
    let trimmed = code.trim();
    let (prefix, number) = trimmed.split_once(':')?;
    if !prefix.eq_ignore_ascii_case("epsg") {
        return None;
    }
    number.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_lat_lon() {
        assert!(is_valid_lat_lon(41.84346, 1.03335));
        assert!(is_valid_lat_lon(90.0, -180.0));
        assert!(is_valid_lat_lon(-90.0, 180.0));
        assert!(!is_valid_lat_lon(90.0001, 0.0));
        assert!(!is_valid_lat_lon(0.0, -180.5));
        assert!(!is_valid_lat_lon(f64::NAN, 0.0));
        assert!(!is_valid_lat_lon(0.0, f64::NAN));
        assert!(!is_valid_lat_lon(f64::INFINITY, 0.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4634265.72043, 3), 4634265.72);
        assert_eq!(round_to(4634265.72043, 4), 4634265.7204);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(12.0, 0), 12.0);
    }

    #[test]
    fn test_guess_coordinate_columns() {
        let columns = vec![
            "Id".to_string(),
            "Latitud".to_string(),
            "Longitud".to_string(),
        ];
        let (lat, lon) = guess_coordinate_columns(&columns).unwrap();
        assert_eq!(lat, "Latitud");
        assert_eq!(lon, "Longitud");

        let columns = vec!["a".to_string(), "b".to_string()];
        let (lat, lon) = guess_coordinate_columns(&columns).unwrap();
        assert_eq!(lat, "a");
        assert_eq!(lon, "a");

        assert!(guess_coordinate_columns(&[]).is_err());
    }

    #[test]
    fn test_parse_epsg_code() {
        assert_eq!(parse_epsg_code("EPSG:25831"), Some(25831));
        assert_eq!(parse_epsg_code(" epsg:4258 "), Some(4258));
        assert_eq!(parse_epsg_code("4258"), None);
        assert_eq!(parse_epsg_code("ESRI:102100"), None);
        assert_eq!(parse_epsg_code("EPSG:abc"), None);
    }
}
