/// Geographic CRS codes offered as input datums
pub const EPSG_ETRS89: &str = "EPSG:4258";
pub const EPSG_WGS84: &str = "EPSG:4326";

/// UTM zones covering Spain
pub const MIN_SPAIN_ZONE: u8 = 29;
pub const MAX_SPAIN_ZONE: u8 = 31;

/// Geographic bounds accepted by the validity filter
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Output column names
pub const COL_X: &str = "X_ETRS89";
pub const COL_Y: &str = "Y_ETRS89";
pub const COL_EPSG: &str = "EPSG_destino";
pub const COL_ZONE: &str = "Huso";

/// Conversion defaults
pub const DEFAULT_INPUT_CRS: &str = EPSG_ETRS89;
pub const DEFAULT_ROUND_DECIMALS: u32 = 3;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// File handling defaults
pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CONFIG_FILE: &str = "etrs89-converter.toml";
pub const ENV_PREFIX: &str = "ETRS89";
