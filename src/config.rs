//! Layered settings: built-in defaults, an optional TOML file, then
//! `ETRS89_*` environment variables. CLI flags are applied on top by the
//! command layer.

use crate::error::Result;
use crate::models::{ConversionMode, ConvertOptions};
use crate::readers::{parse_delimiter, ReadOptions};
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DELIMITER, DEFAULT_ENCODING, DEFAULT_INPUT_CRS,
    DEFAULT_OUTPUT_DIR, DEFAULT_PREVIEW_ROWS, DEFAULT_ROUND_DECIMALS, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub input_crs: String,

    #[validate(range(max = 12))]
    pub round_decimals: u32,

    pub use_decimal_comma: bool,

    pub mode: ConversionMode,

    #[validate(length(min = 1))]
    pub delimiter: String,

    #[validate(length(min = 1))]
    pub encoding: String,

    pub preview_rows: usize,

    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_crs: DEFAULT_INPUT_CRS.to_string(),
            round_decimals: DEFAULT_ROUND_DECIMALS,
            use_decimal_comma: false,
            mode: ConversionMode::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    /// Load settings from `path` (required when given) or from
    /// `etrs89-converter.toml` in the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_with_env(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_input_crs(self.input_crs.clone())
            .with_round_decimals(self.round_decimals)
            .with_decimal_comma(self.use_decimal_comma)
    }

    pub fn read_options(&self) -> Result<ReadOptions> {
        Ok(ReadOptions {
            delimiter: parse_delimiter(&self.delimiter)?,
            encoding: self.encoding.clone(),
            ..ReadOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::load_with_env(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.convert_options(), ConvertOptions::default());
        assert_eq!(settings.read_options().unwrap(), ReadOptions::default());
    }

    #[test]
    fn test_file_then_env_override() -> Result<()> {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(temp_file, "round_decimals = 2")?;
        writeln!(temp_file, "mode = \"auto\"")?;
        writeln!(temp_file, "delimiter = \";\"")?;
        writeln!(temp_file, "use_decimal_comma = true")?;

        let settings = Settings::load_with_env(
            Some(temp_file.path()),
            env(&[("ETRS89_ROUND_DECIMALS", "4"), ("ETRS89_INPUT_CRS", "EPSG:4326")]),
        )?;

        assert_eq!(settings.round_decimals, 4);
        assert_eq!(settings.input_crs, "EPSG:4326");
        assert_eq!(settings.mode, ConversionMode::Auto);
        assert!(settings.use_decimal_comma);
        assert_eq!(settings.read_options()?.delimiter, b';');
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load_with_env(Some(Path::new("/no/such/settings.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_setting_rejected() {
        let result = Settings::load_with_env(None, env(&[("ETRS89_ROUND_DECIMALS", "40")]));
        assert!(result.is_err());
    }
}
