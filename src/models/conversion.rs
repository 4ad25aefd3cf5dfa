use crate::models::{ConversionMode, Table};
use crate::utils::constants::{DEFAULT_INPUT_CRS, DEFAULT_ROUND_DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Per-request conversion options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConvertOptions {
    /// Zone used when the mode is `fixed`.
    pub fixed_zone: Option<i64>,

    /// Replace `,` with `.` before parsing textual coordinates.
    pub use_decimal_comma: bool,

    #[validate(length(min = 1))]
    pub input_crs: String,

    #[validate(range(max = 12))]
    pub round_decimals: u32,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_zone(mut self, zone: i64) -> Self {
        self.fixed_zone = Some(zone);
        self
    }

    pub fn with_decimal_comma(mut self, use_decimal_comma: bool) -> Self {
        self.use_decimal_comma = use_decimal_comma;
        self
    }

    pub fn with_input_crs(mut self, input_crs: impl Into<String>) -> Self {
        self.input_crs = input_crs.into();
        self
    }

    pub fn with_round_decimals(mut self, round_decimals: u32) -> Self {
        self.round_decimals = round_decimals;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fixed_zone: None,
            use_decimal_comma: false,
            input_crs: DEFAULT_INPUT_CRS.to_string(),
            round_decimals: DEFAULT_ROUND_DECIMALS,
        }
    }
}

/// Counters and zone breakdown of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub mode: ConversionMode,
    pub input_crs: String,
    pub total_rows: usize,
    pub n_valid: usize,
    pub n_drop: usize,
    /// Rows rejected by the parse/range filter.
    pub dropped_out_of_range: usize,
    /// Rows whose zone group failed to transform (auto mode only).
    pub dropped_transform_failed: usize,
    /// Output rows per zone number.
    pub zone_counts: BTreeMap<u8, usize>,
    /// Destination CRS codes that produced output rows.
    pub destination_crs: Vec<String>,
}

impl ConversionSummary {
    pub fn summary(&self) -> String {
        let zones = self
            .zone_counts
            .iter()
            .map(|(zone, count)| format!("{}N: {}", zone, count))
            .collect::<Vec<_>>()
            .join(", ");

        let mut message = format!(
            "Conversión completada. {} filas válidas; {} descartadas",
            self.n_valid, self.n_drop
        );
        if self.dropped_transform_failed > 0 {
            message.push_str(&format!(
                " ({} por lat/lon inválidas, {} por fallo de transformación)",
                self.dropped_out_of_range, self.dropped_transform_failed
            ));
        } else {
            message.push_str(" por lat/lon inválidas");
        }
        message.push_str(&format!(
            ".\nModo: {}  Entrada: {}  Husos: [{}]",
            self.mode, self.input_crs, zones
        ));
        message
    }
}

/// Output of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub table: Table,
    pub n_valid: usize,
    pub n_drop: usize,
    pub summary: ConversionSummary,
}

impl ConversionResult {
    pub fn total_rows(&self) -> usize {
        self.n_valid + self.n_drop
    }
}
