pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod transform;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use models::{ConversionMode, ConversionResult, ConvertOptions, Table, UtmZone};
pub use processors::{convert_table, CoordinateConverter};
