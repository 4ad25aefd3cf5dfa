pub mod conversion;
pub mod table;
pub mod zone;

pub use conversion::{ConversionResult, ConversionSummary, ConvertOptions};
pub use table::{Cell, Table};
pub use zone::{ConversionMode, InputDatum, UtmZone};
