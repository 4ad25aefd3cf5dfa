pub mod converter;
pub mod coordinate_parser;

pub use converter::{convert_table, CoordinateConverter};
pub use coordinate_parser::{filter_valid_rows, parse_cell, parse_coordinates, ValidRows};
