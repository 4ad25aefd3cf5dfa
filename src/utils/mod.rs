pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use coordinates::{guess_coordinate_columns, is_valid_lat_lon, parse_epsg_code, round_to};
pub use filename::{file_extension, generate_default_output_filename};
pub use logging::init_logging;
pub use progress::ProgressReporter;
