use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::models::{ConversionMode, InputDatum};
use crate::processors::CoordinateConverter;
use crate::readers::{parse_delimiter, read_table, ReadOptions};
use crate::utils::coordinates::guess_coordinate_columns;
use crate::utils::filename::generate_default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::CsvTableWriter;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            lat_col,
            lon_col,
            mode,
            zone,
            decimal_comma,
            datum,
            input_crs,
            round,
            delimiter,
            encoding,
            sheet,
            no_headers,
            preview,
            json,
        } => {
            let mut read_options = read_options(&settings, delimiter, encoding, sheet)?;
            read_options.has_headers = !no_headers;

            let progress = ProgressReporter::new_spinner("Leyendo archivo...", json);
            let table = read_table(&input, &read_options)?;

            let (lat_col, lon_col) = match (lat_col, lon_col) {
                (Some(lat), Some(lon)) => (lat, lon),
                (lat, lon) => {
                    let (guessed_lat, guessed_lon) = guess_coordinate_columns(table.columns())?;
                    info!("Using columns {} / {}", guessed_lat, guessed_lon);
                    (lat.unwrap_or(guessed_lat), lon.unwrap_or(guessed_lon))
                }
            };

            let mode = match mode {
                Some(mode) => mode.parse::<ConversionMode>()?,
                None => settings.mode,
            };

            if let Some(zone) = ignored_zone(mode, zone) {
                warn!("--zone {} is ignored in mode {} (only used with --mode fixed)", zone, mode);
            }

            let mut options = settings.convert_options();
            if let Some(zone) = zone {
                options = options.with_fixed_zone(zone);
            }
            if decimal_comma {
                options = options.with_decimal_comma(true);
            }
            if let Some(datum) = datum {
                options = options.with_input_crs(datum.parse::<InputDatum>()?.epsg_code());
            }
            if let Some(input_crs) = input_crs {
                options = options.with_input_crs(input_crs);
            }
            if let Some(round) = round {
                options = options.with_round_decimals(round);
            }

            progress.set_message("Convirtiendo coordenadas...");
            let converter = CoordinateConverter::new();
            let result = converter.convert(&table, &lat_col, &lon_col, mode, &options)?;

            progress.set_message("Escribiendo CSV...");
            let output_file: PathBuf =
                output.unwrap_or_else(|| generate_default_output_filename(&settings.output_dir));
            let file_info = CsvTableWriter::new()
                .with_delimiter(read_options.delimiter)
                .write_path(&result.table, &output_file)?;
            progress.finish_and_clear();

            info!("Cache: {:?}", converter.cache().stats());

            if json {
                println!("{}", serde_json::to_string_pretty(&result.summary)?);
                return Ok(());
            }

            println!("{}", result.summary.summary());
            println!("\n{}", file_info.summary());

            let preview_rows = preview.unwrap_or(settings.preview_rows);
            if preview_rows > 0 {
                println!("\nVista previa:\n{}", result.table.preview(preview_rows));
            }
            if mode != ConversionMode::Force31N {
                println!("\nRecomendación: para Lleida y Cataluña, usa EPSG:25831 (UTM 31N).");
            }
        }

        Commands::Inspect {
            input,
            delimiter,
            encoding,
            sheet,
            sample,
        } => {
            let read_options = read_options(&settings, delimiter, encoding, sheet)?;
            let table = read_table(&input, &read_options)?;

            println!("Archivo: {}", input.display());
            println!("Filas: {}  Columnas: {}", table.len(), table.columns().len());
            println!("Columnas: {}", table.columns().join(", "));

            if !table.columns().is_empty() {
                let (lat, lon) = guess_coordinate_columns(table.columns())?;
                println!("Latitud sugerida: {}  Longitud sugerida: {}", lat, lon);
            }
            if sample > 0 {
                println!("\n{}", table.preview(sample));
            }
        }
    }

    Ok(())
}

fn read_options(
    settings: &Settings,
    delimiter: Option<String>,
    encoding: Option<String>,
    sheet: Option<String>,
) -> Result<ReadOptions> {
    let mut options = settings.read_options()?;
    if let Some(delimiter) = delimiter {
        options.delimiter = parse_delimiter(&delimiter)?;
    }
    if let Some(encoding) = encoding {
        options.encoding = encoding;
    }
    options.sheet = sheet;
    Ok(options)
}

/// `--zone` only takes effect in fixed mode.
fn ignored_zone(mode: ConversionMode, zone: Option<i64>) -> Option<i64> {
    match mode {
        ConversionMode::Fixed => None,
        _ => zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_ignored_outside_fixed_mode() {
        assert_eq!(ignored_zone(ConversionMode::Force31N, Some(30)), Some(30));
        assert_eq!(ignored_zone(ConversionMode::Auto, Some(29)), Some(29));
        assert_eq!(ignored_zone(ConversionMode::Fixed, Some(30)), None);
        assert_eq!(ignored_zone(ConversionMode::Auto, None), None);
    }
}
