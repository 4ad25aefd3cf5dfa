use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "etrs89-converter")]
#[command(about = "Convert latitude/longitude tables to ETRS89 / UTM (zones 29N-31N)")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: etrs89-converter.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV or spreadsheet of lat/lon coordinates to ETRS89 / UTM
    Convert {
        #[arg(short, long, help = "Input file (.csv, .txt, .xlsx, .xls, .ods)")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: output/convertido_ETRS89_UTM-{YYMMDD}.csv]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Latitude column [default: first column containing 'lat']")]
        lat_col: Option<String>,

        #[arg(long, help = "Longitude column [default: first column containing 'lon']")]
        lon_col: Option<String>,

        #[arg(short, long, help = "Zone mode: force_31n, auto or fixed")]
        mode: Option<String>,

        #[arg(short, long, help = "UTM zone for --mode fixed (29, 30 or 31)")]
        zone: Option<i64>,

        #[arg(long, help = "Coordinates use a decimal comma (e.g. 41,8435)")]
        decimal_comma: bool,

        #[arg(long, help = "Input datum: etrs89 (EPSG:4258) or wgs84 (EPSG:4326)")]
        datum: Option<String>,

        #[arg(long, conflicts_with = "datum", help = "Input CRS code, e.g. EPSG:4258")]
        input_crs: Option<String>,

        #[arg(short, long, help = "Decimal places for X/Y")]
        round: Option<u32>,

        #[arg(short, long, help = "Field delimiter for CSV input and output")]
        delimiter: Option<String>,

        #[arg(short, long, help = "Text encoding of CSV input (e.g. utf-8, latin1)")]
        encoding: Option<String>,

        #[arg(long, help = "Worksheet to read from spreadsheets")]
        sheet: Option<String>,

        #[arg(long, help = "CSV input has no header row")]
        no_headers: bool,

        #[arg(long, help = "Rows of output to preview")]
        preview: Option<usize>,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },

    /// Show columns, row count and sample rows of an input file
    Inspect {
        #[arg(short, long, help = "Input file (.csv, .txt, .xlsx, .xls, .ods)")]
        input: PathBuf,

        #[arg(short, long)]
        delimiter: Option<String>,

        #[arg(short, long)]
        encoding: Option<String>,

        #[arg(long)]
        sheet: Option<String>,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "etrs89-converter",
            "convert",
            "-i",
            "puntos.csv",
            "--mode",
            "fixed",
            "--zone",
            "30",
            "--decimal-comma",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Convert {
                input,
                mode,
                zone,
                decimal_comma,
                ..
            } => {
                assert_eq!(input, PathBuf::from("puntos.csv"));
                assert_eq!(mode.as_deref(), Some("fixed"));
                assert_eq!(zone, Some(30));
                assert!(decimal_comma);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_datum_conflicts_with_input_crs() {
        let result = Cli::try_parse_from([
            "etrs89-converter",
            "convert",
            "-i",
            "p.csv",
            "--datum",
            "wgs84",
            "--input-crs",
            "EPSG:4258",
        ]);
        assert!(result.is_err());
    }
}
