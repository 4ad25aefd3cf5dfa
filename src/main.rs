use anyhow::Context;
use clap::Parser;
use etrs89_converter::cli::{run, Cli};
use etrs89_converter::utils::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_file.as_deref()).context("failed to initialise logging")?;

    run(cli).context("conversion failed")
}
