mod cli;
mod commands;
mod error;

use crate::cli::{Cli, Command};
use crate::commands::BundleArgs;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use stamp_config::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Preview { input } => commands::preview(&config, &input).await,
        Command::Bundle { input, zip, compress, convert, output_dir, no_zip } => {
            let args = BundleArgs { input: &input, zip: zip.as_deref(), compress, convert, output_dir: &output_dir, no_zip };
            commands::bundle(&config, args).await
        },
        Command::Convert { files, output_dir } => commands::convert(&config, files, output_dir.as_deref()).await,
        Command::Options => {
            commands::options();
            Ok(())
        },
        Command::Doctor => {
            commands::doctor(&config);
            Ok(())
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        },
    }
}
