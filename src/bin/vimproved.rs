// Vimproved CLI
// Dual-role key filter: raw input_event records on stdin, transformed on stdout

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use vimproved_core::config::{self, Config};
use vimproved_core::run_filter;
use vimproved_core::Interceptor;

/// Dual-role key filter for an interception-tools pipeline
#[derive(Parser, Debug)]
#[command(name = "vimproved")]
#[command(about = "Dual-role key filter for an interception-tools pipeline", long_about = None)]
struct Args {
    /// TOML configuration file (built-in defaults on error or absence)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit
    #[arg(long)]
    check_config: bool,

    /// Enable debug logging (stderr; stdout carries the event stream)
    #[arg(short, long)]
    verbose: bool,
}

fn check_config(args: &Args) -> anyhow::Result<()> {
    let path = args
        .config
        .clone()
        .or_else(Config::default_path)
        .context("no configuration file given and no default path available")?;
    let config = Config::from_path(&path)
        .with_context(|| format!("invalid configuration {}", path.display()))?;
    eprintln!(
        "{} is valid: {} intercept(s)",
        path.display(),
        config.len()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if args.check_config {
        return check_config(&args);
    }

    let config = config::load_or_default(args.config.as_deref());
    let mut interceptor = Interceptor::new(config.into_specs());
    log::debug!("running {} intercept(s)", interceptor.len());

    // One blocking read per iteration until the input stream ends; any
    // write failure is fatal since the consumer's key state would tear.
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_filter(&mut interceptor, stdin.lock(), stdout.lock())
        .context("event stream write failed")?;

    Ok(())
}
