//! Mustang CLI — preset and settings control for Fender Mustang amplifiers.

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "mustang-cli",
    version,
    about = "Preset and settings control for Fender Mustang amplifiers"
)]
struct Args {
    /// Output as JSON (for devices, presets, current, load, save, config)
    #[arg(long, global = true)]
    json: bool,

    /// Log every frame exchanged with the amp
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = cli::run(args.command, args.json, args.config.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
