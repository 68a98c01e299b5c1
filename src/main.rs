use std::process;

use airbnb_insights::cli::{execute_command, InsightsArgs};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;

fn main() {
    let args = InsightsArgs::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level())).init();

    let command = args.command.name();
    let result = execute_command(args).with_context(|| format!("{command} failed"));

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
