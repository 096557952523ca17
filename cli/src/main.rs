mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{legend, render};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match cli.verbose {
        0 => {}
        1 => { builder.filter_level(log::LevelFilter::Info); }
        _ => { builder.filter_level(log::LevelFilter::Debug); }
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
        Commands::Legend(args) => legend::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
