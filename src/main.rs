// Entry point: loads the config and renders the requested figures.
mod cli;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use xtal_figures::config::{FiguresConfig, StoichiometrySource};
use xtal_figures::figures::{stats, validation};

fn run(args: Args) -> xtal_figures::Result<()> {
    let config_path = args.config;
    let load = || FiguresConfig::load(&config_path);

    match args.command {
        Command::Validation { input, output } => {
            let mut cfg = load()?;
            if let Some(input) = input {
                cfg.validation.input = input;
            }
            if let Some(output) = output {
                cfg.validation.output = output;
            }
            validation::run(&cfg.validation)?;
        }
        Command::Stats {
            input,
            output,
            published,
        } => {
            let mut cfg = load()?;
            if let Some(input) = input {
                cfg.stats.input = input;
            }
            if let Some(output) = output {
                cfg.stats.output = output;
            }
            if published {
                cfg.stats.stoichiometry_source = StoichiometrySource::Published;
            }
            stats::run(&cfg.stats)?;
        }
        Command::All => {
            let cfg = load()?;
            validation::run(&cfg.validation)?;
            stats::run(&cfg.stats)?;
        }
        Command::InitConfig { force } => {
            FiguresConfig::write_template(&config_path, force)?;
            info!("Wrote config template to {}", config_path.display());
        }
    }
    info!("done");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("figure generation failed: {err}");
        std::process::exit(1);
    }
}
