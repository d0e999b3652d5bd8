use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (defaults apply when the file is missing)
    #[arg(long, default_value = "figures.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Distortion scatter comparing this work with the reference method
    Validation {
        /// Comparison table with `dist1,dist2` columns (overrides config)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output path; `.svg` writes SVG, anything else PDF (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Four-panel statistics of the structure-pair table
    Stats {
        /// Structure-pair table with `formula,de,dist,spg1,spg2` columns (overrides config)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output path; `.svg` writes SVG, anything else PDF (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Draw the stoichiometry panel from the published counts
        #[arg(long, default_value_t = false)]
        published: bool,
    },
    /// Both figures with the configured paths
    All,
    /// Write the defaults to the config path as a commented template
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}
