use std::path::PathBuf;

use clap::Parser;

use crate::model::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "vcm", about = concat!("vcm v", env!("CARGO_PKG_VERSION"), " - vCard manager for the terminal"), version)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/vcm/config.toml)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Directory holding the card files
    #[arg(long)]
    pub cards_dir: Option<PathBuf>,

    /// Directory holding the database files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Path to the card parser shared library
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.cards_dir {
            config.cards.dir = dir.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.database.data_dir = dir.clone();
        }
        if let Some(path) = &self.library {
            config.library.path = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
    }
}
