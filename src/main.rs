use std::rc::Rc;

use clap::Parser;
use vcm::card::{CardError, CardLibrary};
use vcm::cli::commands::Cli;
use vcm::io::{config_io, logging};
use vcm::model::AppConfig;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config_io::default_config_path);
    let mut config = config_io::read_config(&config_path)?;
    cli.apply_overrides(&mut config);

    // Keep the handle alive until exit so buffered lines are flushed
    let _logger = logging::init_logging(&config.log.level, &config.log.dir)?;

    let library = load_library(&config)?;
    vcm::tui::run(config, library)
}

#[cfg(unix)]
fn load_library(config: &AppConfig) -> Result<Rc<dyn CardLibrary>, CardError> {
    let library = vcm::card::NativeLibrary::load(&config.library.path)?;
    Ok(Rc::new(library))
}

#[cfg(not(unix))]
fn load_library(config: &AppConfig) -> Result<Rc<dyn CardLibrary>, CardError> {
    Err(CardError::LibraryLoad {
        path: config.library.path.clone(),
        reason: "loading the card library is only supported on unix".to_string(),
    })
}
