//! Modbot - modular robot move playback
//!
//! Loads a scenario, plays every move through the checkpoint-aware playback
//! loop and optionally writes lattice exports of the final configuration.
//!
//! Usage: `modbot [scenario.scen]` (falls back to `scenario.path` from config)

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use modbot::config::AppConfig;
use modbot::systems::PlaybackSystem;
use modbot_core::{export, ScenarioLoader, Session};

/// How long to wait for the background loader before giving up
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

fn init_logging(config: &AppConfig) {
    // RUST_LOG wins over the configured level
    let env = env_logger::Env::default().default_filter_or(config.debug.log_level.as_str());
    env_logger::Builder::from_env(env).init();
}

fn write_exports(session: &Session, directory: &Path) {
    match export::write_all(session.registry(), directory) {
        Ok(written) => log::info!("Wrote {} export files to {}", written.len(), directory.display()),
        Err(e) => log::error!("Export failed: {}", e),
    }

    if let Some(snapshot) = session.snapshot() {
        let path = directory.join("final.scen");
        match snapshot.save(&path) {
            Ok(()) => log::info!("Wrote {}", path.display()),
            Err(e) => log::error!("Failed to write {}: {}", path.display(), e),
        }
    }
}

fn main() -> ExitCode {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    init_logging(&config);
    log::info!("Starting modbot");

    let path: Option<PathBuf> = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.scenario.path.clone());
    let Some(path) = path else {
        log::error!("No scenario given: pass a .scen file or set scenario.path");
        return ExitCode::FAILURE;
    };

    let loader = ScenarioLoader::new();
    loader.load_file(path.clone());
    let scenario = match loader.wait(LOAD_TIMEOUT) {
        Some(loaded) => match loaded.result {
            Ok(scenario) => scenario,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::error!("Timed out loading {}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(config.playback.to_controller());
    session.install(scenario);

    let mut system = PlaybackSystem::new(config.playback.frame_rate);
    let frames = system.run_to_end(&mut session, config.playback.max_frames);
    log::info!("Played {} frames: {}", frames, session.sequence().progress_label());

    if let Some(directory) = &config.export.directory {
        write_exports(&session, directory);
    }

    if session.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
