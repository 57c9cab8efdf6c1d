//! Application entry point for the closed-path membrane viewer.
//!
//! This binary parses the command line, installs the logger, and hands
//! the simulation to [`Viewer`] inside an eframe window.

mod cli;
mod export;
mod viewer;

use anyhow::anyhow;
use clap::Parser;
use ftlog::LevelFilter;

use cli::Args;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` once the window is closed.
/// - `Err` if the arguments, the config file, the logger or the native
///   window could not be set up.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Passing no root appender logs to stderr; the guard flushes on drop.
    let _guard = ftlog::Builder::new()
        .max_log_level(level)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logger: {e}"))?;

    let settings = args.into_settings()?;
    ftlog::info!("Starting with {:?}", settings.cfg);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Membrane")
            .with_inner_size([settings.width, settings.height]),
        ..Default::default()
    };
    let viewer = Viewer::new(settings)?;

    eframe::run_native(
        "Membrane",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow!("eframe failed: {e}"))
}
