use log2::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use WikiTracker::config::Config;
use WikiTracker::summary::SummaryClient;
use WikiTracker::tracker::TrackerState;
use WikiTracker::viz::TrackerApp;

/// Indicates start time of a session, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = Config::new();
    cfg.validate()?;
    let _log2 = //open("log/log.txt")
        //.tee(true)
    stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("WikiTracker")) // include only modules having this pattern
        .compress(false) // compress output
        .level(cfg.effective_log_level().to_string())
        .start();

    let client = Arc::new(SummaryClient::new(cfg.summary_config()?)?);

    let mut state = TrackerState::new();
    if let Some(url) = &cfg.start_url {
        let node = state.add_node(url, None)?;
        info!("Session started at {}", node.title());
    }

    let app = TrackerApp::new(
        state,
        client,
        tokio::runtime::Handle::current(),
        cfg.output_file.clone(),
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("WikiTracker")
            .with_inner_size([cfg.window_width, cfg.window_height]),
        ..Default::default()
    };

    // blocks until the window is closed
    match eframe::run_native("WikiTracker", options, Box::new(move |_cc| Box::new(app))) {
        Ok(()) => info!("Session closed after {:?}", START_TIME.elapsed()),
        Err(e) => error!("Window failed: {}", e),
    }

    if let Some(path) = &cfg.output_file {
        info!("Session tree written to {:?}", path);
    }

    Ok(())
}
