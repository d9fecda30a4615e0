//! Application entry point: Chat Vibes.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime the remote calls run on.
//! 4. Build the analysis backend and orchestrator from config.
//! 5. Run [`eframe::run_native`], which blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use chat_vibes::{
    app::ChatVibesApp,
    config::AppConfig,
    llm::backend_from_config,
    pipeline::AnalysisOrchestrator,
    validate::FormatValidator,
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Chat Vibes")
        .with_inner_size([width, height])
        .with_min_inner_size([420.0, 360.0])
        .with_drag_and_drop(true);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Chat Vibes starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (remote calls are I/O bound; two workers is plenty)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Backend + orchestrator
    if config.llm.resolved_api_key().is_none() {
        log::warn!(
            "No API key configured; set `api_key` in settings.toml or {}",
            config.llm.api_key_env
        );
    }
    let backend = backend_from_config(&config.llm);
    let validator = FormatValidator::with_window(config.validation.prefix_lines);
    let orchestrator = Arc::new(AnalysisOrchestrator::new(backend, validator));
    log::info!(
        "Analysis backend: {:?} model={}",
        config.llm.provider,
        config.llm.model
    );

    // 5. Run the window (blocks until closed)
    let app = ChatVibesApp::new(orchestrator, rt.handle().clone(), config.clone());
    let options = native_options(&config);

    eframe::run_native(
        "Chat Vibes",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
