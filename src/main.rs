mod app;
mod config;
mod error;
mod report;
mod upload;

use app::InvoiceUploader;
use config::{Config, DEFAULT_CONFIG_PATH};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_or_default(DEFAULT_CONFIG_PATH)?;

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(cfg.log_filter.as_str())
        .init();

    info!(config = DEFAULT_CONFIG_PATH, endpoint = %cfg.endpoint, "Configuration loaded");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([cfg.window.width, cfg.window.height])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Invoice Uploader",
        options,
        Box::new(move |_cc: &eframe::CreationContext<'_>| -> Box<dyn eframe::App> {
            Box::new(InvoiceUploader::new(cfg))
        }),
    )
    .map_err(|e| format!("Failed to start the window: {e}"))?;

    Ok(())
}
