use std::sync::Arc;
use tracing::{info, warn};

mod app;
mod color;
mod config;
mod error;
mod service;
mod state;
mod ui;

use app::PaletteExtractor;
use config::AppConfig;
use error::AppError;
use service::{ExtractionService, HttpExtractionService};
use state::preview::PreviewRegistry;

fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_max_level(config.max_level())
        .with_target(false)
        .init();
}

fn main() -> Result<(), AppError> {
    // Logging needs the configured level, so a config error is reported after init
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config);

    if let Some(e) = config_error {
        warn!(error = %e, "Using default configuration");
    }

    let http = HttpExtractionService::new(config.endpoint.clone())?;
    info!(
        endpoint = http.endpoint(),
        timeout_secs = config.request_timeout_secs,
        "Starting palette extractor"
    );

    let service: Arc<dyn ExtractionService> = Arc::new(http);
    let registry = PreviewRegistry::new();

    iced::application(
        "Color Palette Extractor",
        PaletteExtractor::update,
        PaletteExtractor::view,
    )
    .subscription(PaletteExtractor::subscription)
    .theme(PaletteExtractor::theme)
    .centered()
    .run_with(move || PaletteExtractor::boot(config, service, registry))?;

    Ok(())
}
