mod app;

use app::MyApp;
use chrono::Utc;
use recall::config::AppConfig;
use recall::database::{CardStore, MemoryStore, SqliteStore};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let config = AppConfig::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("recall v{} starting", env!("CARGO_PKG_VERSION"));

    let store = match SqliteStore::open(&config.database_path) {
        Ok(backend) => {
            tracing::info!(path = %config.database_path.display(), "database opened");
            CardStore::load(backend, Utc::now())
        }
        Err(e) => {
            // Progress made in this run will not survive a restart.
            tracing::error!(
                path = %config.database_path.display(),
                error = %e,
                "failed to open database, falling back to in-memory storage"
            );
            CardStore::load(MemoryStore::new(), Utc::now())
        }
    };

    for deck in &store.decks().decks {
        tracing::debug!(deck = %deck.name, cards = deck.cards.len(), "deck loaded");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    eframe::run_native(
        "Recall Flashcards",
        options,
        Box::new(|_cc| Ok(Box::new(MyApp::new(store)))),
    )
}
