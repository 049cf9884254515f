mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ProviderKind};
use crate::external::mock::MockProvider;
use crate::external::price_provider::PriceProvider;
use crate::external::yahoo::YahooProvider;
use crate::logging::LoggingConfig;
use crate::services::stock_service::StockService;
use crate::services::symbol_catalog::SymbolCatalog;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(&LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let catalog = match &config.symbols_csv {
        Some(path) => {
            let catalog = SymbolCatalog::from_csv(path)?;
            tracing::info!("📄 Loaded {} symbols from {}", catalog.len(), path.display());
            catalog
        }
        None => {
            tracing::info!("📄 No SYMBOLS_CSV set, using built-in NIFTY 50 list");
            SymbolCatalog::builtin()
        }
    };

    let provider: Arc<dyn PriceProvider> = match config.provider {
        ProviderKind::Yahoo => Arc::new(
            YahooProvider::new(&config.yahoo_base_url)
                .context("Failed to create YahooProvider (check YAHOO_BASE_URL)")?,
        ),
        ProviderKind::Mock => Arc::new(MockProvider::new(
            catalog
                .list()
                .iter()
                .map(|s| format!("{}{}", s, config.market_suffix).to_uppercase()),
        )),
    };

    let stock_service = StockService::new(provider, config.market_suffix.clone());
    tracing::info!(
        "📊 Using price provider: {} (suffix {}, default window {})",
        stock_service.provider_name(),
        config.market_suffix,
        config.default_window
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        stock_service,
        default_window: config.default_window,
    };
    let app = app::create_app(state);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 NIFTY chart backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
