use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{HistoryWindow, StockList, StockSeries};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stock/:symbol", get(get_stock))
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
}

pub async fn list_stocks(State(state): State<AppState>) -> Json<StockList> {
    info!("GET /stocks - Listing {} symbols", state.catalog.len());
    Json(StockList {
        stocks: state.catalog.list().to_vec(),
    })
}

// Extractor rejections are reported as `{"error"}` like every other failure.
pub async fn get_stock(
    symbol: Result<Path<String>, PathRejection>,
    query: Result<Query<WindowQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<StockSeries>, AppError> {
    let Path(symbol) = symbol.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let window = HistoryWindow::from_parts(
        query.period.as_deref(),
        query.interval.as_deref(),
        state.default_window,
    )?;
    info!("GET /stock/{} - Getting {} history", symbol, window);

    if is_off_catalog(&state, &symbol) {
        warn!("Symbol {} is not in the catalog, forwarding anyway", symbol);
    }

    let series = state
        .stock_service
        .get_series(&symbol, &window)
        .await
        .map_err(|e| {
            match &e {
                AppError::NoData | AppError::Validation(_) => {}
                AppError::RateLimited => warn!("Rate limited when fetching {}", symbol),
                _ => error!("Failed to get history for {}: {}", symbol, e),
            }
            e
        })?;
    Ok(Json(series))
}

/// Compares the bare symbol, so `TCS.NS` counts as the catalog's `TCS`.
fn is_off_catalog(state: &AppState, symbol: &str) -> bool {
    match state.stock_service.normalize(symbol) {
        Ok((bare, _)) => !state.catalog.contains(&bare),
        Err(_) => false,
    }
}
