use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::HistoryWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

/// Source of daily (or coarser) closing prices for a provider-format ticker,
/// e.g. `RELIANCE.NS`.
///
/// An unknown ticker may surface either as `Ok(vec![])` or as
/// `Err(PriceProviderError::NotFound)`; callers treat both as "no data".
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_history(
        &self,
        ticker: &str,
        window: &HistoryWindow,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError>;

    fn name(&self) -> &'static str;
}
