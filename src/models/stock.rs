use serde::{Deserialize, Serialize};

use super::PricePoint;

/// Closing prices for one symbol over one window, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSeries {
    pub symbol: String,
    pub data: Vec<PricePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockList {
    pub stocks: Vec<String>,
}

/// Body of every failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
