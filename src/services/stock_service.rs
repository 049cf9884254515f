use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use crate::models::{HistoryWindow, PricePoint, StockSeries};

/// Fetches closing-price history for a symbol and shapes it for the chart.
#[derive(Clone)]
pub struct StockService {
    provider: Arc<dyn PriceProvider>,
    market_suffix: String,
}

impl StockService {
    pub fn new(provider: Arc<dyn PriceProvider>, market_suffix: impl Into<String>) -> Self {
        Self {
            provider,
            market_suffix: market_suffix.into().to_uppercase(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Returns `(symbol, provider_ticker)`, e.g. `("RELIANCE", "RELIANCE.NS")`.
    pub fn normalize(&self, symbol: &str) -> Result<(String, String), AppError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AppError::Validation("Symbol must not be empty".to_string()));
        }

        if let Some(bare) = symbol
            .strip_suffix(self.market_suffix.as_str())
            .filter(|bare| !bare.is_empty())
            .map(str::to_string)
        {
            return Ok((bare, symbol));
        }

        let ticker = format!("{}{}", symbol, self.market_suffix);
        Ok((symbol, ticker))
    }

    /// One provider call, no retry. Empty results are `AppError::NoData`,
    /// never an empty series.
    pub async fn get_series(&self, symbol: &str, window: &HistoryWindow) -> Result<StockSeries, AppError> {
        let (symbol, ticker) = self.normalize(symbol)?;

        let external = match self.provider.fetch_history(&ticker, window).await {
            Ok(points) => points,
            Err(PriceProviderError::NotFound) => Vec::new(),
            Err(e) => {
                error!("✗ Failed to fetch {} ({}) from {}: {}", symbol, window, self.provider.name(), e);
                return Err(e.into());
            }
        };

        let data = shape(external);
        if data.is_empty() {
            warn!("No data available for {} ({})", ticker, window);
            return Err(AppError::NoData);
        }

        info!("✓ Fetched {} points for {} ({})", data.len(), ticker, window);
        Ok(StockSeries { symbol, data })
    }
}

/// Ascending by date with one point per date; a repeated date keeps the
/// value reported last.
fn shape(mut points: Vec<ExternalPricePoint>) -> Vec<PricePoint> {
    points.retain(|p| p.close.is_finite());
    // Stable sort keeps provider order within a date.
    points.sort_by_key(|p| p.date);

    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for p in points {
        match out.last_mut() {
            Some(last) if last.date == p.date => last.close = p.close,
            _ => out.push(PricePoint::new(p.date, p.close)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    enum Reply {
        Points(Vec<ExternalPricePoint>),
        NotFound,
        Network,
    }

    struct StubProvider {
        reply: Reply,
        requested: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self { reply, requested: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl PriceProvider for StubProvider {
        async fn fetch_history(
            &self,
            ticker: &str,
            _window: &HistoryWindow,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            self.requested.lock().unwrap().push(ticker.to_string());
            match &self.reply {
                Reply::Points(points) => Ok(points.clone()),
                Reply::NotFound => Err(PriceProviderError::NotFound),
                Reply::Network => Err(PriceProviderError::Network("connection refused".into())),
            }
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn point(day: u32, close: f64) -> ExternalPricePoint {
        ExternalPricePoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            close,
        }
    }

    #[test]
    fn test_normalize_appends_suffix() {
        let service = StockService::new(StubProvider::new(Reply::NotFound), ".NS");

        let (symbol, ticker) = service.normalize(" reliance ").unwrap();
        assert_eq!(symbol, "RELIANCE");
        assert_eq!(ticker, "RELIANCE.NS");
    }

    #[test]
    fn test_normalize_keeps_existing_suffix() {
        let service = StockService::new(StubProvider::new(Reply::NotFound), ".ns");

        let (symbol, ticker) = service.normalize("TCS.NS").unwrap();
        assert_eq!(symbol, "TCS");
        assert_eq!(ticker, "TCS.NS");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        let service = StockService::new(StubProvider::new(Reply::NotFound), ".NS");
        assert!(matches!(service.normalize("   "), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_series_sorts_and_dedups_dates() {
        let provider = StubProvider::new(Reply::Points(vec![
            point(6, 103.0),
            point(4, 101.0),
            point(5, 102.0),
            point(6, 104.0),
        ]));
        let service = StockService::new(provider.clone(), ".NS");

        let series = service.get_series("infy", &HistoryWindow::default()).await.unwrap();

        assert_eq!(series.symbol, "INFY");
        let closes: Vec<f64> = series.data.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![101.0, 102.0, 104.0]);
        assert!(series.data.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(*provider.requested.lock().unwrap(), vec!["INFY.NS".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_result_is_no_data() {
        let service = StockService::new(StubProvider::new(Reply::Points(vec![])), ".NS");
        let result = service.get_series("NOTAREALSYMBOL", &HistoryWindow::default()).await;
        assert!(matches!(result, Err(AppError::NoData)));
    }

    #[tokio::test]
    async fn test_provider_not_found_is_no_data() {
        let service = StockService::new(StubProvider::new(Reply::NotFound), ".NS");
        let result = service.get_series("NOTAREALSYMBOL", &HistoryWindow::default()).await;
        assert!(matches!(result, Err(AppError::NoData)));
    }

    #[tokio::test]
    async fn test_provider_failure_carries_message() {
        let provider = StubProvider::new(Reply::Network);
        let service = StockService::new(provider.clone(), ".NS");

        let err = service.get_series("TCS", &HistoryWindow::default()).await.unwrap_err();

        assert_eq!(err.to_string(), "network error: connection refused");
        assert_eq!(provider.requested.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_shape_drops_non_finite_closes() {
        let shaped = shape(vec![point(4, f64::NAN), point(5, 10.0)]);
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].close, 10.0);
    }
}
