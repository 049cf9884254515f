use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use crate::models::HistoryWindow;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart API. No API key required; NSE tickers use the `.NS`
/// suffix (`RELIANCE.NS`).
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooProvider {
    pub fn new(base_url: &str) -> Result<Self, PriceProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PriceProviderError::BadResponse(format!("invalid base url {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PriceProviderError::BadResponse(format!("invalid base url {}", base_url)));
        }

        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; NiftyChart/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
        })
    }

    // Tickers such as `M&M.NS` must be encoded as a single path segment.
    fn chart_url(&self, ticker: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&["v8", "finance", "chart", ticker]);
        }
        url
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: YahooMeta,
    // Absent when the range holds no trading sessions.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct YahooMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Turn a chart API body into closes in exchange-local calendar dates.
fn parse_chart(body: YahooChartResponse) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.code == "Not Found" || error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let Some(result) = body.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(Vec::new());
    };

    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };

    if quote.close.len() != result.timestamp.len() {
        return Err(PriceProviderError::Parse(
            "Timestamp and close price arrays have different lengths".into(),
        ));
    }

    let offset = result.meta.gmtoffset;
    let mut out = Vec::with_capacity(result.timestamp.len());

    for (ts, close) in result.timestamp.iter().zip(quote.close.iter()) {
        // Skip null values (market holidays, half-formed live bars)
        let Some(close) = *close else { continue };

        let date = ts
            .checked_add(offset)
            .and_then(|local| chrono::DateTime::from_timestamp(local, 0))
            .ok_or_else(|| PriceProviderError::Parse(format!("bad timestamp {}", ts)))?
            .date_naive();

        out.push(ExternalPricePoint { date, close });
    }

    Ok(out)
}

#[async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        window: &HistoryWindow,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let url = self.chart_url(ticker);
        debug!("Requesting {} for window {}", url, window);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("range", window.period.as_str()),
                ("interval", window.interval.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body = resp
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_chart(body)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
