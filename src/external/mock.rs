use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use crate::models::{HistoryWindow, Interval};

/// Offline provider producing a deterministic random walk per ticker.
///
/// Only tickers it was built with have data; anything else comes back empty,
/// the same way an unknown symbol does upstream.
pub struct MockProvider {
    known: HashSet<String>,
}

impl MockProvider {
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: tickers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn generate(&self, ticker: &str, window: &HistoryWindow, today: NaiveDate) -> Vec<ExternalPricePoint> {
        if !self.known.contains(ticker) {
            return Vec::new();
        }

        let seed = ticker
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut current = 100.0 + (seed % 2900) as f64;

        let start = today - Duration::days(window.period.days() - 1);
        let mut points: Vec<ExternalPricePoint> = Vec::new();
        let mut date = start;

        while date <= today {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                current *= 1.0 + (rng.random::<f64>() - 0.5) * 0.02;
                let close = (current * 100.0).round() / 100.0;

                // Coarser intervals keep the last session of each bucket.
                let same_bucket = points.last().is_some_and(|last| match window.interval {
                    Interval::Daily => false,
                    Interval::Weekly => last.date.iso_week() == date.iso_week(),
                    Interval::Monthly => last.date.year() == date.year() && last.date.month() == date.month(),
                });
                if same_bucket {
                    points.pop();
                }
                points.push(ExternalPricePoint { date, close });
            }
            date += Duration::days(1);
        }

        points
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        window: &HistoryWindow,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        Ok(self.generate(ticker, window, Utc::now().date_naive()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    }

    #[test]
    fn test_unknown_ticker_is_empty() {
        let provider = MockProvider::new(["RELIANCE.NS"]);
        let points = provider.generate("NOTAREALSYMBOL.NS", &HistoryWindow::default(), today());
        assert!(points.is_empty());
    }

    #[test]
    fn test_one_month_daily_has_only_trading_days() {
        let provider = MockProvider::new(["RELIANCE.NS"]);
        let window = HistoryWindow::new(Period::OneMonth, Interval::Daily);
        let points = provider.generate("RELIANCE.NS", &window, today());

        assert!(!points.is_empty());
        assert!(points.len() <= 22);
        assert!(points
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(points.iter().all(|p| p.close > 0.0));
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_same_ticker_is_deterministic() {
        let provider = MockProvider::new(["TCS.NS", "INFY.NS"]);
        let window = HistoryWindow::default();

        let a = provider.generate("TCS.NS", &window, today());
        let b = provider.generate("TCS.NS", &window, today());
        let c = provider.generate("INFY.NS", &window, today());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_weekly_interval_has_one_point_per_week() {
        let provider = MockProvider::new(["TCS.NS"]);
        let window = HistoryWindow::new(Period::ThreeMonths, Interval::Weekly);
        let points = provider.generate("TCS.NS", &window, today());

        assert!(points.len() <= 14);
        assert!(points
            .windows(2)
            .all(|w| w[0].date.iso_week() != w[1].date.iso_week()));
    }
}
