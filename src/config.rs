use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::external::yahoo;
use crate::models::{HistoryWindow, Interval, Period};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    Mock,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub provider: ProviderKind,
    pub yahoo_base_url: String,
    pub market_suffix: String,
    pub symbols_csv: Option<PathBuf>,
    pub default_window: HistoryWindow,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("HOST must be an IP address")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a number between 0 and 65535")?;

        let provider_name = lookup("PRICE_PROVIDER").unwrap_or_else(|| "yahoo".to_string());
        let provider = match provider_name.to_lowercase().as_str() {
            "yahoo" => ProviderKind::Yahoo,
            "mock" => ProviderKind::Mock,
            _ => bail!("Invalid PRICE_PROVIDER: {}. Must be 'yahoo' or 'mock'", provider_name),
        };

        let period: Period = lookup("DEFAULT_PERIOD")
            .unwrap_or_else(|| "1y".to_string())
            .parse()
            .map_err(anyhow::Error::msg)
            .context("Invalid DEFAULT_PERIOD")?;
        let interval: Interval = lookup("DEFAULT_INTERVAL")
            .unwrap_or_else(|| "1d".to_string())
            .parse()
            .map_err(anyhow::Error::msg)
            .context("Invalid DEFAULT_INTERVAL")?;

        Ok(Self {
            host,
            port,
            provider,
            yahoo_base_url: lookup("YAHOO_BASE_URL")
                .unwrap_or_else(|| yahoo::DEFAULT_BASE_URL.to_string()),
            market_suffix: lookup("MARKET_SUFFIX").unwrap_or_else(|| ".NS".to_string()),
            symbols_csv: lookup("SYMBOLS_CSV")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            default_window: HistoryWindow::new(period, interval),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
