use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

const SYMBOL_COLUMN: &str = "Symbol";

/// NIFTY 50 constituents, used when no catalog file is configured.
pub const NIFTY_50: [&str; 50] = [
    "ADANIENT", "ADANIPORTS", "APOLLOHOSP", "ASIANPAINT", "AXISBANK",
    "BAJAJ-AUTO", "BAJFINANCE", "BAJAJFINSV", "BEL", "BHARTIARTL",
    "CIPLA", "COALINDIA", "DRREDDY", "EICHERMOT", "ETERNAL",
    "GRASIM", "HCLTECH", "HDFCBANK", "HDFCLIFE", "HEROMOTOCO",
    "HINDALCO", "HINDUNILVR", "ICICIBANK", "INDUSINDBK", "INFY",
    "ITC", "JIOFIN", "JSWSTEEL", "KOTAKBANK", "LT",
    "M&M", "MARUTI", "NESTLEIND", "NTPC", "ONGC",
    "POWERGRID", "RELIANCE", "SBILIFE", "SBIN", "SHRIRAMFIN",
    "SUNPHARMA", "TATACONSUM", "TATAMOTORS", "TATASTEEL", "TCS",
    "TECHM", "TITAN", "TRENT", "ULTRACEMCO", "WIPRO",
];

/// Read-only list of tradable symbols, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: Vec<String>,
}

impl SymbolCatalog {
    pub fn builtin() -> Self {
        Self::from_symbols(NIFTY_50)
    }

    /// Unique symbols in first-seen order; blanks are dropped.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Self { symbols }
    }

    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open symbol catalog {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to load symbol catalog {}", path.display()))
    }

    /// Distinct values of the `Symbol` column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let column = rdr
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .position(|h| h == SYMBOL_COLUMN)
            .with_context(|| format!("CSV has no '{}' column", SYMBOL_COLUMN))?;

        let mut symbols = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to parse CSV row {}", idx + 2))?;
            if let Some(symbol) = record.get(column) {
                symbols.push(symbol.to_string());
            }
        }

        Ok(Self::from_symbols(symbols))
    }

    pub fn list(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}
