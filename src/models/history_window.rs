use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How far back to look, in provider range notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        }
    }

    /// Calendar days covered by the period.
    pub fn days(&self) -> i64 {
        match self {
            Period::FiveDays => 5,
            Period::OneMonth => 30,
            Period::ThreeMonths => 91,
            Period::SixMonths => 182,
            Period::OneYear => 365,
            Period::TwoYears => 730,
            Period::FiveYears => 1826,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5d" => Ok(Period::FiveDays),
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            other => Err(format!(
                "Invalid period '{}'. Must be one of: 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y",
                other
            )),
        }
    }
}

/// Spacing between consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Interval::Daily),
            "1wk" => Ok(Interval::Weekly),
            "1mo" => Ok(Interval::Monthly),
            other => Err(format!(
                "Invalid interval '{}'. Must be one of: 1d, 1wk, 1mo",
                other
            )),
        }
    }
}

/// The (period, interval) pair bounding one history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    pub period: Period,
    pub interval: Interval,
}

impl HistoryWindow {
    pub fn new(period: Period, interval: Interval) -> Self {
        Self { period, interval }
    }

    /// Parse a window from optional query values, falling back to `default`
    /// for whichever half is missing.
    pub fn from_parts(
        period: Option<&str>,
        interval: Option<&str>,
        default: HistoryWindow,
    ) -> Result<Self, String> {
        let period = match period {
            Some(p) => p.parse()?,
            None => default.period,
        };
        let interval = match interval {
            Some(i) => i.parse()?,
            None => default.interval,
        };
        Ok(Self { period, interval })
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(Period::OneYear, Interval::Daily)
    }
}

impl fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.period.as_str(), self.interval.as_str())
    }
}
