use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One closing price, serialized the way the chart page reads it:
// {"Date": "YYYY-MM-DD", "Close": 2931.5}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_chart_field_names() {
        let point = PricePoint::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 2931.5);
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json, serde_json::json!({"Date": "2024-03-05", "Close": 2931.5}));
    }

    #[test]
    fn test_json_round_trip_keeps_date_and_close() {
        let point = PricePoint::new(NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(), 1234.0499877929688);
        let text = serde_json::to_string(&point).unwrap();
        let back: PricePoint = serde_json::from_str(&text).unwrap();

        assert_eq!(back.date, point.date);
        assert!((back.close - point.close).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_iso_date() {
        let result = serde_json::from_str::<PricePoint>(r#"{"Date": "05/03/2024", "Close": 1.0}"#);
        assert!(result.is_err());
    }
}
