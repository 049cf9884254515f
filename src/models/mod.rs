mod history_window;
mod price_point;
mod stock;

pub use history_window::{HistoryWindow, Interval, Period};
pub use price_point::PricePoint;
pub use stock::{ErrorPayload, StockList, StockSeries};
