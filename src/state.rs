use std::sync::Arc;

use crate::models::HistoryWindow;
use crate::services::stock_service::StockService;
use crate::services::symbol_catalog::SymbolCatalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SymbolCatalog>,
    pub stock_service: StockService,
    pub default_window: HistoryWindow,
}
