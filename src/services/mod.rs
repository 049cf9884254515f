pub mod stock_service;
pub mod symbol_catalog;
