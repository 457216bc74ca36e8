pub mod conversion;
pub mod currency_picker;
pub mod errors;
pub mod history_filter;
pub mod market_data;
pub mod rate_tracker;
pub mod session;
pub mod shared;
