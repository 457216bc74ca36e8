pub const HISTORY_KEY: &str = "exchangeHistory";
pub const HISTORY_CAPACITY: usize = 10;

pub const DEFAULT_RATES_API_URL: &str = "https://api.exchangerate-api.com/v4";
pub const DEFAULT_BASE_CURRENCY: &str = "USD";
pub const DEFAULT_FROM_CURRENCY: &str = "USD";
pub const DEFAULT_TO_CURRENCY: &str = "EUR";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_API_PORT: u16 = 8084;
