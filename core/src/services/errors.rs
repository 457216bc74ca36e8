use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("Couldn't reach the exchange rate API: {0}")]
    Network(String),

    #[error("Couldn't read the exchange rate API response: {0}")]
    Parse(String),

    #[error("No exchange rate from {from} to {to}")]
    UnknownCurrency { from: String, to: String },
}

impl RateError {
    /// Network failures are worth retrying; the others will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RateError::Network(_))
    }
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RateError::Parse(err.to_string())
        } else {
            RateError::Network(err.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("'{0}' is not a valid amount, enter a number greater than zero")]
    InvalidAmount(String),

    #[error("{amount} at a rate of {rate} is too large to convert")]
    Overflow { amount: String, rate: String },

    #[error("No exchange rate available for {from} to {to} yet")]
    RateUnavailable { from: String, to: String },

    #[error("Unknown currency '{0}'")]
    UnknownCurrency(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Couldn't encode history: {0}")]
    Serialize(#[from] serde_json::Error),
}
