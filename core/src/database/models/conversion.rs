use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// One past conversion. Stored the way the browser widget stored it, so numbers stay
/// JSON numbers and the instant lives under `date`.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub from: String,
    pub to: String,
    #[typeshare(serialized_as = "number")]
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[typeshare(serialized_as = "number")]
    #[serde(with = "rust_decimal::serde::float")]
    pub result: Decimal,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl ConversionRecord {
    pub fn new(
        from: &str,
        to: &str,
        amount: Decimal,
        result: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        ConversionRecord {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            result,
            timestamp,
        }
    }

    /// `from + to + amount + result` with numbers in their plain decimal form.
    pub fn search_text(&self) -> String {
        format!(
            "{}{}{}{}",
            self.from,
            self.to,
            self.amount.normalize(),
            self.result.normalize()
        )
    }
}
