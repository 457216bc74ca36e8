use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{database::models::conversion::ConversionRecord, services::errors::ConversionError};

pub fn convert(amount: Decimal, rate: Decimal) -> Result<Decimal, ConversionError> {
    amount
        .checked_mul(rate)
        .ok_or_else(|| ConversionError::Overflow {
            amount: amount.to_string(),
            rate: rate.to_string(),
        })
}

/// Only strictly positive decimals are convertible.
pub fn parse_amount(input: &str) -> Result<Decimal, ConversionError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ConversionError::InvalidAmount(input.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(ConversionError::InvalidAmount(input.to_string()));
    }
    Ok(amount)
}

pub fn build_record(
    from: &str,
    to: &str,
    amount: Decimal,
    rate: Decimal,
    timestamp: DateTime<Utc>,
) -> Result<ConversionRecord, ConversionError> {
    let result = convert(amount, rate)?;
    Ok(ConversionRecord::new(from, to, amount, result, timestamp))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::services::shared::round_to_decimals;

    #[test]
    fn converts_usd_to_eur() {
        let amount = parse_amount("100").unwrap();
        let result = convert(amount, dec!(0.90)).unwrap();
        assert_eq!(round_to_decimals(result).to_string(), "90.00");

        let record = build_record("USD", "EUR", amount, dec!(0.90), Utc::now()).unwrap();
        assert_eq!(record.amount, dec!(100));
        assert_eq!(record.result, dec!(90));
    }

    #[test]
    fn accepts_padded_and_fractional_amounts() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), dec!(12.5));
        assert_eq!(parse_amount("1e3").unwrap(), dec!(1000));
    }

    #[test]
    fn rejects_non_positive_or_garbage_amounts() {
        for input in ["0", "-5", "abc", "", "  ", "12,5"] {
            assert_eq!(
                parse_amount(input),
                Err(ConversionError::InvalidAmount(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn oversized_products_are_rejected() {
        for input in ["79228162514264337593543950335", "1e28"] {
            let amount = parse_amount(input).unwrap();
            assert!(matches!(
                convert(amount, dec!(155)),
                Err(ConversionError::Overflow { .. })
            ));
            assert!(build_record("USD", "JPY", amount, dec!(155), Utc::now()).is_err());
        }
    }
}
