use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::database::models::conversion::ConversionRecord;

/// Raw filter input as typed by the user. Empty fields don't filter. Text fields match
/// exactly as typed, bounds ignore surrounding whitespace.
#[typeshare]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search: String,
    pub currency: String,
    pub date_from: String,
    pub date_to: String,
    pub amount_min: String,
    pub amount_max: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.currency.is_empty()
            && [
                &self.date_from,
                &self.date_to,
                &self.amount_min,
                &self.amount_max,
            ]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

/// A criterion after parsing. `Invalid` rejects every record.
#[derive(Debug, Clone, PartialEq)]
enum Bound<T> {
    Any,
    Value(T),
    Invalid,
}

impl<T: PartialOrd> Bound<T> {
    fn parse(raw: &str, parse: impl Fn(&str) -> Option<T>) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Bound::Any;
        }
        match parse(raw) {
            Some(value) => Bound::Value(value),
            None => Bound::Invalid,
        }
    }

    fn at_least(&self, candidate: &T) -> bool {
        match self {
            Bound::Any => true,
            Bound::Value(min) => candidate >= min,
            Bound::Invalid => false,
        }
    }

    fn at_most(&self, candidate: &T) -> bool {
        match self {
            Bound::Any => true,
            Bound::Value(max) => candidate <= max,
            Bound::Invalid => false,
        }
    }
}

fn parse_number(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// RFC 3339 instants, or bare dates taken as midnight UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

struct CompiledCriteria {
    search: Option<String>,
    currency: Option<String>,
    date_from: Bound<DateTime<Utc>>,
    date_to: Bound<DateTime<Utc>>,
    amount_min: Bound<Decimal>,
    amount_max: Bound<Decimal>,
}

impl CompiledCriteria {
    fn new(criteria: &FilterCriteria) -> Self {
        let non_empty = |raw: &str| Some(raw.to_string()).filter(|s| !s.is_empty());
        CompiledCriteria {
            search: non_empty(&criteria.search).map(|s| s.to_lowercase()),
            currency: non_empty(&criteria.currency),
            date_from: Bound::parse(&criteria.date_from, parse_instant),
            date_to: Bound::parse(&criteria.date_to, parse_instant),
            amount_min: Bound::parse(&criteria.amount_min, parse_number),
            amount_max: Bound::parse(&criteria.amount_max, parse_number),
        }
    }

    fn matches(&self, record: &ConversionRecord) -> bool {
        let search_match = self
            .search
            .as_ref()
            .map_or(true, |needle| record.search_text().to_lowercase().contains(needle));

        let currency_match = self
            .currency
            .as_ref()
            .map_or(true, |code| record.from == *code || record.to == *code);

        search_match
            && currency_match
            && self.date_from.at_least(&record.timestamp)
            && self.date_to.at_most(&record.timestamp)
            && self.amount_min.at_least(&record.amount)
            && self.amount_max.at_most(&record.amount)
    }
}

pub fn filter_history(
    records: &[ConversionRecord],
    criteria: &FilterCriteria,
) -> Vec<ConversionRecord> {
    if criteria.is_empty() {
        return records.to_vec();
    }
    let compiled = CompiledCriteria::new(criteria);
    records
        .iter()
        .filter(|record| compiled.matches(record))
        .cloned()
        .collect()
}
