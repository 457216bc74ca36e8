use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::{
    database::{models::conversion::ConversionRecord, queries::history::HistoryStore, KeyValueStore},
    services::{
        conversion::{build_record, parse_amount},
        currency_picker::CurrencyPicker,
        errors::{ConversionError, RateError},
        history_filter::{filter_history, FilterCriteria},
        market_data::fx_rates::RateSource,
        rate_tracker::{RateState, RateTracker},
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Everything one converter screen owns: the rate for the selected pair, the known
/// currencies and the conversion history. History writes are serialized through one lock.
pub struct ConverterSession {
    rates: Arc<dyn RateSource>,
    history: AsyncMutex<HistoryStore>,
    tracker: Mutex<RateTracker>,
    currencies: Mutex<Vec<String>>,
}

#[derive(Debug)]
pub struct MountReport {
    pub currencies: Result<usize, RateError>,
    pub rate: RateState,
}

impl ConverterSession {
    pub fn new(
        rates: Arc<dyn RateSource>,
        storage: Arc<dyn KeyValueStore>,
        from: &str,
        to: &str,
    ) -> Self {
        ConverterSession {
            rates,
            history: AsyncMutex::new(HistoryStore::load(storage)),
            tracker: Mutex::new(RateTracker::new(from, to)),
            currencies: Mutex::new(vec![]),
        }
    }

    /// Fetches the currency list and the current rate side by side.
    pub async fn mount(&self) -> MountReport {
        let (currencies, rate) = tokio::join!(self.load_currencies(), self.refresh_rate());
        MountReport {
            currencies: currencies.map(|c| c.len()),
            rate,
        }
    }

    pub async fn load_currencies(&self) -> Result<Vec<String>, RateError> {
        let currencies = self.rates.list_currencies().await?;
        info!("Loaded {} currencies", currencies.len());
        *lock(&self.currencies) = currencies.clone();
        Ok(currencies)
    }

    pub fn currencies(&self) -> Vec<String> {
        lock(&self.currencies).clone()
    }

    pub fn picker(&self, selected: &str) -> CurrencyPicker {
        CurrencyPicker::new(self.currencies(), selected)
    }

    pub fn pair(&self) -> (String, String) {
        let tracker = lock(&self.tracker);
        let (from, to) = tracker.pair();
        (from.to_string(), to.to_string())
    }

    pub fn rate_state(&self) -> RateState {
        lock(&self.tracker).state().clone()
    }

    pub async fn refresh_rate(&self) -> RateState {
        let (from, to) = self.pair();
        self.select_pair(&from, &to).await
    }

    /// Returns the state after this request settles, which is a newer request's state
    /// if this one was overtaken.
    pub async fn select_pair(&self, from: &str, to: &str) -> RateState {
        let token = lock(&self.tracker).begin(from, to);
        let result = self.rates.get_rate(from, to).await;
        if let Err(e) = &result {
            warn!("Rate lookup {} -> {} failed: {}", from, to, e);
        }
        let mut tracker = lock(&self.tracker);
        tracker.complete(token, result);
        tracker.state().clone()
    }

    pub async fn convert(&self, amount: &str) -> Result<ConversionRecord, ConversionError> {
        let amount = parse_amount(amount)?;
        let (record, from, to) = {
            let tracker = lock(&self.tracker);
            let (from, to) = tracker.pair();
            let rate = tracker
                .current_rate()
                .ok_or_else(|| ConversionError::RateUnavailable {
                    from: from.to_string(),
                    to: to.to_string(),
                })?;
            (
                build_record(from, to, amount, rate, Utc::now())?,
                from.to_string(),
                to.to_string(),
            )
        };

        // storage trouble is logged by the store, the conversion still counts
        let _ = self.history.lock().await.append(record.clone());
        info!("Converted {} {} to {} {}", record.amount, from, record.result, to);
        Ok(record)
    }

    pub async fn history(&self, criteria: &FilterCriteria) -> Vec<ConversionRecord> {
        let history = self.history.lock().await;
        filter_history(history.records(), criteria)
    }

    pub async fn clear_history(&self) {
        let _ = self.history.lock().await.clear();
    }
}
