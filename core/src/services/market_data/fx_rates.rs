use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::services::errors::RateError;

#[derive(Deserialize, Debug)]
pub struct LatestRatesResponse {
    pub rates: HashMap<String, Decimal>,
}

impl LatestRatesResponse {
    pub fn currencies(&self) -> Vec<String> {
        let mut currencies: Vec<String> = self.rates.keys().cloned().collect();
        currencies.sort();
        currencies
    }

    pub fn rate_for(&self, from: &str, to: &str) -> Result<Decimal, RateError> {
        self.rates
            .get(to)
            .copied()
            .ok_or_else(|| RateError::UnknownCurrency {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn list_currencies(&self) -> Result<Vec<String>, RateError>;
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal, RateError>;
}

/// Talks to an exchangerate-api.com style `/latest/{CODE}` endpoint.
#[derive(Debug, Clone)]
pub struct RateClient {
    client: Client,
    api_url: String,
    base_currency: String,
}

impl RateClient {
    pub fn new(api_url: &str, base_currency: &str) -> Self {
        RateClient {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            base_currency: base_currency.to_string(),
        }
    }

    pub fn latest_url(&self, currency: &str) -> String {
        format!("{}/latest/{}", self.api_url, currency)
    }

    async fn fetch_latest(&self, currency: &str) -> Result<LatestRatesResponse, RateError> {
        let url = self.latest_url(currency);
        debug!("GET {}", url);
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        serde_json::from_str::<LatestRatesResponse>(&body).map_err(|e| RateError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RateSource for RateClient {
    async fn list_currencies(&self) -> Result<Vec<String>, RateError> {
        let latest = self.fetch_latest(&self.base_currency).await?;
        Ok(latest.currencies())
    }

    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal, RateError> {
        let latest = self.fetch_latest(from).await?;
        latest.rate_for(from, to)
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    rates: HashMap<(String, String), Decimal>,
    currencies: Vec<String>,
}

#[cfg(test)]
impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        for code in [from, to] {
            if !self.currencies.iter().any(|c| c == code) {
                self.currencies.push(code.to_string());
                self.currencies.sort();
            }
        }
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }
}

#[cfg(test)]
#[async_trait]
impl RateSource for StaticRates {
    async fn list_currencies(&self) -> Result<Vec<String>, RateError> {
        Ok(self.currencies.clone())
    }

    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal, RateError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| RateError::UnknownCurrency {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}
