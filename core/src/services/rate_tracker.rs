use rust_decimal::Decimal;
use serde::Serialize;
use typeshare::typeshare;

use crate::services::errors::RateError;

#[typeshare]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum RateState {
    Idle,
    Loading,
    Ready(Decimal),
    Failed { message: String, retryable: bool },
}

/// Identifies one rate request. Only the latest one may update the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Clone)]
pub struct RateTracker {
    from: String,
    to: String,
    latest: u64,
    state: RateState,
}

impl RateTracker {
    pub fn new(from: &str, to: &str) -> Self {
        RateTracker {
            from: from.to_string(),
            to: to.to_string(),
            latest: 0,
            state: RateState::Idle,
        }
    }

    pub fn pair(&self) -> (&str, &str) {
        (&self.from, &self.to)
    }

    pub fn state(&self) -> &RateState {
        &self.state
    }

    pub fn current_rate(&self) -> Option<Decimal> {
        match self.state {
            RateState::Ready(rate) => Some(rate),
            _ => None,
        }
    }

    /// Switches to a new pair and supersedes every request still in flight.
    pub fn begin(&mut self, from: &str, to: &str) -> RequestToken {
        self.from = from.to_string();
        self.to = to.to_string();
        self.latest += 1;
        self.state = RateState::Loading;
        RequestToken(self.latest)
    }

    /// Returns false when `token` was superseded; the response is dropped.
    pub fn complete(&mut self, token: RequestToken, result: Result<Decimal, RateError>) -> bool {
        if token.0 != self.latest {
            tracing::debug!(
                "Dropping stale rate response #{} (latest is #{})",
                token.0,
                self.latest
            );
            return false;
        }
        self.state = match result {
            Ok(rate) => RateState::Ready(rate),
            Err(e) => RateState::Failed {
                message: e.to_string(),
                retryable: e.is_retryable(),
            },
        };
        true
    }
}
