use std::sync::Arc;

use axum::{
    extract::{Json, Query, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::services::{
    history_filter::FilterCriteria, rate_tracker::RateState, session::ConverterSession,
};

use super::errors::ErrorResponse;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ConverterSession>,
    pub api_token: Option<String>,
}

fn json_response<T: serde::Serialize>(
    data: &T,
) -> Result<(StatusCode, HeaderMap, String), ErrorResponse> {
    let data = serde_json::to_string(data).map_err(|e| {
        ErrorResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "encoding_failed",
            &e.to_string(),
            None,
        )
    })?;
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    Ok((StatusCode::OK, headers, data))
}

pub async fn check_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = &state.api_token else {
        return Ok(next.run(request).await);
    };

    if let Some(auth_header) = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
    {
        if auth_header.strip_prefix("Bearer ") == Some(token.as_str()) {
            return Ok(next.run(request).await);
        }
    }

    Err(StatusCode::UNAUTHORIZED)
}

#[derive(Debug, Deserialize)]
pub struct CurrenciesQuery {
    pub search: Option<String>,
}

pub async fn currencies(
    State(state): State<AppState>,
    Query(query): Query<CurrenciesQuery>,
) -> Result<impl IntoResponse, ErrorResponse> {
    if state.session.currencies().is_empty() {
        state.session.load_currencies().await?;
    }
    let mut picker = state.session.picker("");
    if let Some(search) = query.search {
        picker.set_query(&search);
    }
    json_response(&picker.options())
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize)]
pub struct PairRequest {
    pub from: String,
    pub to: String,
}

#[typeshare]
#[derive(Debug, Serialize)]
pub struct PairResponse {
    pub from: String,
    pub to: String,
    pub rate: RateState,
}

fn pair_response(session: &ConverterSession) -> PairResponse {
    let (from, to) = session.pair();
    PairResponse {
        from,
        to,
        rate: session.rate_state(),
    }
}

pub async fn pair(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    json_response(&pair_response(&state.session))
}

pub async fn select_pair(
    State(state): State<AppState>,
    Json(payload): Json<PairRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let session = &state.session;
    if !session.currencies().is_empty() {
        let mut from_picker = session.picker(&payload.from);
        let mut to_picker = session.picker(&payload.to);
        from_picker.select(&payload.from)?;
        to_picker.select(&payload.to)?;
    }

    if let RateState::Failed { message, retryable } =
        session.select_pair(&payload.from, &payload.to).await
    {
        return Err(ErrorResponse::rate_failed(&message, retryable));
    }
    json_response(&pair_response(session))
}

#[typeshare]
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub amount: String,
}

pub async fn convert(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let record = state.session.convert(&payload.amount).await?;
    let (_, headers, body) = json_response(&record)?;
    Ok((StatusCode::CREATED, headers, body))
}

pub async fn history(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let records = state.session.history(&criteria).await;
    json_response(&records)
}

pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    state.session.clear_history().await;
    StatusCode::NO_CONTENT
}
