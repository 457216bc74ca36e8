use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    check_auth, clear_history, convert, currencies, history, pair, select_pair, AppState,
};

pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/currencies", get(currencies))
        .route("/pair", get(pair).put(select_pair))
        .route("/convert", post(convert))
        .route("/history", get(history).delete(clear_history))
        .layer(axum::middleware::from_fn_with_state(state.clone(), check_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        .nest("/api", routes)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        database::MemoryStore,
        services::{
            market_data::fx_rates::{RateClient, StaticRates},
            session::ConverterSession,
        },
    };

    async fn app(api_token: Option<&str>) -> Router {
        let rates = StaticRates::new()
            .with_rate("USD", "EUR", dec!(0.90))
            .with_rate("USD", "GBP", dec!(0.80))
            .with_rate("USD", "JPY", dec!(155));
        let session = Arc::new(ConverterSession::new(
            Arc::new(rates),
            Arc::new(MemoryStore::new()),
            "USD",
            "EUR",
        ));
        session.mount().await;
        create_router(AppState {
            session,
            api_token: api_token.map(str::to_string),
        })
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn convert_then_filter_then_clear() {
        let app = app(None).await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/convert", json!({"amount": "100"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let record = body_json(response).await;
        assert_eq!(record["from"], "USD");
        assert_eq!(record["amount"].as_f64(), Some(100.0));
        assert_eq!(record["result"].as_f64(), Some(90.0));

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/convert", json!({"amount": "20"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(get_request("/api/history?amountMin=50"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let filtered = body_json(response).await;
        assert_eq!(filtered.as_array().unwrap().len(), 1);
        assert_eq!(filtered[0]["amount"].as_f64(), Some(100.0));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get_request("/api/history")).await.unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn invalid_amount_is_unprocessable() {
        let app = app(None).await;
        let response = app
            .oneshot(json_request(Method::POST, "/api/convert", json!({"amount": "-3"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "invalid_amount");
    }

    #[tokio::test]
    async fn oversized_amount_is_unprocessable() {
        let app = app(None).await;
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/pair",
                json!({"from": "USD", "to": "JPY"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/convert",
                json!({"amount": "79228162514264337593543950335"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "amount_too_large");
    }

    #[tokio::test]
    async fn switching_pair_updates_rate() {
        let app = app(None).await;
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/pair",
                json!({"from": "USD", "to": "GBP"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let pair = body_json(response).await;
        assert_eq!(pair["to"], "GBP");
        assert_eq!(pair["rate"]["status"], "ready");

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/api/pair",
                json!({"from": "USD", "to": "XYZ"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_rate_is_a_gateway_error() {
        let app = app(None).await;
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/pair",
                json!({"from": "EUR", "to": "GBP"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["details"]["retryable"], false);

        let response = app
            .oneshot(json_request(Method::POST, "/api/convert", json!({"amount": "1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unreachable_rates_api_is_retryable() {
        // nothing listens on the discard port
        let session = Arc::new(ConverterSession::new(
            Arc::new(RateClient::new("http://127.0.0.1:9", "USD")),
            Arc::new(MemoryStore::new()),
            "USD",
            "EUR",
        ));
        let app = create_router(AppState {
            session,
            api_token: None,
        });

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/pair",
                json!({"from": "USD", "to": "EUR"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "rates_unavailable");
        assert_eq!(body["details"]["retryable"], true);

        let response = app.oneshot(get_request("/api/currencies")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn currencies_are_searchable() {
        let app = app(None).await;
        let response = app.oneshot(get_request("/api/currencies?search=u")).await.unwrap();
        assert_eq!(body_json(response).await, json!(["EUR", "USD"]));
    }

    #[tokio::test]
    async fn token_guards_the_api() {
        let app = app(Some("secret")).await;

        let response = app.clone().oneshot(get_request("/api/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/history")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
