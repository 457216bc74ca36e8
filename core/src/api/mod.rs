use std::{net::SocketAddr, sync::Arc};

use handlers::AppState;
use routes::create_router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::services::{session::ConverterSession, shared::env::Settings};

pub mod errors;
pub mod handlers;
pub mod routes;

pub async fn api(settings: &Settings, session: Arc<ConverterSession>) -> anyhow::Result<()> {
    let report = session.mount().await;
    match &report.currencies {
        Ok(count) => info!("{} currencies available", count),
        Err(e) => warn!("Currency list unavailable, will retry on request: {}", e),
    }

    let router = create_router(AppState {
        session,
        api_token: settings.api_token.clone(),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.api_port));
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    Ok(axum::serve(listener, router.into_make_service()).await?)
}
