mod error;
pub mod handlers;
mod types;
mod state;
pub use error::*;
pub use handlers::*;
pub use types::*;
pub use state::*;

use tokio::net::TcpListener;
use axum::{
    Router,
    routing::{get, post},
    http::Method,
    response::{IntoResponse, Response},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};
use std::sync::Arc;
use std::net::SocketAddr;
use tracing::info;
use anyhow::Result;
use std::time::Duration;

// Preflight cache lifetime
const CORS_MAX_AGE: Duration = Duration::from_secs(21600);

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(detail).into_response()
}

/// Panic catching sits inside CORS so even a crashed handler answers with
/// the JSON error body and the cross-origin headers.
pub(crate) fn with_layers(routes: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        // Core endpoints
        .route("/healtcheck", get(health_check).options(preflight))
        .route("/healthcheck", get(health_check).options(preflight))

        // Greeting and prediction endpoints
        .route("/hello", post(hello).options(preflight))
        .route("/LinearRegressionPredict", post(linear_regression_predict).options(preflight));

    with_layers(routes).with_state(state)
}

pub async fn serve(host: String, port: u16, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));

    // Create socket address
    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()?;

    // Create TCP listener
    let listener = TcpListener::bind(&addr).await?;

    info!("API server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
