use axum::body::Bytes;
use tracing::info;
use crate::{api::handlers::common::decode_json, ApiError, HelloRequest};

pub async fn hello(body: Bytes) -> Result<String, ApiError> {
    let request: HelloRequest = decode_json(&body)?;
    info!("Greeting {}", request.name);
    Ok(format!("Hello {}", request.name))
}
