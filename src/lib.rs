pub mod api;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod model;
pub mod plot;
pub mod stats;

#[cfg(test)]
mod tests;

pub use api::{
    router, serve, Amount, ApiError, AppState, CountyCode, ErrorResponse, HealthResponse,
    HelloRequest, PredictRequest,
};
pub use config::*;
pub use constants::*;
pub use dataset::*;
pub use error::*;
pub use model::*;
pub use plot::*;
pub use stats::*;

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_target(false)
        .init();
}
