// Submodules
pub mod common;  // Request decoding and response formatting
pub mod health;  // Health check endpoint
pub mod hello;
pub mod predict;

// Re-exports
pub use common::preflight;
pub use health::health_check;
pub use hello::hello;
pub use predict::linear_regression_predict;
