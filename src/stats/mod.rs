pub mod stats;
pub mod trendline;

pub use stats::*;
pub use trendline::*;
