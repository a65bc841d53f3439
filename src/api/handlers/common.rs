use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;
use crate::ApiError;

/// Decodes a JSON body regardless of its declared content type.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        ApiError::BadRequest(format!("Invalid request body: {}", e))
    })
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `1234.5` -> `$1,234.50`, `-0.126` -> `-$0.13`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

/// Bare `OPTIONS` requests; real preflights are answered by the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
