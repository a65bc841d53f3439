use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct HelloRequest {
    pub name: String,
}

/// FIPS county code, sent either as `"121"` or `121`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountyCode {
    Number(f64),
    Text(String),
}

impl CountyCode {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CountyCode::Number(n) => Some(*n).filter(|n| n.is_finite()),
            CountyCode::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for CountyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountyCode::Number(n) => write!(f, "{}", n),
            CountyCode::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Currency-like amount; numeric strings are tolerated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Amount::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub county: CountyCode,
    pub percapita: Amount,
}
