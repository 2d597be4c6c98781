use std::{error, fmt, sync::Arc};

use measurement::store::StoreError;

pub mod client;
mod store;

pub use client::{ApiConfig, GeoMeasurementsClient};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        message: Option<String>,
    },
}

impl ApiError {
    pub fn status_code(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::RequestError(why) => why.status(),
            Self::InvalidResponse { status_code, .. } => Some(*status_code),
            Self::JsonError(_) => None,
        }
    }
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                message,
            } => match message {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<ApiError> for StoreError {
    fn from(why: ApiError) -> Self {
        match why.status_code() {
            Some(reqwest::StatusCode::NOT_FOUND) => StoreError::NotFound,
            Some(reqwest::StatusCode::BAD_REQUEST) => match why {
                ApiError::InvalidResponse {
                    message: Some(message),
                    ..
                } => StoreError::Invalid(message),
                other => StoreError::Invalid(other.to_string()),
            },
            _ => StoreError::other(why),
        }
    }
}
