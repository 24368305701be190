use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::telegram::NotifyError;

#[derive(Debug, Error)]
pub enum ContactError {
    /// Covers malformed bodies, schema failures and the honeypot alike, so a
    /// bot can't tell which check caught it.
    #[error("validation failed")]
    Validation,
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("lead delivery failed: {0}")]
    UpstreamDelivery(#[from] NotifyError),
    #[error("unexpected error: {0}")]
    Unknown(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ContactError {
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::Validation => "VALIDATION_ERROR",
            ContactError::RateLimited { .. } => "RATE_LIMITED",
            ContactError::UpstreamDelivery(_) => "TELEGRAM_ERROR",
            ContactError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::Validation => StatusCode::BAD_REQUEST,
            ContactError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ContactError::UpstreamDelivery(_) => StatusCode::BAD_GATEWAY,
            ContactError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the visitor. Never includes internal detail.
    pub fn user_message(&self) -> String {
        match self {
            ContactError::Validation => "Проверьте правильность заполнения формы.".to_string(),
            ContactError::RateLimited { retry_after_secs } => format!(
                "Слишком много запросов. Попробуйте снова через {} сек.",
                retry_after_secs
            ),
            ContactError::UpstreamDelivery(_) => {
                "Не удалось отправить заявку. Пожалуйста, попробуйте позже.".to_string()
            }
            ContactError::Unknown(_) => "Произошла ошибка. Попробуйте снова.".to_string(),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let retry_after = match &self {
            ContactError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let body = ErrorBody {
            success: false,
            error: self.code(),
            message: self.user_message(),
            retry_after,
        };

        let mut response = (self.status(), Json(body)).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
