use {
    crate::domain::error::ServiceError,
    axum::{
        Json,
        extract::rejection::JsonRejection,
        http::{HeaderValue, StatusCode, header::RETRY_AFTER},
        response::{IntoResponse, Response},
    },
    std::any::Any,
};

/// HTTP face of `ServiceError`. Every failure leaves the server in the same
/// `{success, error_code, message}` shape.
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::Validation(rejection.body_text()))
    }
}

pub fn error_response(status: StatusCode, error_code: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error_code": error_code,
        "message": message,
    });

    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            ServiceError::Validation(msg) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            ServiceError::NotFound { .. } => {
                error_response(StatusCode::NOT_FOUND, "not_found", &self.0.to_string())
            }
            ServiceError::RateLimitExceeded { retry_after_secs } => {
                let mut response = error_response(
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    "Too many requests, please try again later.",
                );
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(*retry_after_secs));
                response
            }
            ServiceError::Corrupt { .. } => {
                tracing::error!("{}", self.0);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error",
                )
            }
            ServiceError::Database(err) => {
                tracing::error!("database error: {err}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error",
                )
            }
            ServiceError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error",
                )
            }
        }
    }
}

/// Fallback for paths no collaborator claims.
pub async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not_found", "route not found")
}

/// Turns a handler panic into the generic 500; the panic text is only logged.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = %detail, "request handler panicked");

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}
