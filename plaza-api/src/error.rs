use axum::{
    extract::rejection::JsonRejection,
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use plaza_core::StoreError;
use serde_json::json;

/// `Json` with its rejection routed through [`AppError`], so a malformed
/// request body comes back as 400 with the usual `{"error": ...}` shape
/// instead of axum's default 422.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Store(StoreError::Invalid(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(StoreError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            AppError::Store(err @ StoreError::OutOfStock { .. }) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            AppError::Store(err @ StoreError::AlreadyCanceled(_)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            AppError::Store(StoreError::Invalid(msg)) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(StoreError::Backend(err)) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
