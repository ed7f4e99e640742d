use crate::api::ErrorResponse;
use crate::validation::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Handler error carrying a core error to the HTTP boundary
#[derive(Debug)]
pub struct ApiError(pub shared::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            shared::Error::NotFound => StatusCode::NOT_FOUND,
            shared::Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            shared::Error::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError(shared::Error::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(shared::Error::Validation("bad".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError(shared::Error::QueueClosed).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(shared::Error::Storage("disk".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
