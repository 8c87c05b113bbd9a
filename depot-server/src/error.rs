use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use content_store::StoreError;
use thiserror::Error;

/// Request-level failure carrying its HTTP mapping. The body is always the
/// human-readable reason, mirroring how the store reports context (offending
/// name, digest or parameter).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::AlreadyExists { .. }) => {
                StatusCode::CONFLICT
            }
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidArgument(_))
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = self.to_string();
        if status.is_server_error() {
            log::error!("{status}: {reason}");
        } else {
            log::warn!("{status}: {reason}");
        }
        (status, reason).into_response()
    }
}

#[cfg(test)]
mod tests {
    use data_digest::ContentDigest;

    use super::*;

    #[test]
    fn store_errors_map_to_expected_statuses() {
        let conflict = ApiError::Store(StoreError::AlreadyExists {
            name: "a.txt".to_owned(),
            digest: ContentDigest::from_bytes(b"a"),
        });
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let missing =
            ApiError::Store(StoreError::NotFound("no file".to_owned()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::Store(StoreError::InvalidArgument(
            "bad order".to_owned(),
        ));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let internal =
            ApiError::Store(StoreError::Database("disk on fire".to_owned()));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let malformed = ApiError::BadRequest("no files".to_owned());
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    }
}
