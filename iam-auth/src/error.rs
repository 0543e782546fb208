use salvo::http::StatusCode;
use salvo::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Why the signature-based authentication protocol rejected a request.
/// Never surfaced to the client beyond this coarse label — the
/// propagation policy forbids distinguishing which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailureReason {
    InvalidHeaders,
    InvalidHost,
    InvalidSignature,
    UserNotFound,
}

/// The error taxonomy shared by the storage layer, the auth
/// pipeline, and the HTTP handlers. Storage errors propagate verbatim;
/// `NotFound("user", _)` raised while resolving credentials is remapped to
/// `AuthenticationFailed(UserNotFound)` before it reaches a handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    #[error("already exists")]
    AlreadyExists,

    #[error("authentication failed")]
    AuthenticationFailed(AuthFailureReason),

    #[error("not authorized")]
    NotAuthorized,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &'static str, identifier: impl Into<String>) -> Self {
        AppError::NotFound(kind, identifier.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_, _) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists => StatusCode::CONFLICT,
            AppError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::NotAuthorized => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `<kind>` in the `{ "error": <kind>, "message": <string> }` body.
    /// Never includes the entity identifier or which auth check failed.
    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_, _) => "not_found",
            AppError::AlreadyExists => "already_exists",
            AppError::AuthenticationFailed(_) => "authentication_failed",
            AppError::NotAuthorized => "not_authorized",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// The user-visible message. Authentication failures collapse to a
    /// single sentence regardless of `AuthFailureReason` so the response
    /// never reveals which check failed; `NotFound` never echoes the
    /// offending entity kind or identifier either, to avoid existence
    /// side-channels for resources gated behind authorization.
    fn message(&self) -> String {
        match self {
            AppError::NotFound(_, _) => "not found".to_string(),
            AppError::AlreadyExists => "already exists".to_string(),
            AppError::AuthenticationFailed(_) => "authentication failed".to_string(),
            AppError::NotAuthorized => "not authorized".to_string(),
            AppError::Internal(_) => "internal error".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

#[async_trait::async_trait]
impl Writer for AppError {
    async fn write(mut self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        tracing::warn!(error = %self, "request failed");
        res.status_code(self.status_code());
        res.render(Json(ErrorBody {
            error: self.kind(),
            message: self.message(),
        }));
    }
}
