//! The authentication handler: parses the required headers,
//! rebuilds the canonical string-to-sign, and verifies the Ed25519
//! signature against one of the resolved user's registered public keys.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signature, VerifyingKey};
use uuid::Uuid;

use crate::auth::canonical::{canonical_string, host_without_port};
use crate::error::{AppError, AuthFailureReason};
use crate::model::{User, UserIdentifier};
use crate::store::Store;

/// Where to find the authentication headers and how to name them, so the
/// `X-…` prefix stays configurable without touching the parsing logic.
#[derive(Debug, Clone)]
pub struct AuthenticationConfig {
    pub header_prefix: String,
    /// The server's own configured host, checked byte-for-byte against the
    /// request's `Host` header with the port stripped.
    pub host: String,
}

impl AuthenticationConfig {
    pub fn user_id_header(&self) -> String {
        format!("X-{}-User-Id", self.header_prefix)
    }

    pub fn public_key_header(&self) -> String {
        format!("X-{}-Public-Key", self.header_prefix)
    }

    pub fn request_id_header(&self) -> String {
        format!("X-{}-Request-Id", self.header_prefix)
    }
}

/// The raw header values the transport layer hands to the authentication
/// handler, read before any middleware can rewrite path or query.
#[derive(Debug, Clone, Copy)]
pub struct RequestHeaders<'a> {
    pub method: &'a str,
    pub host: Option<&'a str>,
    pub raw_path: &'a str,
    pub raw_query: &'a str,
    pub authorization: Option<&'a str>,
    pub user_id: Option<&'a str>,
    pub public_key: Option<&'a str>,
    pub request_id: Option<&'a str>,
    pub session_token: Option<&'a str>,
}

/// The request once it has passed authentication (`Received → Authenticated`),
/// handed to the authorization handler next.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest {
    pub user: User,
    pub request_id: String,
    pub session_token: Option<String>,
}

fn strip_signature_prefix(authorization: &str) -> Option<&str> {
    authorization.strip_prefix("Signature ")
}

pub async fn authenticate(
    store: &Arc<dyn Store>,
    config: &AuthenticationConfig,
    headers: RequestHeaders<'_>,
) -> Result<AuthenticatedRequest, AppError> {
    let invalid_headers = || AppError::AuthenticationFailed(AuthFailureReason::InvalidHeaders);

    let host_header = headers.host.ok_or_else(invalid_headers)?;
    let signature_b64 = headers
        .authorization
        .and_then(strip_signature_prefix)
        .ok_or_else(invalid_headers)?;
    let user_id_raw = headers.user_id.ok_or_else(invalid_headers)?;
    let public_key_b64 = headers.public_key.ok_or_else(invalid_headers)?;
    let request_id = headers.request_id.ok_or_else(invalid_headers)?;
    // Well-formedness only: a UUID-shaped request id. Replay tracking of
    // seen ids is a possible future hardening, not implemented here.
    Uuid::parse_str(request_id).map_err(|_| invalid_headers())?;

    if host_without_port(host_header) != config.host {
        return Err(AppError::AuthenticationFailed(AuthFailureReason::InvalidHost));
    }

    let identifier = match Uuid::parse_str(user_id_raw) {
        Ok(uid) => UserIdentifier::Id(uid),
        Err(_) => UserIdentifier::Email(user_id_raw.to_string()),
    };
    let user = store.get_user(&identifier).await.map_err(|err| match err {
        AppError::NotFound(_, _) => {
            AppError::AuthenticationFailed(AuthFailureReason::UserNotFound)
        }
        other => other,
    })?;

    let public_key_bytes: [u8; 32] = STANDARD
        .decode(public_key_b64)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(invalid_headers)?;
    if !user.has_public_key(&public_key_bytes) {
        return Err(AppError::AuthenticationFailed(
            AuthFailureReason::InvalidSignature,
        ));
    }

    let invalid_signature =
        || AppError::AuthenticationFailed(AuthFailureReason::InvalidSignature);
    let verifying_key = VerifyingKey::from_bytes(&public_key_bytes).map_err(|_| invalid_signature())?;
    let signature_bytes: [u8; 64] = STANDARD
        .decode(signature_b64)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(invalid_signature)?;
    let signature = Signature::from_bytes(&signature_bytes);

    let message = canonical_string(
        headers.method,
        host_header,
        headers.raw_path,
        headers.raw_query,
        request_id,
        headers.session_token,
    );
    verifying_key
        .verify_strict(message.as_bytes(), &signature)
        .map_err(|_| invalid_signature())?;

    Ok(AuthenticatedRequest {
        user,
        request_id: request_id.to_string(),
        session_token: headers.session_token.map(str::to_string),
    })
}

#[cfg(test)]
#[path = "authentication_tests.rs"]
mod authentication_tests;
