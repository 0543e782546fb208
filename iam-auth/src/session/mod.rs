//! The session manager: a thin layer over [`crate::store::Store`]
//! that owns TTL policy and is the only place the random-number generator is
//! invoked for sessions. Token and session-id generation happen outside the
//! storage transaction, then are installed in a final atomic write.


use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::Session;
use crate::store::{SessionStore, Store};

/// Default session lifetime; overridden by `{PREFIX}_SESSION_TTL`.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Copy)]
pub struct SessionManager {
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        SessionManager { ttl }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// 256 bits of randomness from a cryptographic source, URL-safe
    /// base64-encoded so it can travel in a header verbatim.
    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    pub async fn create_session(&self, store: &Arc<dyn Store>, uid: Uuid) -> Result<Session, AppError> {
        let sid = Uuid::new_v4();
        let token = Self::generate_token();
        let expires_at = Utc::now() + self.ttl;
        store.create_session(sid, uid, token, expires_at).await
    }

    pub async fn refresh_session(
        &self,
        store: &Arc<dyn Store>,
        uid: Uuid,
        sid: Uuid,
    ) -> Result<Session, AppError> {
        let expires_at = Utc::now() + self.ttl;
        store.refresh_session(uid, sid, expires_at).await
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

/// Builds a [`DateTime<Utc>`] TTL from a `{PREFIX}_SESSION_TTL` seconds value.
pub fn ttl_from_secs(secs: i64) -> Duration {
    Duration::seconds(secs)
}

/// Small helper kept next to the manager since both need the same clock:
/// whether `session` is still usable right now.
pub fn is_active(session: &Session, now: DateTime<Utc>) -> bool {
    !session.is_expired(now)
}
