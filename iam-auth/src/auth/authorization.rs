//! The authorization handler: aggregates the authenticated user's
//! policies (direct and via group membership, scoped to the request's host),
//! looks up the optional session, and evaluates the request against the
//! aggregated rules.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::authentication::AuthenticatedRequest;
use crate::auth::evaluator::{Decision, evaluate};
use crate::error::AppError;
use crate::model::{Action, Policy, Rule, Session};
use crate::store::Store;

/// The request once it has passed both authentication and authorization,
/// handed to the route handler as the final request context.
#[derive(Debug, Clone)]
pub struct Auth {
    pub authenticated: AuthenticatedRequest,
    pub session: Option<Session>,
    pub policies: Vec<Policy>,
}

impl Auth {
    pub fn user_id(&self) -> Uuid {
        self.authenticated.user.uid
    }
}

pub async fn authorize(
    store: &Arc<dyn Store>,
    authenticated: AuthenticatedRequest,
    host: &str,
    action: Action,
    resource: &str,
) -> Result<Auth, AppError> {
    let uid = authenticated.user.uid;

    let session = match &authenticated.session_token {
        Some(token) => Some(store.get_session_by_token(uid, token).await?),
        None => None,
    };

    let policies = store.list_policies_for_user(uid, host).await?;
    let rules: Vec<Rule> = policies
        .iter()
        .flat_map(|policy| policy.rules.iter().cloned())
        .collect();

    match evaluate(action, resource, &rules) {
        Decision::Allow => Ok(Auth {
            authenticated,
            session,
            policies,
        }),
        Decision::Deny => Err(AppError::NotAuthorized),
    }
}

#[cfg(test)]
#[path = "authorization_tests.rs"]
mod authorization_tests;
