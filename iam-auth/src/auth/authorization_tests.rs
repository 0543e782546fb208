use std::sync::Arc;

use super::*;
use crate::model::{CreateGroup, CreatePolicy, CreateUser, Effect, Rule};
use crate::session::SessionManager;
use crate::store::memory::InMemoryStore;

fn store() -> Arc<dyn Store> {
    Arc::new(InMemoryStore::new())
}

fn authenticated(user: crate::model::User, session_token: Option<String>) -> AuthenticatedRequest {
    AuthenticatedRequest {
        user,
        request_id: "11111111-1111-1111-1111-111111111111".to_string(),
        session_token,
    }
}

#[tokio::test]
async fn no_policies_is_default_deny() {
    let store = store();
    let user = store
        .create_user(CreateUser {
            email: None,
            public_keys: vec![],
        })
        .await
        .unwrap();

    let result = authorize(
        &store,
        authenticated(user, None),
        "iam.example.com",
        Action::Read,
        "/users/1",
    )
    .await;
    assert!(matches!(result, Err(AppError::NotAuthorized)));
}

#[tokio::test]
async fn direct_policy_allows() {
    let store = store();
    let user = store
        .create_user(CreateUser {
            email: None,
            public_keys: vec![],
        })
        .await
        .unwrap();
    let policy = store
        .create_policy(CreatePolicy {
            name: None,
            hostname: "iam.example.com".to_string(),
            rules: vec![Rule {
                effect: Effect::Allow,
                action: Action::Read,
                resource: "/users/*".to_string(),
            }],
        })
        .await
        .unwrap();
    store
        .create_user_policy_attachment(
            &crate::model::UserIdentifier::Id(user.uid),
            &crate::model::PolicyIdentifier::Id(policy.pid),
        )
        .await
        .unwrap();

    let auth = authorize(
        &store,
        authenticated(user, None),
        "iam.example.com",
        Action::Read,
        "/users/1",
    )
    .await
    .unwrap();
    assert_eq!(auth.policies.len(), 1);
}

#[tokio::test]
async fn group_policy_allows_and_other_host_does_not_apply() {
    let store = store();
    let user = store
        .create_user(CreateUser {
            email: None,
            public_keys: vec![],
        })
        .await
        .unwrap();
    let group = store
        .create_group(CreateGroup { name: None })
        .await
        .unwrap();
    let policy = store
        .create_policy(CreatePolicy {
            name: None,
            hostname: "iam.example.com".to_string(),
            rules: vec![Rule {
                effect: Effect::Allow,
                action: Action::Read,
                resource: "/users/*".to_string(),
            }],
        })
        .await
        .unwrap();
    store
        .create_membership(
            &crate::model::UserIdentifier::Id(user.uid),
            &crate::model::GroupIdentifier::Id(group.gid),
        )
        .await
        .unwrap();
    store
        .create_group_policy_attachment(
            &crate::model::GroupIdentifier::Id(group.gid),
            &crate::model::PolicyIdentifier::Id(policy.pid),
        )
        .await
        .unwrap();

    let allowed = authorize(
        &store,
        authenticated(user.clone(), None),
        "iam.example.com",
        Action::Read,
        "/users/1",
    )
    .await;
    assert!(allowed.is_ok());

    let other_host = authorize(
        &store,
        authenticated(user, None),
        "other.example.com",
        Action::Read,
        "/users/1",
    )
    .await;
    assert!(matches!(other_host, Err(AppError::NotAuthorized)));
}

#[tokio::test]
async fn session_token_is_resolved_into_context() {
    let store = store();
    let user = store
        .create_user(CreateUser {
            email: None,
            public_keys: vec![],
        })
        .await
        .unwrap();
    let policy = store
        .create_policy(CreatePolicy {
            name: None,
            hostname: "iam.example.com".to_string(),
            rules: vec![Rule {
                effect: Effect::Allow,
                action: Action::Read,
                resource: "/*".to_string(),
            }],
        })
        .await
        .unwrap();
    store
        .create_user_policy_attachment(
            &crate::model::UserIdentifier::Id(user.uid),
            &crate::model::PolicyIdentifier::Id(policy.pid),
        )
        .await
        .unwrap();
    let manager = SessionManager::with_default_ttl();
    let session = manager.create_session(&store, user.uid).await.unwrap();

    let auth = authorize(
        &store,
        authenticated(user, Some(session.token.clone())),
        "iam.example.com",
        Action::Read,
        "/users/1",
    )
    .await
    .unwrap();
    assert_eq!(auth.session.unwrap().sid, session.sid);
}
