use chrono::Duration;
use uuid::Uuid;

use super::*;
use crate::model::{CreateGroup, CreatePolicy, CreateUser, UserIdentifier};

fn user(email: &str) -> CreateUser {
    CreateUser {
        email: Some(email.to_string()),
        public_keys: vec![],
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let store = InMemoryStore::new();
    let created = store.create_user(user("alice@example.com")).await.unwrap();
    let fetched = store.get_user(&UserIdentifier::Id(created.uid)).await.unwrap();
    assert_eq!(created, fetched);
    let by_email = store
        .get_user(&UserIdentifier::Email("alice@example.com".to_string()))
        .await
        .unwrap();
    assert_eq!(by_email, created);
}

#[tokio::test]
async fn create_then_delete_then_get_not_found() {
    let store = InMemoryStore::new();
    let created = store.create_user(user("bob@example.com")).await.unwrap();
    store
        .delete_user(&UserIdentifier::Id(created.uid))
        .await
        .unwrap();
    let result = store.get_user(&UserIdentifier::Id(created.uid)).await;
    assert!(matches!(result, Err(AppError::NotFound("user", _))));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let store = InMemoryStore::new();
    store.create_user(user("carol@example.com")).await.unwrap();
    let result = store.create_user(user("carol@example.com")).await;
    assert!(matches!(result, Err(AppError::AlreadyExists)));
}

#[tokio::test]
async fn session_owned_by_one_user_is_not_found_for_another() {
    let store = InMemoryStore::new();
    let alice = store.create_user(user("alice2@example.com")).await.unwrap();
    let bob = store.create_user(user("bob2@example.com")).await.unwrap();

    let sid = Uuid::new_v4();
    let session = store
        .create_session(sid, alice.uid, "token-1".to_string(), Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(session.user, alice.uid);

    let result = store.get_session_by_id(bob.uid, sid).await;
    assert!(matches!(result, Err(AppError::NotFound("session", _))));

    // Deletion is likewise scoped to the claimed owner.
    let delete_result = store.delete_session(bob.uid, sid).await;
    assert!(matches!(delete_result, Err(AppError::NotFound("session", _))));
    store.delete_session(alice.uid, sid).await.unwrap();
}

#[tokio::test]
async fn expired_session_reads_as_not_found() {
    let store = InMemoryStore::new();
    let alice = store.create_user(user("dana@example.com")).await.unwrap();
    let sid = Uuid::new_v4();
    store
        .create_session(sid, alice.uid, "token-2".to_string(), Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    let result = store.get_session_by_id(alice.uid, sid).await;
    assert!(matches!(result, Err(AppError::NotFound("session", _))));
}

#[tokio::test]
async fn deleting_user_cascades_to_sessions_and_memberships() {
    let store = InMemoryStore::new();
    let alice = store.create_user(user("erin@example.com")).await.unwrap();
    let group = store
        .create_group(CreateGroup {
            name: Some("engineers".to_string()),
        })
        .await
        .unwrap();
    store
        .create_membership(&UserIdentifier::Id(alice.uid), &GroupIdentifier::Id(group.gid))
        .await
        .unwrap();
    let sid = Uuid::new_v4();
    store
        .create_session(sid, alice.uid, "token-3".to_string(), Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    store.delete_user(&UserIdentifier::Id(alice.uid)).await.unwrap();

    let session_result = store.get_session_by_id(alice.uid, sid).await;
    assert!(matches!(session_result, Err(AppError::NotFound("session", _))));

    let group_after = store.get_group(&GroupIdentifier::Id(group.gid)).await.unwrap();
    assert!(!group_after.users.contains(&alice.uid));
}

#[tokio::test]
async fn list_policies_for_user_aggregates_direct_and_group_policies_by_host() {
    let store = InMemoryStore::new();
    let alice = store.create_user(user("frank@example.com")).await.unwrap();
    let group = store
        .create_group(CreateGroup { name: None })
        .await
        .unwrap();
    store
        .create_membership(&UserIdentifier::Id(alice.uid), &GroupIdentifier::Id(group.gid))
        .await
        .unwrap();

    let direct_policy = store
        .create_policy(CreatePolicy {
            name: None,
            hostname: "iam.example.com".to_string(),
            rules: vec![],
        })
        .await
        .unwrap();
    let group_policy = store
        .create_policy(CreatePolicy {
            name: None,
            hostname: "iam.example.com".to_string(),
            rules: vec![],
        })
        .await
        .unwrap();
    let other_host_policy = store
        .create_policy(CreatePolicy {
            name: None,
            hostname: "other.example.com".to_string(),
            rules: vec![],
        })
        .await
        .unwrap();

    store
        .create_user_policy_attachment(&UserIdentifier::Id(alice.uid), &PolicyIdentifier::Id(direct_policy.pid))
        .await
        .unwrap();
    store
        .create_group_policy_attachment(&GroupIdentifier::Id(group.gid), &PolicyIdentifier::Id(group_policy.pid))
        .await
        .unwrap();
    store
        .create_user_policy_attachment(&UserIdentifier::Id(alice.uid), &PolicyIdentifier::Id(other_host_policy.pid))
        .await
        .unwrap();

    let policies = store
        .list_policies_for_user(alice.uid, "iam.example.com")
        .await
        .unwrap();
    let pids: std::collections::BTreeSet<Uuid> = policies.iter().map(|p| p.pid).collect();
    assert_eq!(
        pids,
        [direct_policy.pid, group_policy.pid].into_iter().collect()
    );
}

#[tokio::test]
async fn duplicate_membership_is_rejected() {
    let store = InMemoryStore::new();
    let alice = store.create_user(user("gina@example.com")).await.unwrap();
    let group = store
        .create_group(CreateGroup {
            name: Some("admins".to_string()),
        })
        .await
        .unwrap();
    let uid = UserIdentifier::Id(alice.uid);
    let gid = GroupIdentifier::Id(group.gid);
    store.create_membership(&uid, &gid).await.unwrap();
    let result = store.create_membership(&uid, &gid).await;
    assert!(matches!(result, Err(AppError::AlreadyExists)));
}

#[tokio::test]
async fn concurrent_membership_creation_allows_exactly_one_winner() {
    use std::sync::Arc;

    let store = Arc::new(InMemoryStore::new());
    let alice = store.create_user(user("concurrent@example.com")).await.unwrap();
    let group = store
        .create_group(CreateGroup {
            name: Some("concurrent-group".to_string()),
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let uid = UserIdentifier::Id(alice.uid);
        let gid = GroupIdentifier::Id(group.gid);
        handles.push(tokio::spawn(async move { store.create_membership(&uid, &gid).await }));
    }

    let mut successes = 0;
    let mut already_exists = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(AppError::AlreadyExists) => already_exists += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(already_exists, 7);
}
