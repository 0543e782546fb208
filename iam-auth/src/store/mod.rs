//! The storage contract: a capability set the rest of the server depends on,
//! expressed as one trait per entity family (splitting `UserStore` from
//! `SessionStore` the way a repository layer splits by aggregate) composed
//! into a single [`Store`] supertrait that handlers hold as `Arc<dyn Store>`.

pub mod memory;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{
    CreateGroup, CreatePolicy, CreateUser, Group, GroupIdentifier, Policy, PolicyIdentifier,
    Session, User, UserIdentifier,
};

/// Users. `get_user_id` resolves any identifier variant without requiring
/// the caller to load the whole entity.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: &UserIdentifier) -> Result<User, AppError>;
    async fn get_user_id(&self, id: &UserIdentifier) -> Result<Uuid, AppError>;
    async fn list_users(&self, offset: usize, limit: Option<usize>) -> Result<Vec<User>, AppError>;
    async fn create_user(&self, user: CreateUser) -> Result<User, AppError>;
    async fn delete_user(&self, id: &UserIdentifier) -> Result<(), AppError>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn get_group(&self, id: &GroupIdentifier) -> Result<Group, AppError>;
    async fn get_group_id(&self, id: &GroupIdentifier) -> Result<Uuid, AppError>;
    async fn list_groups(&self, offset: usize, limit: Option<usize>) -> Result<Vec<Group>, AppError>;
    async fn create_group(&self, group: CreateGroup) -> Result<Group, AppError>;
    async fn delete_group(&self, id: &GroupIdentifier) -> Result<(), AppError>;
}

#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn get_policy(&self, id: &PolicyIdentifier) -> Result<Policy, AppError>;
    async fn list_policy_ids(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Uuid>, AppError>;
    async fn create_policy(&self, policy: CreatePolicy) -> Result<Policy, AppError>;
    async fn update_policy(&self, policy: Policy) -> Result<Policy, AppError>;
    async fn delete_policy(&self, id: &PolicyIdentifier) -> Result<(), AppError>;
    /// All policies attached to `uid` directly or via any group it belongs
    /// to, filtered to `hostname == host`. May return duplicates.
    async fn list_policies_for_user(&self, uid: Uuid, host: &str) -> Result<Vec<Policy>, AppError>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn create_membership(
        &self,
        uid: &UserIdentifier,
        gid: &GroupIdentifier,
    ) -> Result<(), AppError>;
    async fn delete_membership(
        &self,
        uid: &UserIdentifier,
        gid: &GroupIdentifier,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn create_user_policy_attachment(
        &self,
        uid: &UserIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError>;
    async fn delete_user_policy_attachment(
        &self,
        uid: &UserIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError>;
    async fn create_group_policy_attachment(
        &self,
        gid: &GroupIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError>;
    async fn delete_group_policy_attachment(
        &self,
        gid: &GroupIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError>;
}

/// Sessions. `create_session` takes an already-generated id and token: the
/// random-number generator is never invoked inside a storage transaction,
/// only by the session manager that calls this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(
        &self,
        sid: Uuid,
        uid: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;
    async fn get_session_by_id(&self, uid: Uuid, sid: Uuid) -> Result<Session, AppError>;
    async fn get_session_by_token(&self, uid: Uuid, token: &str) -> Result<Session, AppError>;
    async fn refresh_session(
        &self,
        uid: Uuid,
        sid: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;
    async fn delete_session(&self, uid: Uuid, sid: Uuid) -> Result<(), AppError>;
    async fn delete_user_sessions(&self, uid: Uuid) -> Result<u64, AppError>;
    async fn list_user_sessions(
        &self,
        uid: Uuid,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Session>, AppError>;
}

/// The full capability set handlers depend on.
pub trait Store:
    UserStore + GroupStore + PolicyStore + MembershipStore + AttachmentStore + SessionStore
    + Send
    + Sync
    + std::fmt::Debug
{
}

impl<T> Store for T where
    T: UserStore
        + GroupStore
        + PolicyStore
        + MembershipStore
        + AttachmentStore
        + SessionStore
        + Send
        + Sync
        + std::fmt::Debug
{
}
