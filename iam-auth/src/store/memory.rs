//! The in-memory reference store: one [`State`] value behind a
//! single `parking_lot::RwLock`, mutated as a sequence of atomic
//! transactions. A write operation takes the write lock, validates and
//! mutates in place, and releases it without ever `.await`ing while held;
//! a read operation takes a read lock just long enough to clone out what
//! it needs. This gives linearizable writes and non-blocking concurrent
//! reads without a bespoke STM crate.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{
    CreateGroup, CreatePolicy, CreateUser, Group, GroupIdentifier, Policy, PolicyIdentifier,
    Session, User, UserIdentifier,
};
use crate::store::{AttachmentStore, GroupStore, MembershipStore, PolicyStore, SessionStore, UserStore};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<Uuid, User>,
    groups: BTreeMap<Uuid, Group>,
    policies: BTreeMap<Uuid, Policy>,
    sessions: BTreeMap<Uuid, Session>,
    session_tokens: BTreeMap<String, Uuid>,
    email_index: BTreeMap<String, Uuid>,
    group_name_index: BTreeMap<String, Uuid>,
    policy_name_index: BTreeMap<String, Uuid>,
}

impl State {
    fn resolve_user(&self, id: &UserIdentifier) -> Option<Uuid> {
        match id {
            UserIdentifier::Id(uid) => self.users.contains_key(uid).then_some(*uid),
            UserIdentifier::Email(email) => self.email_index.get(email).copied(),
            UserIdentifier::IdAndEmail(uid, _) => self.users.contains_key(uid).then_some(*uid),
        }
    }

    fn resolve_group(&self, id: &GroupIdentifier) -> Option<Uuid> {
        match id {
            GroupIdentifier::Id(gid) => self.groups.contains_key(gid).then_some(*gid),
            GroupIdentifier::Name(name) => self.group_name_index.get(name).copied(),
            GroupIdentifier::IdAndName(gid, _) => self.groups.contains_key(gid).then_some(*gid),
        }
    }

    fn resolve_policy(&self, id: &PolicyIdentifier) -> Option<Uuid> {
        match id {
            PolicyIdentifier::Id(pid) => self.policies.contains_key(pid).then_some(*pid),
            PolicyIdentifier::Name(name) => self.policy_name_index.get(name).copied(),
            PolicyIdentifier::IdAndName(pid, _) => self.policies.contains_key(pid).then_some(*pid),
        }
    }
}

fn paginate<T>(mut items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    if offset >= items.len() {
        return Vec::new();
    }
    items.drain(..offset);
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

/// The reference implementation of the storage contract. Safe to
/// share across request-handling threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_user(&self, id: &UserIdentifier) -> Result<User, AppError> {
        let state = self.state.read();
        let uid = state
            .resolve_user(id)
            .ok_or_else(|| AppError::not_found("user", format!("{id:?}")))?;
        Ok(state.users[&uid].clone())
    }

    async fn get_user_id(&self, id: &UserIdentifier) -> Result<Uuid, AppError> {
        let state = self.state.read();
        state
            .resolve_user(id)
            .ok_or_else(|| AppError::not_found("user", format!("{id:?}")))
    }

    async fn list_users(&self, offset: usize, limit: Option<usize>) -> Result<Vec<User>, AppError> {
        let state = self.state.read();
        let users: Vec<User> = state.users.values().cloned().collect();
        Ok(paginate(users, offset, limit))
    }

    async fn create_user(&self, create: CreateUser) -> Result<User, AppError> {
        let uid = Uuid::new_v4();
        let mut state = self.state.write();
        if let Some(email) = &create.email
            && state.email_index.contains_key(email)
        {
            return Err(AppError::AlreadyExists);
        }
        let user = User::new(uid, create);
        if let Some(email) = &user.email {
            state.email_index.insert(email.clone(), uid);
        }
        state.users.insert(uid, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: &UserIdentifier) -> Result<(), AppError> {
        let mut state = self.state.write();
        let uid = state
            .resolve_user(id)
            .ok_or_else(|| AppError::not_found("user", format!("{id:?}")))?;
        let user = state.users.remove(&uid).expect("resolved uid must exist");
        if let Some(email) = &user.email {
            state.email_index.remove(email);
        }
        for gid in &user.groups {
            if let Some(group) = state.groups.get_mut(gid) {
                group.users.remove(&uid);
            }
        }
        let dead_sessions: Vec<Uuid> = state
            .sessions
            .values()
            .filter(|s| s.user == uid)
            .map(|s| s.sid)
            .collect();
        for sid in dead_sessions {
            if let Some(session) = state.sessions.remove(&sid) {
                state.session_tokens.remove(&session.token);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupStore for InMemoryStore {
    async fn get_group(&self, id: &GroupIdentifier) -> Result<Group, AppError> {
        let state = self.state.read();
        let gid = state
            .resolve_group(id)
            .ok_or_else(|| AppError::not_found("group", format!("{id:?}")))?;
        Ok(state.groups[&gid].clone())
    }

    async fn get_group_id(&self, id: &GroupIdentifier) -> Result<Uuid, AppError> {
        let state = self.state.read();
        state
            .resolve_group(id)
            .ok_or_else(|| AppError::not_found("group", format!("{id:?}")))
    }

    async fn list_groups(&self, offset: usize, limit: Option<usize>) -> Result<Vec<Group>, AppError> {
        let state = self.state.read();
        let groups: Vec<Group> = state.groups.values().cloned().collect();
        Ok(paginate(groups, offset, limit))
    }

    async fn create_group(&self, create: CreateGroup) -> Result<Group, AppError> {
        let gid = Uuid::new_v4();
        let mut state = self.state.write();
        if let Some(name) = &create.name
            && state.group_name_index.contains_key(name)
        {
            return Err(AppError::AlreadyExists);
        }
        let group = Group::new(gid, create);
        if let Some(name) = &group.name {
            state.group_name_index.insert(name.clone(), gid);
        }
        state.groups.insert(gid, group.clone());
        Ok(group)
    }

    async fn delete_group(&self, id: &GroupIdentifier) -> Result<(), AppError> {
        let mut state = self.state.write();
        let gid = state
            .resolve_group(id)
            .ok_or_else(|| AppError::not_found("group", format!("{id:?}")))?;
        let group = state.groups.remove(&gid).expect("resolved gid must exist");
        if let Some(name) = &group.name {
            state.group_name_index.remove(name);
        }
        for uid in &group.users {
            if let Some(user) = state.users.get_mut(uid) {
                user.groups.remove(&gid);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyStore for InMemoryStore {
    async fn get_policy(&self, id: &PolicyIdentifier) -> Result<Policy, AppError> {
        let state = self.state.read();
        let pid = state
            .resolve_policy(id)
            .ok_or_else(|| AppError::not_found("policy", format!("{id:?}")))?;
        Ok(state.policies[&pid].clone())
    }

    async fn list_policy_ids(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Uuid>, AppError> {
        let state = self.state.read();
        let ids: Vec<Uuid> = state.policies.keys().copied().collect();
        Ok(paginate(ids, offset, limit))
    }

    async fn create_policy(&self, create: CreatePolicy) -> Result<Policy, AppError> {
        let pid = Uuid::new_v4();
        let mut state = self.state.write();
        if let Some(name) = &create.name
            && state.policy_name_index.contains_key(name)
        {
            return Err(AppError::AlreadyExists);
        }
        let policy = Policy::new(pid, create);
        if let Some(name) = &policy.name {
            state.policy_name_index.insert(name.clone(), pid);
        }
        state.policies.insert(pid, policy.clone());
        Ok(policy)
    }

    async fn update_policy(&self, policy: Policy) -> Result<Policy, AppError> {
        let mut state = self.state.write();
        if !state.policies.contains_key(&policy.pid) {
            return Err(AppError::not_found("policy", policy.pid.to_string()));
        }
        let previous_name = state.policies[&policy.pid].name.clone();
        if policy.name != previous_name {
            if let Some(name) = &policy.name
                && state.policy_name_index.contains_key(name)
            {
                return Err(AppError::AlreadyExists);
            }
            if let Some(old_name) = previous_name {
                state.policy_name_index.remove(&old_name);
            }
            if let Some(new_name) = &policy.name {
                state.policy_name_index.insert(new_name.clone(), policy.pid);
            }
        }
        state.policies.insert(policy.pid, policy.clone());
        Ok(policy)
    }

    async fn delete_policy(&self, id: &PolicyIdentifier) -> Result<(), AppError> {
        let mut state = self.state.write();
        let pid = state
            .resolve_policy(id)
            .ok_or_else(|| AppError::not_found("policy", format!("{id:?}")))?;
        let policy = state.policies.remove(&pid).expect("resolved pid must exist");
        if let Some(name) = &policy.name {
            state.policy_name_index.remove(name);
        }
        for user in state.users.values_mut() {
            user.policies.remove(&pid);
        }
        for group in state.groups.values_mut() {
            group.policies.remove(&pid);
        }
        Ok(())
    }

    async fn list_policies_for_user(&self, uid: Uuid, host: &str) -> Result<Vec<Policy>, AppError> {
        let state = self.state.read();
        let user = state
            .users
            .get(&uid)
            .ok_or_else(|| AppError::not_found("user", uid.to_string()))?;
        let mut pids: Vec<Uuid> = user.policies.iter().copied().collect();
        for gid in &user.groups {
            if let Some(group) = state.groups.get(gid) {
                pids.extend(group.policies.iter().copied());
            }
        }
        pids.sort();
        pids.dedup();
        Ok(pids
            .into_iter()
            .filter_map(|pid| state.policies.get(&pid))
            .filter(|p| p.hostname == host)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn create_membership(
        &self,
        uid: &UserIdentifier,
        gid: &GroupIdentifier,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        let uid = state
            .resolve_user(uid)
            .ok_or_else(|| AppError::not_found("user", format!("{uid:?}")))?;
        let gid = state
            .resolve_group(gid)
            .ok_or_else(|| AppError::not_found("group", format!("{gid:?}")))?;
        if state.users[&uid].groups.contains(&gid) {
            return Err(AppError::AlreadyExists);
        }
        state.users.get_mut(&uid).unwrap().groups.insert(gid);
        state.groups.get_mut(&gid).unwrap().users.insert(uid);
        Ok(())
    }

    async fn delete_membership(
        &self,
        uid: &UserIdentifier,
        gid: &GroupIdentifier,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        let uid = state
            .resolve_user(uid)
            .ok_or_else(|| AppError::not_found("user", format!("{uid:?}")))?;
        let gid = state
            .resolve_group(gid)
            .ok_or_else(|| AppError::not_found("group", format!("{gid:?}")))?;
        if !state.users[&uid].groups.contains(&gid) {
            return Err(AppError::not_found("membership", format!("{uid}/{gid}")));
        }
        state.users.get_mut(&uid).unwrap().groups.remove(&gid);
        state.groups.get_mut(&gid).unwrap().users.remove(&uid);
        Ok(())
    }
}

#[async_trait]
impl AttachmentStore for InMemoryStore {
    async fn create_user_policy_attachment(
        &self,
        uid: &UserIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        let uid = state
            .resolve_user(uid)
            .ok_or_else(|| AppError::not_found("user", format!("{uid:?}")))?;
        let pid = state
            .resolve_policy(pid)
            .ok_or_else(|| AppError::not_found("policy", format!("{pid:?}")))?;
        if state.users[&uid].policies.contains(&pid) {
            return Err(AppError::AlreadyExists);
        }
        state.users.get_mut(&uid).unwrap().policies.insert(pid);
        Ok(())
    }

    async fn delete_user_policy_attachment(
        &self,
        uid: &UserIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        let uid = state
            .resolve_user(uid)
            .ok_or_else(|| AppError::not_found("user", format!("{uid:?}")))?;
        let pid = state
            .resolve_policy(pid)
            .ok_or_else(|| AppError::not_found("policy", format!("{pid:?}")))?;
        if !state.users[&uid].policies.contains(&pid) {
            return Err(AppError::not_found("attachment", format!("{uid}/{pid}")));
        }
        state.users.get_mut(&uid).unwrap().policies.remove(&pid);
        Ok(())
    }

    async fn create_group_policy_attachment(
        &self,
        gid: &GroupIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        let gid = state
            .resolve_group(gid)
            .ok_or_else(|| AppError::not_found("group", format!("{gid:?}")))?;
        let pid = state
            .resolve_policy(pid)
            .ok_or_else(|| AppError::not_found("policy", format!("{pid:?}")))?;
        if state.groups[&gid].policies.contains(&pid) {
            return Err(AppError::AlreadyExists);
        }
        state.groups.get_mut(&gid).unwrap().policies.insert(pid);
        Ok(())
    }

    async fn delete_group_policy_attachment(
        &self,
        gid: &GroupIdentifier,
        pid: &PolicyIdentifier,
    ) -> Result<(), AppError> {
        let mut state = self.state.write();
        let gid = state
            .resolve_group(gid)
            .ok_or_else(|| AppError::not_found("group", format!("{gid:?}")))?;
        let pid = state
            .resolve_policy(pid)
            .ok_or_else(|| AppError::not_found("policy", format!("{pid:?}")))?;
        if !state.groups[&gid].policies.contains(&pid) {
            return Err(AppError::not_found("attachment", format!("{gid}/{pid}")));
        }
        state.groups.get_mut(&gid).unwrap().policies.remove(&pid);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn create_session(
        &self,
        sid: Uuid,
        uid: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut state = self.state.write();
        if !state.users.contains_key(&uid) {
            return Err(AppError::not_found("user", uid.to_string()));
        }
        let session = Session {
            sid,
            user: uid,
            token: token.clone(),
            expires_at,
        };
        state.sessions.insert(sid, session.clone());
        state.session_tokens.insert(token, sid);
        Ok(session)
    }

    async fn get_session_by_id(&self, uid: Uuid, sid: Uuid) -> Result<Session, AppError> {
        let state = self.state.read();
        let session = state
            .sessions
            .get(&sid)
            .filter(|s| s.user == uid && !s.is_expired(Utc::now()))
            .ok_or_else(|| AppError::not_found("session", sid.to_string()))?;
        Ok(session.clone())
    }

    async fn get_session_by_token(&self, uid: Uuid, token: &str) -> Result<Session, AppError> {
        let state = self.state.read();
        let sid = state
            .session_tokens
            .get(token)
            .ok_or_else(|| AppError::not_found("session", token.to_string()))?;
        let session = state
            .sessions
            .get(sid)
            .filter(|s| s.user == uid && !s.is_expired(Utc::now()))
            .ok_or_else(|| AppError::not_found("session", token.to_string()))?;
        Ok(session.clone())
    }

    async fn refresh_session(
        &self,
        uid: Uuid,
        sid: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut state = self.state.write();
        let now = Utc::now();
        let owner_matches_and_active = state
            .sessions
            .get(&sid)
            .is_some_and(|s| s.user == uid && !s.is_expired(now));
        if !owner_matches_and_active {
            return Err(AppError::not_found("session", sid.to_string()));
        }
        let session = state.sessions.get_mut(&sid).unwrap();
        session.expires_at = expires_at;
        Ok(session.clone())
    }

    async fn delete_session(&self, uid: Uuid, sid: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write();
        let owner_matches = state.sessions.get(&sid).is_some_and(|s| s.user == uid);
        if !owner_matches {
            return Err(AppError::not_found("session", sid.to_string()));
        }
        if let Some(session) = state.sessions.remove(&sid) {
            state.session_tokens.remove(&session.token);
        }
        Ok(())
    }

    async fn delete_user_sessions(&self, uid: Uuid) -> Result<u64, AppError> {
        let mut state = self.state.write();
        let dead: Vec<Uuid> = state
            .sessions
            .values()
            .filter(|s| s.user == uid)
            .map(|s| s.sid)
            .collect();
        let count = dead.len() as u64;
        for sid in dead {
            if let Some(session) = state.sessions.remove(&sid) {
                state.session_tokens.remove(&session.token);
            }
        }
        Ok(count)
    }

    async fn list_user_sessions(
        &self,
        uid: Uuid,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Session>, AppError> {
        let state = self.state.read();
        let now = Utc::now();
        let sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| s.user == uid && !s.is_expired(now))
            .cloned()
            .collect();
        Ok(paginate(sessions, offset, limit))
    }
}
