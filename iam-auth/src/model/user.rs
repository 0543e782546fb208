use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered Ed25519 public key a user may sign requests with.
///
/// `key` is compared byte-for-byte against `X-IAM-Public-Key`; it carries no
/// notion of rotation beyond "a user may have more than one of these".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublicKey {
    #[serde(with = "crate::model::serde_bytes32")]
    pub key: [u8; 32],
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: Uuid,
    pub email: Option<String>,
    pub groups: BTreeSet<Uuid>,
    pub policies: BTreeSet<Uuid>,
    pub public_keys: Vec<UserPublicKey>,
}

/// Fields accepted from `POST /users`. `groups` and `policies` start empty;
/// they are populated exclusively through the membership/attachment
/// operations, never by mutating a user in place.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: Option<String>,
    #[serde(default)]
    pub public_keys: Vec<UserPublicKey>,
}

impl User {
    pub fn new(uid: Uuid, create: CreateUser) -> Self {
        User {
            uid,
            email: create.email,
            groups: BTreeSet::new(),
            policies: BTreeSet::new(),
            public_keys: create.public_keys,
        }
    }

    pub fn has_public_key(&self, key: &[u8; 32]) -> bool {
        self.public_keys.iter().any(|pk| &pk.key == key)
    }
}
