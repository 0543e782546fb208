use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub gid: Uuid,
    pub name: Option<String>,
    pub users: BTreeSet<Uuid>,
    pub policies: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: Option<String>,
}

impl Group {
    pub fn new(gid: Uuid, create: CreateGroup) -> Self {
        Group {
            gid,
            name: create.name,
            users: BTreeSet::new(),
            policies: BTreeSet::new(),
        }
    }
}
