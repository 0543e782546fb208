use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a rule permits or forbids a matching request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// The two actions an HTTP request is reduced to: `GET`/`HEAD` map to `Read`,
/// everything else maps to `Write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
}

impl Action {
    pub fn from_method(method: &http::Method) -> Self {
        match *method {
            http::Method::GET | http::Method::HEAD => Action::Read,
            _ => Action::Write,
        }
    }
}

/// One line of a policy: `effect` applies to requests whose `action` matches
/// and whose path matches `resource` (a literal path, or a literal prefix
/// followed by a single trailing `*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub effect: Effect,
    pub action: Action,
    pub resource: String,
}

impl Rule {
    /// Prefix-glob match: a trailing `*` in `resource` matches any suffix,
    /// otherwise the path must match `resource` exactly.
    pub fn matches_resource(&self, path: &str) -> bool {
        match self.resource.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => path == self.resource,
        }
    }

    pub fn matches(&self, action: Action, path: &str) -> bool {
        self.action == action && self.matches_resource(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub pid: Uuid,
    pub name: Option<String>,
    pub hostname: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePolicy {
    pub name: Option<String>,
    pub hostname: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Policy {
    pub fn new(pid: Uuid, create: CreatePolicy) -> Self {
        Policy {
            pid,
            name: create.name,
            hostname: create.hostname,
            rules: create.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(effect: Effect, resource: &str) -> Rule {
        Rule {
            effect,
            action: Action::Read,
            resource: resource.to_string(),
        }
    }

    #[test]
    fn trailing_star_is_prefix_wildcard() {
        assert!(rule(Effect::Allow, "/users/*").matches_resource("/users/1"));
        assert!(rule(Effect::Allow, "/users/*").matches_resource("/users/"));
        assert!(!rule(Effect::Allow, "/users/*").matches_resource("/groups/1"));
    }

    #[test]
    fn no_star_requires_exact_match() {
        assert!(rule(Effect::Allow, "/users").matches_resource("/users"));
        assert!(!rule(Effect::Allow, "/users").matches_resource("/users/1"));
    }

    #[test]
    fn action_from_method_maps_get_and_head_to_read() {
        assert_eq!(Action::from_method(&http::Method::GET), Action::Read);
        assert_eq!(Action::from_method(&http::Method::HEAD), Action::Read);
        assert_eq!(Action::from_method(&http::Method::POST), Action::Write);
        assert_eq!(Action::from_method(&http::Method::DELETE), Action::Write);
    }
}
