use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three ways a client may name a user in a path segment or request body.
///
/// If the UUID form is present it is authoritative; the alias is only consulted
/// when no UUID was given. `UserIdAndEmail` exists so clients can pass both
/// without the server needing to reject the redundant alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserIdentifier {
    Id(Uuid),
    Email(String),
    IdAndEmail(Uuid, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupIdentifier {
    Id(Uuid),
    Name(String),
    IdAndName(Uuid, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyIdentifier {
    Id(Uuid),
    Name(String),
    IdAndName(Uuid, String),
}

/// Parses a path segment such as `{id-or-email}` into the right variant.
///
/// A segment that parses as a UUID is treated as `Id`; anything else is
/// treated as the alias form. This mirrors the dual-naming scheme used
/// throughout the data model at the one place it meets raw strings.
impl UserIdentifier {
    pub fn from_path_segment(segment: &str) -> Self {
        match Uuid::parse_str(segment) {
            Ok(id) => UserIdentifier::Id(id),
            Err(_) => UserIdentifier::Email(segment.to_string()),
        }
    }
}

impl GroupIdentifier {
    pub fn from_path_segment(segment: &str) -> Self {
        match Uuid::parse_str(segment) {
            Ok(id) => GroupIdentifier::Id(id),
            Err(_) => GroupIdentifier::Name(segment.to_string()),
        }
    }
}

impl PolicyIdentifier {
    pub fn from_path_segment(segment: &str) -> Self {
        match Uuid::parse_str(segment) {
            Ok(id) => PolicyIdentifier::Id(id),
            Err(_) => PolicyIdentifier::Name(segment.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segment_parses_as_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            UserIdentifier::from_path_segment(&id.to_string()),
            UserIdentifier::Id(id)
        );
    }

    #[test]
    fn non_uuid_segment_parses_as_alias() {
        assert_eq!(
            UserIdentifier::from_path_segment("alice@example.com"),
            UserIdentifier::Email("alice@example.com".to_string())
        );
        assert_eq!(
            GroupIdentifier::from_path_segment("engineers"),
            GroupIdentifier::Name("engineers".to_string())
        );
        assert_eq!(
            PolicyIdentifier::from_path_segment("read-only"),
            PolicyIdentifier::Name("read-only".to_string())
        );
    }
}
