pub mod group;
pub mod identifier;
pub mod policy;
pub mod session;
pub mod user;

pub use group::{CreateGroup, Group};
pub use identifier::{GroupIdentifier, PolicyIdentifier, UserIdentifier};
pub use policy::{Action, CreatePolicy, Effect, Policy, Rule};
pub use session::Session;
pub use user::{CreateUser, User, UserPublicKey};

/// (De)serializes a 32-byte array as standard base64, the wire format
/// `X-IAM-Public-Key` already uses.
pub(crate) mod serde_bytes32 {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let decoded = STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)?;
        decoded
            .try_into()
            .map_err(|_| serde::de::Error::custom("public key must be exactly 32 bytes"))
    }
}
