//! Environment-variable configuration, loaded once at startup with
//! `confique`.

use confique::Config;

/// `{PREFIX}_*` server configuration, `PREFIX` defaulting to `IAM`.
#[derive(Debug, Clone, Config)]
pub struct ServerConfig {
    #[config(env = "IAM_HOST", default = "0.0.0.0")]
    pub host: String,

    #[config(env = "IAM_PORT", default = 8001)]
    pub port: u16,

    #[config(env = "IAM_TLS_CERT")]
    pub tls_cert: Option<String>,

    #[config(env = "IAM_TLS_KEY")]
    pub tls_key: Option<String>,

    #[config(env = "IAM_SESSION_TTL", default = 3600)]
    pub session_ttl_secs: i64,

    /// Overrides the `X-{prefix}-*` header prefix independently of
    /// the `IAM_*` environment-variable prefix above.
    #[config(env = "IAM_HEADER_PREFIX", default = "IAM")]
    pub header_prefix: String,
}

impl ServerConfig {
    pub fn load_and_validate() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tls(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}
