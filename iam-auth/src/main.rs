use std::sync::Arc;

use eyre::{Result, eyre};
use http::Method;
use salvo::cors::Cors;
use salvo::prelude::*;
use tracing::info;

use iam_auth::auth::AuthenticationConfig;
use iam_auth::config::ServerConfig;
use iam_auth::server::{api_routes, health_route};
use iam_auth::session::{self, SessionManager};
use iam_auth::store::Store;
use iam_auth::store::memory::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    iam_auth::logging::init_tracing();

    info!("Starting iam-auth...");

    let config = ServerConfig::load_and_validate().map_err(|e| eyre!(e))?;
    info!("Configuration loaded: {:?}", config);

    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let auth_config = Arc::new(AuthenticationConfig {
        header_prefix: config.header_prefix.clone(),
        host: config.host.clone(),
    });
    let session_manager = Arc::new(SessionManager::new(session::ttl_from_secs(
        config.session_ttl_secs,
    )));

    let cors = Cors::new()
        .allow_origin(salvo::cors::AllowOrigin::mirror_request())
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec![
            "authorization".to_string(),
            "host".to_string(),
            "content-type".to_string(),
            "session-token".to_string(),
            format!("x-{}-user-id", config.header_prefix.to_lowercase()),
            format!("x-{}-public-key", config.header_prefix.to_lowercase()),
            format!("x-{}-request-id", config.header_prefix.to_lowercase()),
        ])
        .allow_credentials(true)
        .max_age(3600)
        .into_handler();

    let router = Router::new()
        .hoop(affix_state::inject(store))
        .hoop(affix_state::inject(auth_config))
        .hoop(affix_state::inject(session_manager))
        .push(health_route())
        .push(api_routes());

    let service = Service::new(router).hoop(cors);

    if config.tls().is_some() {
        // TLS termination is an external-collaborator concern; a reverse
        // proxy or load balancer is expected to sit in front of this
        // process. The cert/key paths are accepted and logged for parity
        // with the environment contract but not used to terminate TLS here.
        info!("IAM_TLS_CERT/IAM_TLS_KEY set; terminate TLS upstream of this process");
    }

    let bind_address = config.bind_address();
    let acceptor = TcpListener::new(&bind_address).bind().await;
    info!("Server listening on {}", bind_address);
    Server::new(acceptor).serve(service).await;

    Ok(())
}
