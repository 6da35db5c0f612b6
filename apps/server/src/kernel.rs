// [apps/server/src/kernel.rs]
//! Composition root: wires configuration, the store, the session
//! verifier, and the background daemons together, then hands control to
//! the HTTP transport.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::{error, info, instrument};
use warroom_auth::{SessionConfig, SessionVerifier};
use warroom_store::{PresenceRepository, StoreClient};

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::services::presence_sweeper;
use crate::state::AppState;

pub struct Kernel {
    port: u16,
    state: AppState,
}

impl Kernel {
    #[instrument(skip(config))]
    pub async fn ignite(config: AppConfig) -> Self {
        let store = StoreClient::connect(&config.database_url, config.turso_auth_token.clone())
            .await
            .expect("FATAL: could not establish the database connection");

        let verifier = SessionVerifier::new(
            SessionConfig::new(config.session_signing_secret.clone(), Some(config.session_token_ttl_seconds))
                .expect("FATAL: SESSION_SIGNING_SECRET failed validation"),
        );

        let presence_store = PresenceRepository::new(store.clone());
        let port = config.port;
        let state = AppState::new(config, store, verifier, presence_store);

        Self { port, state }
    }

    pub async fn launch(self) {
        presence_sweeper::spawn(self.state.clone(), self.state.config.presence_heartbeat_seconds as u64);

        let router = build_router(self.state);
        let address = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port);

        info!(%address, "warroom server listening");

        let listener = tokio::net::TcpListener::bind(address)
            .await
            .expect("FATAL: failed to bind listening port");

        if let Err(error) = axum::serve(listener, router).await {
            error!(%error, "server loop exited with an error");
            std::process::exit(1);
        }
    }
}
