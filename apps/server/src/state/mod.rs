// [apps/server/src/state/mod.rs]
//! Composition root. Every handler reaches shared state through a single
//! `AppState`, cloned cheaply (every field is an `Arc` or already clonable).

pub mod focus_registry;
pub mod presence_registry;
pub mod room_hub;

use std::sync::Arc;

use axum::extract::FromRef;
use warroom_auth::SessionVerifier;
use warroom_store::{IncidentRepository, StoreClient, UserRepository};

use crate::config::AppConfig;
use focus_registry::FocusRegistry;
use presence_registry::PresenceRegistry;
use room_hub::RoomHub;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verifier: Arc<SessionVerifier>,
    pub incidents: Arc<IncidentRepository>,
    pub users: Arc<UserRepository>,
    pub room_hub: Arc<RoomHub>,
    pub presence: Arc<PresenceRegistry>,
    pub focus: Arc<FocusRegistry>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: StoreClient,
        verifier: SessionVerifier,
        presence_store: warroom_store::PresenceRepository,
    ) -> Self {
        let focus_throttle_millis = config.focus_throttle_millis;
        let presence_ttl_seconds = config.presence_ttl_seconds;

        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            incidents: Arc::new(IncidentRepository::new(store.clone())),
            users: Arc::new(UserRepository::new(store)),
            room_hub: Arc::new(RoomHub::new()),
            presence: Arc::new(PresenceRegistry::new(presence_store, presence_ttl_seconds)),
            focus: Arc::new(FocusRegistry::new(focus_throttle_millis)),
        }
    }
}

impl FromRef<AppState> for Arc<SessionVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}
