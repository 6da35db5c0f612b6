// [apps/server/src/services/presence_sweeper.rs]
//! Background daemon that evicts presence entries whose heartbeat has
//! gone stale, so a client that drops off the network without a clean
//! close does not linger in a room's presence list forever (spec §4.5).

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};
use warroom_domain::events::OutboundEvent;

use crate::state::AppState;

/// Starts the sweeper on the current Tokio runtime. Runs until the
/// process exits; there is no shutdown handle because the server itself
/// owns the runtime's lifetime.
pub fn spawn(state: AppState, period_seconds: u64) {
    let mut ticker = interval(Duration::from_secs(period_seconds.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::spawn(async move {
        info!(period_seconds, "presence sweeper started");
        loop {
            ticker.tick().await;

            match state.presence.sweep_expired().await {
                Ok(expired) if !expired.is_empty() => {
                    warn!(count = expired.len(), "swept expired presence entries");
                    for (incident_id, principal_id) in expired {
                        state
                            .room_hub
                            .broadcast(incident_id, OutboundEvent::PresenceLeft { incident_id, principal_id }, None);
                    }
                }
                Ok(_) => {}
                Err(error) => error!(%error, "presence sweep failed"),
            }
        }
    });
}
