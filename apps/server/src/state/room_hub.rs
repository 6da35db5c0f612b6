// [apps/server/src/state/room_hub.rs]
//! Tracks which sessions are subscribed to which incident rooms and
//! fans events out to them (spec §4.7). A room id is the incident's own
//! id; the `incident:{id}` string form only appears on the wire.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use tokio::sync::mpsc;
use tracing::{instrument, warn};
use uuid::Uuid;
use warroom_domain::events::OutboundEvent;

/// Bounded per-session outbound queue. A session that cannot keep up is
/// treated as disconnected rather than allowed to back-pressure the hub.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

pub type OutboundSender = mpsc::Sender<OutboundEvent>;
pub type OutboundReceiver = mpsc::Receiver<OutboundEvent>;

#[derive(Default)]
struct Registry {
    /// incident id -> subscribed session ids.
    rooms: HashMap<Uuid, HashSet<Uuid>>,
    /// session id -> incident ids it is subscribed to (for O(1) cleanup).
    session_rooms: HashMap<Uuid, HashSet<Uuid>>,
    /// session id -> outbound queue.
    senders: HashMap<Uuid, OutboundSender>,
}

#[derive(Default)]
pub struct RoomHub {
    inner: RwLock<Registry>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a brand-new session and returns the receiving half of its
    /// outbound queue. Call once per WebSocket connection.
    pub fn register_session(&self, session_id: Uuid) -> OutboundReceiver {
        let (sender, receiver) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let mut registry = self.inner.write().unwrap();
        registry.senders.insert(session_id, sender);
        receiver
    }

    #[instrument(skip(self))]
    pub fn subscribe(&self, incident_id: Uuid, session_id: Uuid) {
        let mut registry = self.inner.write().unwrap();
        registry.rooms.entry(incident_id).or_default().insert(session_id);
        registry.session_rooms.entry(session_id).or_default().insert(incident_id);
    }

    #[instrument(skip(self))]
    pub fn unsubscribe(&self, incident_id: Uuid, session_id: Uuid) {
        let mut registry = self.inner.write().unwrap();
        if let Some(members) = registry.rooms.get_mut(&incident_id) {
            members.remove(&session_id);
            if members.is_empty() {
                registry.rooms.remove(&incident_id);
            }
        }
        if let Some(rooms) = registry.session_rooms.get_mut(&session_id) {
            rooms.remove(&incident_id);
        }
    }

    /// Removes a session from every room it was in and drops its queue.
    /// Returns the incident ids it had been subscribed to, so the caller
    /// can broadcast `presence:left` / `focus:cleared` for each.
    pub fn remove_session(&self, session_id: Uuid) -> Vec<Uuid> {
        let mut registry = self.inner.write().unwrap();
        registry.senders.remove(&session_id);
        let rooms = registry.session_rooms.remove(&session_id).unwrap_or_default();
        for incident_id in &rooms {
            if let Some(members) = registry.rooms.get_mut(incident_id) {
                members.remove(&session_id);
                if members.is_empty() {
                    registry.rooms.remove(incident_id);
                }
            }
        }
        rooms.into_iter().collect()
    }

    pub fn send_to(&self, session_id: Uuid, event: OutboundEvent) {
        let sender = {
            let registry = self.inner.read().unwrap();
            registry.senders.get(&session_id).cloned()
        };
        let Some(sender) = sender else { return };
        if sender.try_send(event).is_err() {
            warn!(%session_id, "outbound queue full or closed, dropping session");
            self.remove_session(session_id);
        }
    }

    /// Delivers `event` to every session in `incident_id`'s room except
    /// `exclude_session` (if given). Snapshots the subscriber set before
    /// delivering so a slow or disconnecting subscriber cannot hold the
    /// room lock during delivery.
    #[instrument(skip(self, event))]
    pub fn broadcast(&self, incident_id: Uuid, event: OutboundEvent, exclude_session: Option<Uuid>) {
        let (members, senders): (Vec<Uuid>, HashMap<Uuid, OutboundSender>) = {
            let registry = self.inner.read().unwrap();
            let members = registry
                .rooms
                .get(&incident_id)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();
            (members, registry.senders.clone())
        };

        let mut disconnected = Vec::new();
        for session_id in members {
            if Some(session_id) == exclude_session {
                continue;
            }
            let Some(sender) = senders.get(&session_id) else { continue };
            if sender.try_send(event.clone()).is_err() {
                disconnected.push(session_id);
            }
        }

        for session_id in disconnected {
            warn!(%session_id, "outbound queue full or closed, dropping session");
            self.remove_session(session_id);
        }
    }
}
