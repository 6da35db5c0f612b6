// [apps/server/src/state/presence_registry.rs]
//! Per-incident presence tracking with a reverse session index for O(1)
//! disconnect cleanup (spec §4.5). The in-memory map is the fast path for
//! request handling; `warroom_store::PresenceRepository` is a write-through
//! cache behind it so presence survives a restart within the TTL window.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::instrument;
use uuid::Uuid;
use warroom_domain::presence::PresenceEntry;
use warroom_store::{PresenceRepository, StoreError};

pub struct PresenceRegistry {
    /// incident id -> principal id -> entry.
    entries: RwLock<HashMap<Uuid, HashMap<Uuid, PresenceEntry>>>,
    /// session id -> (incident id, principal id) pairs owned by that session.
    session_index: RwLock<HashMap<Uuid, HashSet<(Uuid, Uuid)>>>,
    store: PresenceRepository,
    ttl: ChronoDuration,
}

impl PresenceRegistry {
    pub fn new(store: PresenceRepository, ttl_seconds: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            session_index: RwLock::new(HashMap::new()),
            store,
            ttl: ChronoDuration::seconds(ttl_seconds.max(0)),
        }
    }

    /// Replaces any prior entry for this (principal, incident) pair — a
    /// later join under a new session id must not leave a ghost entry.
    #[instrument(skip(self, display_name))]
    pub async fn join(
        &self,
        incident_id: Uuid,
        principal_id: Uuid,
        session_id: Uuid,
        display_name: &str,
    ) -> Result<PresenceEntry, StoreError> {
        let entry = PresenceEntry {
            principal_id,
            incident_id,
            session_id,
            last_active_at: Utc::now(),
            display_name: display_name.to_string(),
        };

        self.store.upsert(&entry).await?;

        let previous_session = {
            let mut entries = self.entries.write().unwrap();
            let room = entries.entry(incident_id).or_default();
            room.insert(principal_id, entry.clone()).map(|old| old.session_id)
        };

        let mut index = self.session_index.write().unwrap();
        if let Some(previous_session) = previous_session {
            if let Some(pairs) = index.get_mut(&previous_session) {
                pairs.remove(&(incident_id, principal_id));
            }
        }
        index.entry(session_id).or_default().insert((incident_id, principal_id));

        Ok(entry)
    }

    pub async fn leave(&self, incident_id: Uuid, principal_id: Uuid) -> Result<(), StoreError> {
        self.store.remove(incident_id, principal_id).await?;
        let session_id = {
            let mut entries = self.entries.write().unwrap();
            entries
                .get_mut(&incident_id)
                .and_then(|room| room.remove(&principal_id))
                .map(|entry| entry.session_id)
        };
        if let Some(session_id) = session_id {
            if let Some(pairs) = self.session_index.write().unwrap().get_mut(&session_id) {
                pairs.remove(&(incident_id, principal_id));
            }
        }
        Ok(())
    }

    pub async fn heartbeat(&self, incident_id: Uuid, principal_id: Uuid) -> Result<(), StoreError> {
        let existing = {
            let entries = self.entries.read().unwrap();
            entries.get(&incident_id).and_then(|room| room.get(&principal_id)).cloned()
        };
        let Some(mut entry) = existing else {
            return Ok(());
        };
        entry.last_active_at = Utc::now();
        self.store.upsert(&entry).await?;
        self.entries
            .write()
            .unwrap()
            .get_mut(&incident_id)
            .map(|room| room.insert(principal_id, entry));
        Ok(())
    }

    /// Removes every presence entry owned by a disconnecting session.
    /// Returns the (incident id, principal id) pairs removed so the caller
    /// can broadcast `presence:left` for each.
    pub async fn remove_by_session(&self, session_id: Uuid) -> Vec<(Uuid, Uuid)> {
        let pairs: Vec<(Uuid, Uuid)> = self
            .session_index
            .write()
            .unwrap()
            .remove(&session_id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();

        let mut entries = self.entries.write().unwrap();
        for (incident_id, principal_id) in &pairs {
            if let Some(room) = entries.get_mut(incident_id) {
                room.remove(principal_id);
            }
        }
        drop(entries);

        for (incident_id, principal_id) in &pairs {
            let _ = self.store.remove(*incident_id, *principal_id).await;
        }

        pairs
    }

    /// Incident ids a principal currently holds presence in, regardless of
    /// which session. Used by `presence:heartbeat`, which carries no
    /// incident id of its own and so refreshes every room the caller is in.
    pub fn session_incident_ids(&self, principal_id: Uuid) -> Vec<Uuid> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|(_, room)| room.contains_key(&principal_id))
            .map(|(incident_id, _)| *incident_id)
            .collect()
    }

    pub fn list(&self, incident_id: Uuid) -> Vec<PresenceEntry> {
        self.entries
            .read()
            .unwrap()
            .get(&incident_id)
            .map(|room| room.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Sweeps entries whose `last_active_at` is past the TTL. Returns the
    /// (incident id, principal id) pairs removed.
    pub async fn sweep_expired(&self) -> Result<Vec<(Uuid, Uuid)>, StoreError> {
        let cutoff = Utc::now() - self.ttl;
        self.store.sweep_expired(cutoff).await?;

        let mut expired = Vec::new();
        let mut entries = self.entries.write().unwrap();
        for (incident_id, room) in entries.iter_mut() {
            room.retain(|principal_id, entry| {
                if entry.last_active_at < cutoff {
                    expired.push((*incident_id, *principal_id));
                    false
                } else {
                    true
                }
            });
        }
        drop(entries);

        if !expired.is_empty() {
            let mut index = self.session_index.write().unwrap();
            for pairs in index.values_mut() {
                pairs.retain(|pair| !expired.contains(pair));
            }
        }

        Ok(expired)
    }
}
