// [apps/server/src/state/focus_registry.rs]
//! In-memory-only focus (cursor) tracking, one entry per principal
//! globally, throttled (spec §4.6).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;
use warroom_domain::focus::{FocusEntry, FocusSection};

use crate::services::color::color_for;

struct ThrottleMark {
    at: Instant,
    session_id: Uuid,
}

pub struct FocusRegistry {
    entries: RwLock<HashMap<Uuid, FocusEntry>>,
    throttle: RwLock<HashMap<Uuid, ThrottleMark>>,
    window: Duration,
}

impl FocusRegistry {
    pub fn new(throttle_millis: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            throttle: RwLock::new(HashMap::new()),
            window: Duration::from_millis(throttle_millis.max(0) as u64),
        }
    }

    /// Returns the new entry, or `None` if the update was dropped by the
    /// throttle. A session-id change for the same principal (reconnect)
    /// always resets the throttle window.
    pub fn update(
        &self,
        principal_id: Uuid,
        incident_id: Uuid,
        session_id: Uuid,
        section: FocusSection,
        field_id: Option<String>,
    ) -> Option<FocusEntry> {
        {
            let mut throttle = self.throttle.write().unwrap();
            match throttle.get(&principal_id) {
                Some(mark) if mark.session_id == session_id && mark.at.elapsed() < self.window => {
                    return None;
                }
                _ => {
                    throttle.insert(principal_id, ThrottleMark { at: Instant::now(), session_id });
                }
            }
        }

        let entry = FocusEntry {
            principal_id,
            incident_id,
            section,
            field_id,
            color: color_for(principal_id),
            last_update: Utc::now(),
        };

        self.entries.write().unwrap().insert(principal_id, entry.clone());
        Some(entry)
    }

    pub fn clear(&self, principal_id: Uuid) -> Option<FocusEntry> {
        self.entries.write().unwrap().remove(&principal_id)
    }

    /// Clears the entry only if it belongs to `incident_id`. Focus is keyed
    /// globally per principal, so leaving one room must not disturb a focus
    /// entry the principal holds in a different room.
    pub fn clear_for_incident(&self, principal_id: Uuid, incident_id: Uuid) -> Option<FocusEntry> {
        let mut entries = self.entries.write().unwrap();
        if entries.get(&principal_id).is_some_and(|entry| entry.incident_id == incident_id) {
            entries.remove(&principal_id)
        } else {
            None
        }
    }

    pub fn list_for_incident(&self, incident_id: Uuid) -> Vec<FocusEntry> {
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|entry| entry.incident_id == incident_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_update_within_window_from_same_session_is_dropped() {
        let registry = FocusRegistry::new(1000);
        let principal = Uuid::new_v4();
        let incident = Uuid::new_v4();
        let session = Uuid::new_v4();

        assert!(registry
            .update(principal, incident, session, FocusSection::Notes, None)
            .is_some());
        assert!(registry
            .update(principal, incident, session, FocusSection::Notes, None)
            .is_none());
    }

    #[test]
    fn a_new_session_id_resets_the_throttle() {
        let registry = FocusRegistry::new(60_000);
        let principal = Uuid::new_v4();
        let incident = Uuid::new_v4();

        assert!(registry
            .update(principal, incident, Uuid::new_v4(), FocusSection::Notes, None)
            .is_some());
        assert!(registry
            .update(principal, incident, Uuid::new_v4(), FocusSection::Notes, None)
            .is_some());
    }

    #[test]
    fn clear_removes_the_entry() {
        let registry = FocusRegistry::new(0);
        let principal = Uuid::new_v4();
        registry.update(principal, Uuid::new_v4(), Uuid::new_v4(), FocusSection::Status, None);
        assert!(registry.clear(principal).is_some());
        assert!(registry.clear(principal).is_none());
    }
}
