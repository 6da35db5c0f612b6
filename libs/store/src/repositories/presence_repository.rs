// [libs/store/src/repositories/presence_repository.rs]
//! Write-through persistence for presence entries (spec §4.5, [ADDED]).
//! The in-memory `PresenceRegistry` in `apps/server` is authoritative for
//! request-path latency; this table exists so a restart doesn't silently
//! forget who was recently active in a room, and is reconciled against the
//! in-memory registry on boot.

use chrono::{DateTime, Utc};
use libsql::{params, Row};
use tracing::instrument;
use uuid::Uuid;
use warroom_domain::presence::PresenceEntry;

use crate::client::StoreClient;
use crate::errors::StoreError;

pub struct PresenceRepository {
    client: StoreClient,
}

impl PresenceRepository {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, entry))]
    pub async fn upsert(&self, entry: &PresenceEntry) -> Result<(), StoreError> {
        let connection = self.client.connection()?;
        connection
            .execute(
                r#"
                INSERT INTO presence_entries (principal_id, incident_id, session_id, display_name, last_active_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(principal_id, incident_id) DO UPDATE SET
                    session_id = excluded.session_id,
                    display_name = excluded.display_name,
                    last_active_at = excluded.last_active_at
                "#,
                params![
                    entry.principal_id.to_string(),
                    entry.incident_id.to_string(),
                    entry.session_id.to_string(),
                    entry.display_name.clone(),
                    entry.last_active_at.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn remove(&self, incident_id: Uuid, principal_id: Uuid) -> Result<(), StoreError> {
        let connection = self.client.connection()?;
        connection
            .execute(
                "DELETE FROM presence_entries WHERE incident_id = ?1 AND principal_id = ?2",
                params![incident_id.to_string(), principal_id.to_string()],
            )
            .await?;
        Ok(())
    }

    pub async fn remove_by_session(&self, session_id: Uuid) -> Result<(), StoreError> {
        let connection = self.client.connection()?;
        connection
            .execute(
                "DELETE FROM presence_entries WHERE session_id = ?1",
                params![session_id.to_string()],
            )
            .await?;
        Ok(())
    }

    pub async fn list_for_incident(&self, incident_id: Uuid) -> Result<Vec<PresenceEntry>, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT principal_id, incident_id, session_id, display_name, last_active_at FROM presence_entries WHERE incident_id = ?1",
                params![incident_id.to_string()],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// Deletes entries whose `last_active_at` is older than `cutoff`.
    /// Returns the number removed, for the sweeper's log line.
    pub async fn sweep_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let connection = self.client.connection()?;
        let affected = connection
            .execute(
                "DELETE FROM presence_entries WHERE last_active_at < ?1",
                params![cutoff.to_rfc3339()],
            )
            .await?;
        Ok(affected)
    }
}

fn row_to_entry(row: &Row) -> Result<PresenceEntry, StoreError> {
    let principal_id: String = row.get(0)?;
    let incident_id: String = row.get(1)?;
    let session_id: String = row.get(2)?;
    let last_active_at: String = row.get(4)?;

    Ok(PresenceEntry {
        principal_id: principal_id.parse().map_err(|_| StoreError::Mapping("bad principal_id".into()))?,
        incident_id: incident_id.parse().map_err(|_| StoreError::Mapping("bad incident_id".into()))?,
        session_id: session_id.parse().map_err(|_| StoreError::Mapping("bad session_id".into()))?,
        display_name: row.get(3)?,
        last_active_at: DateTime::parse_from_rfc3339(&last_active_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| StoreError::Mapping(err.to_string()))?,
    })
}
