// [libs/store/src/schema.rs]
//! Schema bootstrap. Tables are created idempotently on connect; there is
//! no migration framework since the schema is small and stable enough to
//! be managed by hand for now.

use libsql::Connection;
use tracing::{debug, instrument};

const TABLES: &[(&str, &str)] = &[
    (
        "accounts",
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
    "#,
    ),
    (
        "incidents",
        r#"
        CREATE TABLE IF NOT EXISTS incidents (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            severity TEXT NOT NULL,
            status TEXT NOT NULL,
            created_by TEXT NOT NULL,
            commander TEXT NOT NULL,
            assignees TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            resolved_at TEXT
        );
    "#,
    ),
    (
        "updates",
        r#"
        CREATE TABLE IF NOT EXISTS updates (
            id TEXT PRIMARY KEY,
            incident_id TEXT NOT NULL,
            author_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            kind TEXT NOT NULL,
            content TEXT NOT NULL
        );
    "#,
    ),
    (
        "presence_entries",
        r#"
        CREATE TABLE IF NOT EXISTS presence_entries (
            principal_id TEXT NOT NULL,
            incident_id TEXT NOT NULL,
            session_id TEXT NOT NULL,
            display_name TEXT NOT NULL,
            last_active_at TEXT NOT NULL,
            PRIMARY KEY (principal_id, incident_id)
        );
    "#,
    ),
];

const INDEXES: &[(&str, &str)] = &[
    (
        "idx_updates_incident",
        "CREATE INDEX IF NOT EXISTS idx_updates_incident ON updates(incident_id, created_at);",
    ),
    (
        "idx_incidents_status",
        "CREATE INDEX IF NOT EXISTS idx_incidents_status ON incidents(status);",
    ),
];

#[instrument(skip(connection))]
pub async fn apply(connection: &Connection) -> Result<(), libsql::Error> {
    for (name, sql) in TABLES {
        debug!(table = name, "applying schema");
        connection.execute(sql, ()).await?;
    }
    for (name, sql) in INDEXES {
        debug!(index = name, "applying index");
        connection.execute(sql, ()).await?;
    }
    Ok(())
}
