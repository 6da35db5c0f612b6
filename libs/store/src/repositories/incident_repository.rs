// [libs/store/src/repositories/incident_repository.rs]
use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};
use tracing::{info, instrument};
use uuid::Uuid;
use warroom_domain::incident::{Incident, Severity, Status};
use warroom_domain::update::{AssignmentAction, Update, UpdateContent};

use crate::client::StoreClient;
use crate::errors::StoreError;

pub struct IncidentRepository {
    client: StoreClient,
}

impl IncidentRepository {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, title, description))]
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        severity: Severity,
        created_by: Uuid,
        commander: Uuid,
    ) -> Result<Incident, StoreError> {
        let incident = Incident {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(str::to_string),
            severity,
            status: Status::Investigating,
            created_by,
            commander,
            assignees: Vec::new(),
            created_at: Utc::now(),
            resolved_at: None,
        };

        let connection = self.client.connection()?;
        let transaction = connection.transaction().await?;
        transaction
            .execute(
                r#"
                INSERT INTO incidents
                    (id, title, description, severity, status, created_by, commander, assignees, created_at, resolved_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    incident.id.to_string(),
                    incident.title.clone(),
                    incident.description.clone(),
                    incident.severity.as_str(),
                    incident.status.as_str(),
                    incident.created_by.to_string(),
                    incident.commander.to_string(),
                    serde_json::to_string(&incident.assignees).unwrap(),
                    incident.created_at.to_rfc3339(),
                    None::<String>,
                ],
            )
            .await?;

        let seed_update = Update {
            id: Uuid::new_v4(),
            incident_id: incident.id,
            author_id: created_by,
            created_at: incident.created_at,
            content: UpdateContent::StatusChange {
                previous_status: None,
                new_status: Status::Investigating,
            },
        };
        insert_update(&transaction, &seed_update).await?;
        transaction.commit().await?;

        info!(incident_id = %incident.id, "incident created");
        Ok(incident)
    }

    pub async fn get(&self, incident_id: Uuid) -> Result<Incident, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT id, title, description, severity, status, created_by, commander, assignees, created_at, resolved_at FROM incidents WHERE id = ?1",
                params![incident_id.to_string()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_incident(&row),
            None => Err(StoreError::NotFound("incident")),
        }
    }

    pub async fn list(&self) -> Result<Vec<Incident>, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT id, title, description, severity, status, created_by, commander, assignees, created_at, resolved_at FROM incidents ORDER BY created_at DESC",
                (),
            )
            .await?;
        let mut incidents = Vec::new();
        while let Some(row) = rows.next().await? {
            incidents.push(row_to_incident(&row)?);
        }
        Ok(incidents)
    }

    pub async fn list_updates(&self, incident_id: Uuid) -> Result<Vec<Update>, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT id, incident_id, author_id, created_at, content FROM updates WHERE incident_id = ?1 ORDER BY created_at ASC, id ASC",
                params![incident_id.to_string()],
            )
            .await?;
        let mut updates = Vec::new();
        while let Some(row) = rows.next().await? {
            updates.push(row_to_update(&row)?);
        }
        Ok(updates)
    }

    /// Changes an incident's status and records the transition as an
    /// update, atomically. `resolved_at` is stamped the first time an
    /// incident reaches `Resolved` and is never cleared afterward, even if
    /// it is later reopened — it marks whether the incident has ever been
    /// resolved, not whether it is currently resolved.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        incident_id: Uuid,
        author_id: Uuid,
        new_status: Status,
    ) -> Result<(Incident, Update), StoreError> {
        let connection = self.client.connection()?;
        let transaction = connection.transaction().await?;

        let incident = load_incident_for_update(&transaction, incident_id).await?;
        let resolved_at = match incident.resolved_at {
            Some(existing) => Some(existing),
            None if matches!(new_status, Status::Resolved) => Some(Utc::now()),
            None => None,
        };

        transaction
            .execute(
                "UPDATE incidents SET status = ?2, resolved_at = ?3 WHERE id = ?1",
                params![
                    incident_id.to_string(),
                    new_status.as_str(),
                    resolved_at.map(|dt| dt.to_rfc3339()),
                ],
            )
            .await?;

        let update = Update {
            id: Uuid::new_v4(),
            incident_id,
            author_id,
            created_at: Utc::now(),
            content: UpdateContent::StatusChange {
                previous_status: Some(incident.status),
                new_status,
            },
        };
        insert_update(&transaction, &update).await?;

        transaction.commit().await?;

        Ok((
            Incident {
                status: new_status,
                resolved_at,
                ..incident
            },
            update,
        ))
    }

    #[instrument(skip(self, text))]
    pub async fn add_note(
        &self,
        incident_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<(Incident, Update), StoreError> {
        let connection = self.client.connection()?;
        let transaction = connection.transaction().await?;

        let incident = load_incident_for_update(&transaction, incident_id).await?;
        let update = Update {
            id: Uuid::new_v4(),
            incident_id,
            author_id,
            created_at: Utc::now(),
            content: UpdateContent::Note {
                text: text.to_string(),
            },
        };
        insert_update(&transaction, &update).await?;
        transaction.commit().await?;

        Ok((incident, update))
    }

    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        incident_id: Uuid,
        author_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<(Incident, Update), StoreError> {
        self.mutate_assignment(incident_id, author_id, target_user_id, AssignmentAction::Assigned)
            .await
    }

    #[instrument(skip(self))]
    pub async fn unassign(
        &self,
        incident_id: Uuid,
        author_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<(Incident, Update), StoreError> {
        self.mutate_assignment(incident_id, author_id, target_user_id, AssignmentAction::Unassigned)
            .await
    }

    async fn mutate_assignment(
        &self,
        incident_id: Uuid,
        author_id: Uuid,
        target_user_id: Uuid,
        action: AssignmentAction,
    ) -> Result<(Incident, Update), StoreError> {
        let connection = self.client.connection()?;
        let transaction = connection.transaction().await?;

        let incident = load_incident_for_update(&transaction, incident_id).await?;
        let mut assignees = incident.assignees.clone();
        match action {
            AssignmentAction::Assigned => {
                if assignees.contains(&target_user_id) {
                    return Err(StoreError::Conflict("user is already assigned"));
                }
                assignees.push(target_user_id);
            }
            AssignmentAction::Unassigned => {
                if !assignees.contains(&target_user_id) {
                    return Err(StoreError::Conflict("user is not assigned"));
                }
                assignees.retain(|id| *id != target_user_id);
            }
        }

        transaction
            .execute(
                "UPDATE incidents SET assignees = ?2 WHERE id = ?1",
                params![incident_id.to_string(), serde_json::to_string(&assignees).unwrap()],
            )
            .await?;

        let update = Update {
            id: Uuid::new_v4(),
            incident_id,
            author_id,
            created_at: Utc::now(),
            content: UpdateContent::Assignment { action, target_user_id },
        };
        insert_update(&transaction, &update).await?;
        transaction.commit().await?;

        Ok((Incident { assignees, ..incident }, update))
    }

    #[instrument(skip(self, text))]
    pub async fn add_action_item(
        &self,
        incident_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<(Incident, Update), StoreError> {
        let connection = self.client.connection()?;
        let transaction = connection.transaction().await?;

        let incident = load_incident_for_update(&transaction, incident_id).await?;
        let update = Update {
            id: Uuid::new_v4(),
            incident_id,
            author_id,
            created_at: Utc::now(),
            content: UpdateContent::ActionItem {
                text: text.to_string(),
                completed: false,
            },
        };
        insert_update(&transaction, &update).await?;
        transaction.commit().await?;

        Ok((incident, update))
    }

    #[instrument(skip(self))]
    pub async fn toggle_action_item(
        &self,
        incident_id: Uuid,
        update_id: Uuid,
        completed: bool,
    ) -> Result<(Incident, Update), StoreError> {
        let connection = self.client.connection()?;
        let transaction = connection.transaction().await?;

        let incident = load_incident_for_update(&transaction, incident_id).await?;

        let mut rows = transaction
            .query(
                "SELECT id, incident_id, author_id, created_at, content FROM updates WHERE id = ?1",
                params![update_id.to_string()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(StoreError::NotFound("action item"))?;
        let mut existing = row_to_update(&row)?;
        let text = match &existing.content {
            UpdateContent::ActionItem { text, .. } => text.clone(),
            _ => return Err(StoreError::Mapping("update is not an action item".into())),
        };
        existing.content = UpdateContent::ActionItem { text, completed };

        transaction
            .execute(
                "UPDATE updates SET content = ?2 WHERE id = ?1",
                params![update_id.to_string(), serde_json::to_string(&existing.content).unwrap()],
            )
            .await?;
        transaction.commit().await?;

        Ok((incident, existing))
    }
}

async fn load_incident_for_update(connection: &Connection, incident_id: Uuid) -> Result<Incident, StoreError> {
    let mut rows = connection
        .query(
            "SELECT id, title, description, severity, status, created_by, commander, assignees, created_at, resolved_at FROM incidents WHERE id = ?1",
            params![incident_id.to_string()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_incident(&row),
        None => Err(StoreError::NotFound("incident")),
    }
}

async fn insert_update(connection: &Connection, update: &Update) -> Result<(), libsql::Error> {
    connection
        .execute(
            "INSERT INTO updates (id, incident_id, author_id, created_at, kind, content) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                update.id.to_string(),
                update.incident_id.to_string(),
                update.author_id.to_string(),
                update.created_at.to_rfc3339(),
                update.content.kind(),
                serde_json::to_string(&update.content).unwrap(),
            ],
        )
        .await?;
    Ok(())
}

fn row_to_incident(row: &Row) -> Result<Incident, StoreError> {
    let id: String = row.get(0)?;
    let description: Option<String> = row.get(2)?;
    let severity: String = row.get(3)?;
    let status: String = row.get(4)?;
    let created_by: String = row.get(5)?;
    let commander: String = row.get(6)?;
    let assignees: String = row.get(7)?;
    let created_at: String = row.get(8)?;
    let resolved_at: Option<String> = row.get(9)?;

    Ok(Incident {
        id: parse_uuid(&id)?,
        title: row.get(1)?,
        description,
        severity: severity.parse().map_err(|_| StoreError::Mapping("bad severity".into()))?,
        status: status.parse().map_err(|_| StoreError::Mapping("bad status".into()))?,
        created_by: parse_uuid(&created_by)?,
        commander: parse_uuid(&commander)?,
        assignees: serde_json::from_str(&assignees).map_err(|err| StoreError::Mapping(err.to_string()))?,
        created_at: parse_timestamp(&created_at)?,
        resolved_at: resolved_at.map(|raw| parse_timestamp(&raw)).transpose()?,
    })
}

fn row_to_update(row: &Row) -> Result<Update, StoreError> {
    let id: String = row.get(0)?;
    let incident_id: String = row.get(1)?;
    let author_id: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let content: String = row.get(4)?;

    Ok(Update {
        id: parse_uuid(&id)?,
        incident_id: parse_uuid(&incident_id)?,
        author_id: parse_uuid(&author_id)?,
        created_at: parse_timestamp(&created_at)?,
        content: serde_json::from_str(&content).map_err(|err| StoreError::Mapping(err.to_string()))?,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    raw.parse().map_err(|_| StoreError::Mapping(format!("invalid uuid: {raw}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Mapping(err.to_string()))
}
