// [libs/store/src/repositories/user_repository.rs]
use chrono::{DateTime, Utc};
use libsql::{params, Row};
use tracing::instrument;
use uuid::Uuid;
use warroom_domain::principal::Role;

use crate::client::StoreClient;
use crate::errors::StoreError;
use crate::models::Account;

pub struct UserRepository {
    client: StoreClient,
}

impl UserRepository {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, password_hash))]
    pub async fn create(
        &self,
        display_name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, StoreError> {
        let account = Account {
            id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            email: email.to_lowercase(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };

        let connection = self.client.connection()?;
        let outcome = connection
            .execute(
                "INSERT INTO accounts (id, display_name, email, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    account.id.to_string(),
                    account.display_name.clone(),
                    account.email.clone(),
                    account.password_hash.clone(),
                    account.role.as_str(),
                    account.created_at.to_rfc3339(),
                ],
            )
            .await;

        match outcome {
            Ok(_) => Ok(account),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict("email already registered")),
            Err(err) => Err(StoreError::Query(err)),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Account, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT id, display_name, email, password_hash, role, created_at FROM accounts WHERE email = ?1",
                params![email.to_lowercase()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_account(&row),
            None => Err(StoreError::NotFound("account")),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT id, display_name, email, password_hash, role, created_at FROM accounts WHERE id = ?1",
                params![id.to_string()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_account(&row),
            None => Err(StoreError::NotFound("account")),
        }
    }

    pub async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let connection = self.client.connection()?;
        let mut rows = connection
            .query(
                "SELECT id, display_name, email, password_hash, role, created_at FROM accounts ORDER BY created_at ASC",
                (),
            )
            .await?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next().await? {
            accounts.push(row_to_account(&row)?);
        }
        Ok(accounts)
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, StoreError> {
        let connection = self.client.connection()?;
        let affected = connection
            .execute(
                "UPDATE accounts SET role = ?2 WHERE id = ?1",
                params![id.to_string(), role.as_str()],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound("account"));
        }
        self.find_by_id(id).await
    }
}

fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

fn row_to_account(row: &Row) -> Result<Account, StoreError> {
    let id: String = row.get(0)?;
    let role: String = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(Account {
        id: id.parse().map_err(|_| StoreError::Mapping("bad account id".into()))?,
        display_name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: role.parse().map_err(|_| StoreError::Mapping("bad role".into()))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| StoreError::Mapping(err.to_string()))?,
    })
}
