//! MySQL implementation of the LoginHistoryRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use lc_core::domain::entities::login_history::{LoginHistory, LoginStatus, NewLoginHistory};
use lc_core::domain::entities::user::UserId;
use lc_core::errors::DomainError;
use lc_core::repositories::LoginHistoryRepository;

use super::{column_error, map_db_error};

pub struct MySqlLoginHistoryRepository {
    pool: MySqlPool,
}

impl MySqlLoginHistoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn row_to_history(row: &MySqlRow) -> Result<LoginHistory, DomainError> {
    let status: String = row.try_get("status").map_err(|e| column_error("status", e))?;
    let status = LoginStatus::parse(&status)
        .ok_or_else(|| DomainError::internal(format!("unknown login status: {}", status)))?;

    Ok(LoginHistory {
        id: row.try_get("id").map_err(|e| column_error("id", e))?,
        user_id: row.try_get("user_id").map_err(|e| column_error("user_id", e))?,
        login_method: row
            .try_get("login_method")
            .map_err(|e| column_error("login_method", e))?,
        provider_user_id: row
            .try_get("provider_user_id")
            .map_err(|e| column_error("provider_user_id", e))?,
        ip_address: row.try_get("ip_address").map_err(|e| column_error("ip_address", e))?,
        user_agent: row.try_get("user_agent").map_err(|e| column_error("user_agent", e))?,
        device_type: row.try_get("device_type").map_err(|e| column_error("device_type", e))?,
        status,
        failure_reason: row
            .try_get("failure_reason")
            .map_err(|e| column_error("failure_reason", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| column_error("created_at", e))?,
    })
}

#[async_trait]
impl LoginHistoryRepository for MySqlLoginHistoryRepository {
    async fn append(&self, entry: NewLoginHistory) -> Result<LoginHistory, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO login_history (
                user_id, login_method, provider_user_id, ip_address,
                user_agent, device_type, status, failure_reason, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.login_method)
        .bind(&entry.provider_user_id)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.device_type)
        .bind(entry.status.as_str())
        .bind(&entry.failure_reason)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("append login history", e))?;

        Ok(LoginHistory::from_new(result.last_insert_id() as i64, entry))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<LoginHistory>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, login_method, provider_user_id, ip_address,
                   user_agent, device_type, status, failure_reason, created_at
            FROM login_history
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit as u64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list login history", e))?;

        rows.iter().map(row_to_history).collect()
    }
}
