//! MySQL implementation of the SessionRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, Executor, MySql, MySqlPool, Row};

use lc_core::domain::entities::session::{NewSession, Session, SessionId};
use lc_core::domain::entities::user::UserId;
use lc_core::errors::DomainError;
use lc_core::repositories::SessionRepository;

use super::{column_error, map_db_error};

const SESSION_COLUMNS: &str = r#"
    id, user_id, access_token_jti, refresh_token_jti, device_type, device_name,
    ip_address, user_agent, is_active, expires_at, created_at, last_activity_at
"#;

pub struct MySqlSessionRepository {
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, condition: &str, value: &str) -> Result<Option<Session>, DomainError> {
        let sql = format!("SELECT {} FROM sessions WHERE {}", SESSION_COLUMNS, condition);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("find session", e))?;

        row.as_ref().map(row_to_session).transpose()
    }
}

fn row_to_session(row: &MySqlRow) -> Result<Session, DomainError> {
    Ok(Session {
        id: row.try_get("id").map_err(|e| column_error("id", e))?,
        user_id: row.try_get("user_id").map_err(|e| column_error("user_id", e))?,
        access_token_jti: row
            .try_get("access_token_jti")
            .map_err(|e| column_error("access_token_jti", e))?,
        refresh_token_jti: row
            .try_get("refresh_token_jti")
            .map_err(|e| column_error("refresh_token_jti", e))?,
        device_type: row.try_get("device_type").map_err(|e| column_error("device_type", e))?,
        device_name: row.try_get("device_name").map_err(|e| column_error("device_name", e))?,
        ip_address: row.try_get("ip_address").map_err(|e| column_error("ip_address", e))?,
        user_agent: row.try_get("user_agent").map_err(|e| column_error("user_agent", e))?,
        is_active: row.try_get("is_active").map_err(|e| column_error("is_active", e))?,
        expires_at: row
            .try_get::<DateTime<Utc>, _>("expires_at")
            .map_err(|e| column_error("expires_at", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| column_error("created_at", e))?,
        last_activity_at: row
            .try_get::<DateTime<Utc>, _>("last_activity_at")
            .map_err(|e| column_error("last_activity_at", e))?,
    })
}

pub(crate) async fn insert_session<'e, E>(
    executor: E,
    user_id: UserId,
    session: NewSession,
) -> Result<Session, DomainError>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO sessions (
            user_id, access_token_jti, refresh_token_jti, device_type, device_name,
            ip_address, user_agent, is_active, expires_at, created_at, last_activity_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&session.access_token_jti)
    .bind(&session.refresh_token_jti)
    .bind(&session.device_type)
    .bind(&session.device_name)
    .bind(&session.ip_address)
    .bind(&session.user_agent)
    .bind(session.expires_at)
    .bind(session.created_at)
    .bind(session.created_at)
    .execute(executor)
    .await
    .map_err(|e| map_db_error("insert session", e))?;

    Ok(Session::from_new(result.last_insert_id() as SessionId, user_id, session))
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        session: NewSession,
    ) -> Result<Session, DomainError> {
        insert_session(&self.pool, user_id, session).await
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, DomainError> {
        let sql = format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("find session by id", e))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn find_active_by_refresh_jti(&self, jti: &str) -> Result<Option<Session>, DomainError> {
        self.find_where("refresh_token_jti = ? AND is_active = TRUE", jti).await
    }

    async fn find_by_access_jti(&self, jti: &str) -> Result<Option<Session>, DomainError> {
        self.find_where("access_token_jti = ?", jti).await
    }

    async fn rotate_access_token(
        &self,
        id: SessionId,
        new_access_jti: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE sessions SET access_token_jti = ?, last_activity_at = ? WHERE id = ?",
        )
        .bind(new_access_jti)
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("rotate access token", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("session {}", id),
            });
        }
        Ok(())
    }

    async fn deactivate_by_refresh_jti(&self, jti: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE sessions SET is_active = FALSE WHERE refresh_token_jti = ? AND is_active = TRUE",
        )
        .bind(jti)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("deactivate session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn deactivate(&self, id: SessionId) -> Result<(), DomainError> {
        sqlx::query("UPDATE sessions SET is_active = FALSE WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deactivate session", e))?;
        Ok(())
    }

    async fn list_active_for_user(&self, user_id: UserId) -> Result<Vec<Session>, DomainError> {
        let sql = format!(
            "SELECT {} FROM sessions WHERE user_id = ? AND is_active = TRUE ORDER BY last_activity_at DESC",
            SESSION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("list sessions", e))?;

        rows.iter().map(row_to_session).collect()
    }
}
