//! MySQL implementation of the SocialAccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, Executor, MySql, MySqlPool, Row};

use lc_core::domain::entities::social_account::{NewSocialAccount, SocialAccount};
use lc_core::domain::entities::user::UserId;
use lc_core::errors::DomainError;
use lc_core::repositories::SocialAccountRepository;

use super::{column_error, map_db_error};

const SOCIAL_ACCOUNT_COLUMNS: &str = r#"
    id, user_id, provider, provider_user_id, provider_username,
    access_token, refresh_token, is_primary, linked_at, last_used_at
"#;

pub struct MySqlSocialAccountRepository {
    pool: MySqlPool,
}

impl MySqlSocialAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn row_to_social_account(row: &MySqlRow) -> Result<SocialAccount, DomainError> {
    Ok(SocialAccount {
        id: row.try_get("id").map_err(|e| column_error("id", e))?,
        user_id: row.try_get("user_id").map_err(|e| column_error("user_id", e))?,
        provider: row.try_get("provider").map_err(|e| column_error("provider", e))?,
        provider_user_id: row
            .try_get("provider_user_id")
            .map_err(|e| column_error("provider_user_id", e))?,
        provider_username: row
            .try_get("provider_username")
            .map_err(|e| column_error("provider_username", e))?,
        access_token: row
            .try_get("access_token")
            .map_err(|e| column_error("access_token", e))?,
        refresh_token: row
            .try_get("refresh_token")
            .map_err(|e| column_error("refresh_token", e))?,
        is_primary: row.try_get("is_primary").map_err(|e| column_error("is_primary", e))?,
        linked_at: row
            .try_get::<DateTime<Utc>, _>("linked_at")
            .map_err(|e| column_error("linked_at", e))?,
        last_used_at: row
            .try_get::<DateTime<Utc>, _>("last_used_at")
            .map_err(|e| column_error("last_used_at", e))?,
    })
}

pub(crate) async fn insert_social_account<'e, E>(
    executor: E,
    user_id: UserId,
    account: NewSocialAccount,
) -> Result<SocialAccount, DomainError>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO social_accounts (
            user_id, provider, provider_user_id, provider_username,
            access_token, is_primary, linked_at, last_used_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&account.provider)
    .bind(&account.provider_user_id)
    .bind(&account.provider_username)
    .bind(&account.access_token)
    .bind(account.is_primary)
    .bind(account.linked_at)
    .bind(account.linked_at)
    .execute(executor)
    .await
    .map_err(|e| map_db_error("insert social account", e))?;

    Ok(SocialAccount::from_new(result.last_insert_id() as i64, user_id, account))
}

#[async_trait]
impl SocialAccountRepository for MySqlSocialAccountRepository {
    async fn find_by_provider(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<SocialAccount>, DomainError> {
        let sql = format!(
            "SELECT {} FROM social_accounts WHERE provider = ? AND provider_user_id = ?",
            SOCIAL_ACCOUNT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(provider)
            .bind(provider_user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("find social account", e))?;

        row.as_ref().map(row_to_social_account).transpose()
    }

    async fn record_use(
        &self,
        id: i64,
        access_token: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE social_accounts
            SET access_token = COALESCE(?, access_token), last_used_at = ?
            WHERE id = ?
            "#,
        )
        .bind(access_token)
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("update social account", e))?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<SocialAccount>, DomainError> {
        let sql = format!(
            "SELECT {} FROM social_accounts WHERE user_id = ? ORDER BY linked_at",
            SOCIAL_ACCOUNT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("list social accounts", e))?;

        rows.iter().map(row_to_social_account).collect()
    }
}
