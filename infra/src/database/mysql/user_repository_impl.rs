//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{mysql::MySqlRow, Executor, MySql, MySqlPool, Row};

use lc_core::domain::entities::user::{Gender, NewUser, User, UserId, UserType};
use lc_core::errors::DomainError;
use lc_core::repositories::UserRepository;

use super::{column_error, map_db_error};

pub(crate) const USER_COLUMNS: &str = r#"
    id, username, email, phone_number, password_hash, display_name,
    first_name, last_name, nickname, gender, date_of_birth, avatar_url, bio,
    user_type, is_verified, is_active, preferred_language, country_code,
    timezone, created_at, updated_at, last_login_at
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("find user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

/// Convert a `users` row into the entity
pub(crate) fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
    let user_type: String = row.try_get("user_type").map_err(|e| column_error("user_type", e))?;
    let user_type = user_type.parse::<UserType>().unwrap_or_else(|e| {
        tracing::warn!("{}; treating as viewer", e);
        UserType::Viewer
    });

    let gender: Option<String> = row.try_get("gender").map_err(|e| column_error("gender", e))?;
    let gender = gender
        .map(|g| g.parse::<Gender>().map_err(DomainError::internal))
        .transpose()?;

    Ok(User {
        id: row.try_get("id").map_err(|e| column_error("id", e))?,
        username: row.try_get("username").map_err(|e| column_error("username", e))?,
        email: row.try_get("email").map_err(|e| column_error("email", e))?,
        phone_number: row
            .try_get("phone_number")
            .map_err(|e| column_error("phone_number", e))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| column_error("password_hash", e))?,
        display_name: row
            .try_get("display_name")
            .map_err(|e| column_error("display_name", e))?,
        first_name: row.try_get("first_name").map_err(|e| column_error("first_name", e))?,
        last_name: row.try_get("last_name").map_err(|e| column_error("last_name", e))?,
        nickname: row.try_get("nickname").map_err(|e| column_error("nickname", e))?,
        gender,
        date_of_birth: row
            .try_get::<Option<NaiveDate>, _>("date_of_birth")
            .map_err(|e| column_error("date_of_birth", e))?,
        avatar_url: row.try_get("avatar_url").map_err(|e| column_error("avatar_url", e))?,
        bio: row.try_get("bio").map_err(|e| column_error("bio", e))?,
        user_type,
        is_verified: row.try_get("is_verified").map_err(|e| column_error("is_verified", e))?,
        is_active: row.try_get("is_active").map_err(|e| column_error("is_active", e))?,
        preferred_language: row
            .try_get("preferred_language")
            .map_err(|e| column_error("preferred_language", e))?,
        country_code: row
            .try_get("country_code")
            .map_err(|e| column_error("country_code", e))?,
        timezone: row.try_get("timezone").map_err(|e| column_error("timezone", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| column_error("created_at", e))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| column_error("updated_at", e))?,
        last_login_at: row
            .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
            .map_err(|e| column_error("last_login_at", e))?,
    })
}

/// Insert a user on any executor so the registration transaction can share it
pub(crate) async fn insert_user<'e, E>(executor: E, user: NewUser) -> Result<User, DomainError>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO users (
            username, email, phone_number, password_hash, display_name,
            first_name, last_name, nickname, gender, date_of_birth, avatar_url,
            user_type, is_verified, is_active, preferred_language, country_code,
            timezone, created_at, updated_at, last_login_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?, 'UTC', ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.phone_number)
    .bind(&user.password_hash)
    .bind(&user.display_name)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.nickname)
    .bind(user.gender.map(|g| g.as_str()))
    .bind(user.date_of_birth)
    .bind(&user.avatar_url)
    .bind(user.user_type.as_str())
    .bind(user.is_verified)
    .bind(&user.preferred_language)
    .bind(&user.country_code)
    .bind(user.created_at)
    .bind(user.created_at)
    .bind(user.last_login_at)
    .execute(executor)
    .await
    .map_err(|e| map_db_error("insert user", e))?;

    let id = result.last_insert_id() as UserId;
    tracing::info!(user_id = id, username = %user.username, "User created");
    Ok(User::from_new(id, user))
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("find user by id", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        self.find_one("phone_number", phone_number).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        insert_user(&self.pool, user).await
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("record login", e))?;
        Ok(())
    }
}
