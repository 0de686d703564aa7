//! User entity representing a registered account on the platform.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Numeric user identifier (auto-increment primary key)
pub type UserId = i64;

/// Represents the type of user in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Watches streams and buys products
    #[default]
    Viewer,
    /// Hosts live streams
    Streamer,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Viewer => "viewer",
            UserType::Streamer => "streamer",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(UserType::Viewer),
            "streamer" => Ok(UserType::Streamer),
            "admin" => Ok(UserType::Admin),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// Self-declared gender on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALLOWED: [&'static str; 4] = ["male", "female", "other", "prefer_not_to_say"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }

    /// Comma separated list used in validation messages
    pub fn allowed_list() -> String {
        Self::ALLOWED.join(", ")
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer_not_to_say" => Ok(Gender::PreferNotToSay),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// User entity as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// bcrypt hash; `None` for accounts created through phone or social login
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub user_type: UserType,
    pub is_verified: bool,
    pub is_active: bool,
    pub preferred_language: String,
    pub country_code: Option<String>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Materializes a stored row from an insert payload
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            username: new_user.username,
            email: new_user.email,
            phone_number: new_user.phone_number,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            nickname: new_user.nickname,
            gender: new_user.gender,
            date_of_birth: new_user.date_of_birth,
            avatar_url: new_user.avatar_url,
            bio: None,
            user_type: new_user.user_type,
            is_verified: new_user.is_verified,
            is_active: true,
            preferred_language: new_user.preferred_language,
            country_code: new_user.country_code,
            timezone: "UTC".to_string(),
            created_at: new_user.created_at,
            updated_at: new_user.created_at,
            last_login_at: new_user.last_login_at,
        }
    }

    pub fn can_login_with_password(&self) -> bool {
        self.is_active && self.password_hash.is_some()
    }
}

/// Insert payload for a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    pub user_type: UserType,
    pub is_verified: bool,
    pub preferred_language: String,
    pub country_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl NewUser {
    /// A bare viewer account with only the mandatory columns set
    pub fn viewer(username: impl Into<String>, display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            email: None,
            phone_number: None,
            password_hash: None,
            display_name: display_name.into(),
            first_name: None,
            last_name: None,
            nickname: None,
            gender: None,
            date_of_birth: None,
            avatar_url: None,
            user_type: UserType::Viewer,
            is_verified: false,
            preferred_language: "en".to_string(),
            country_code: None,
            created_at: now,
            last_login_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing_accepts_only_allowed_values() {
        for value in Gender::ALLOWED {
            let gender: Gender = value.parse().unwrap();
            assert_eq!(gender.as_str(), value);
        }
        assert!("unknown".parse::<Gender>().is_err());
        assert!("Male".parse::<Gender>().is_err());
    }

    #[test]
    fn test_user_type_round_trip() {
        assert_eq!("streamer".parse::<UserType>().unwrap(), UserType::Streamer);
        assert_eq!(UserType::default(), UserType::Viewer);
        assert!("worker".parse::<UserType>().is_err());
    }

    #[test]
    fn test_from_new_sets_defaults() {
        let now = Utc::now();
        let user = User::from_new(7, NewUser::viewer("line_U123", "LINE User U123", now));

        assert_eq!(user.id, 7);
        assert!(user.is_active);
        assert_eq!(user.timezone, "UTC");
        assert_eq!(user.updated_at, now);
        assert!(!user.can_login_with_password());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut new_user = NewUser::viewer("bob", "Bob", Utc::now());
        new_user.password_hash = Some("$2b$12$secret".to_string());
        let user = User::from_new(1, new_user);

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
    }
}
