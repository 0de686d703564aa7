use chrono::NaiveDate;
use lc_core::domain::DeviceInfo;
use lc_core::PhoneRegistration;
use lc_shared::Language;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_language() -> String {
    Language::default().code().to_string()
}

/// Body of `POST /phone/send-code` and `POST /phone/login-code`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// E.164 number, or a national number combined with `country_code`
    #[validate(length(min = 4, max = 20))]
    pub phone_number: String,

    /// Dial code such as `+886`; ignored when `phone_number` is already E.164
    #[serde(default)]
    #[validate(length(max = 8))]
    pub country_code: Option<String>,

    /// en, zh_TW, zh_CN, th or ja
    #[serde(default = "default_language")]
    pub language: String,
}

impl SendCodeRequest {
    pub fn full_phone_number(&self) -> String {
        combine_phone(&self.phone_number, self.country_code.as_deref())
    }

    pub fn language(&self) -> Language {
        Language::from_code_or_default(&self.language)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 4, max = 20))]
    pub phone_number: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 20))]
    pub phone_number: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub verification_code: String,

    #[validate(length(min = 1, max = 50))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50))]
    pub last_name: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub nickname: Option<String>,

    /// Checked against the allowed values by the auth service
    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
}

impl RegisterRequest {
    /// Split into the registration form and the device info for the login context
    pub fn into_parts(self) -> (PhoneRegistration, Option<DeviceInfo>) {
        let registration = PhoneRegistration {
            phone_number: self.phone_number,
            verification_code: self.verification_code,
            first_name: self.first_name,
            last_name: self.last_name,
            nickname: self.nickname,
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            email: self.email.filter(|e| !e.trim().is_empty()),
        };
        (registration, self.device_info)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhoneLoginRequest {
    #[validate(length(min = 4, max = 20))]
    pub phone_number: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,

    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountriesQuery {
    pub language: Option<String>,
}

impl CountriesQuery {
    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .map(Language::from_code_or_default)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: String,
    /// Seconds until the code expires
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: String,
}

/// Prefix a national number with its dial code, dropping the trunk `0`
fn combine_phone(phone_number: &str, country_code: Option<&str>) -> String {
    let phone = phone_number.trim();
    if phone.starts_with('+') {
        return phone.to_string();
    }

    match country_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => {
            let dial = code.trim_start_matches('+');
            let national = phone.trim_start_matches('0');
            format!("+{}{}", dial, national)
        }
        None => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_code(phone: &str, country: Option<&str>) -> SendCodeRequest {
        SendCodeRequest {
            phone_number: phone.to_string(),
            country_code: country.map(str::to_string),
            language: "th".to_string(),
        }
    }

    #[test]
    fn test_full_phone_number() {
        assert_eq!(send_code("+886912345678", Some("+66")).full_phone_number(), "+886912345678");
        assert_eq!(send_code("0912345678", Some("+886")).full_phone_number(), "+886912345678");
        assert_eq!(send_code("812345678", Some("66")).full_phone_number(), "+66812345678");
        assert_eq!(send_code("0912345678", None).full_phone_number(), "0912345678");
    }

    #[test]
    fn test_language_fallback() {
        assert_eq!(send_code("+66812345678", None).language(), Language::Thai);
        let query = CountriesQuery {
            language: Some("fr".to_string()),
        };
        assert_eq!(query.language(), Language::English);
        assert_eq!(CountriesQuery::default().language(), Language::English);
    }

    #[test]
    fn test_register_request_rejects_short_code() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "phone_number": "+886912345678",
            "verification_code": "123",
            "first_name": "Mei",
            "last_name": "Lin"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("verification_code"));
    }
}
