//! Device metadata attached to sessions and login history.
//!
//! Structured info from the mobile apps wins; otherwise the user agent is
//! classified by pattern. Classification is advisory and never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IOS_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"iphone os (\d+)[_.](\d+)(?:[_.](\d+))?").expect("iOS pattern is a valid regex")
});

static IPADOS_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"cpu os (\d+)[_.](\d+)(?:[_.](\d+))?").expect("iPadOS pattern is a valid regex")
});

static ANDROID_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"android (\d+(?:\.\d+)?)").expect("Android pattern is a valid regex")
});

/// Column widths of `sessions.device_type`, `sessions.device_name`,
/// `login_history.device_type` and the `ip_address` columns
pub const SESSION_DEVICE_TYPE_MAX_CHARS: usize = 20;
pub const DEVICE_NAME_MAX_CHARS: usize = 100;
pub const HISTORY_DEVICE_TYPE_MAX_CHARS: usize = 50;
pub const IP_ADDRESS_MAX_CHARS: usize = 45;

/// Device info sent by the mobile apps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_model: Option<String>,
    pub device_os: Option<String>,
    pub device_os_version: Option<String>,
    pub app_version: Option<String>,
}

/// Result of device classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDevice {
    /// ios, android, mobile, desktop or a client supplied OS name
    pub device_type: Option<String>,
    pub os_version: Option<String>,
    pub user_agent: Option<String>,
    pub device_name: Option<String>,
}

impl ParsedDevice {
    pub fn parse(user_agent: Option<&str>, device_info: Option<&DeviceInfo>) -> Self {
        if let Some(info) = device_info {
            return Self::from_device_info(info);
        }
        match user_agent.filter(|ua| !ua.trim().is_empty()) {
            Some(ua) => Self::from_user_agent(ua),
            None => Self::default(),
        }
    }

    fn from_device_info(info: &DeviceInfo) -> Self {
        let device_type = info
            .device_os
            .clone()
            .unwrap_or_else(|| "unknown".to_string());

        let mut user_agent = format!(
            "{} {}/{}",
            info.device_model.as_deref().unwrap_or("Unknown"),
            device_type,
            info.device_os_version.as_deref().unwrap_or("Unknown"),
        );
        if let Some(app_version) = &info.app_version {
            user_agent.push_str(&format!(" App/{}", app_version));
        }

        Self {
            device_type: Some(clamp(&device_type, SESSION_DEVICE_TYPE_MAX_CHARS)),
            os_version: info.device_os_version.clone(),
            user_agent: Some(user_agent),
            device_name: info
                .device_model
                .as_deref()
                .map(|model| clamp(model, DEVICE_NAME_MAX_CHARS)),
        }
    }

    fn from_user_agent(ua: &str) -> Self {
        let lowered = ua.to_lowercase();

        let (device_type, os_version) = if lowered.contains("iphone") {
            ("ios", dotted_version(&IOS_VERSION, &lowered).map(|v| format!("iOS {}", v)))
        } else if lowered.contains("ipad") {
            ("ios", dotted_version(&IPADOS_VERSION, &lowered).map(|v| format!("iPadOS {}", v)))
        } else if lowered.contains("android") {
            let version = ANDROID_VERSION
                .captures(&lowered)
                .and_then(|c| c.get(1))
                .map(|m| format!("Android {}", m.as_str()));
            ("android", version)
        } else if lowered.contains("mobile") {
            ("mobile", None)
        } else {
            ("desktop", None)
        };

        Self {
            device_type: Some(device_type.to_string()),
            os_version,
            user_agent: Some(ua.to_string()),
            device_name: None,
        }
    }

    /// Value for `sessions.device_type`
    pub fn session_device_type(&self) -> String {
        self.device_type
            .as_deref()
            .map(|kind| clamp(kind, SESSION_DEVICE_TYPE_MAX_CHARS))
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Value for `login_history.device_type`, e.g. `ios (iOS 17.2.0)`
    pub fn history_label(&self) -> Option<String> {
        let label = match (&self.device_type, &self.os_version) {
            (Some(kind), Some(version)) => format!("{} ({})", kind, version),
            (Some(kind), None) => kind.clone(),
            (None, _) => return None,
        };
        Some(clamp(&label, HISTORY_DEVICE_TYPE_MAX_CHARS))
    }
}

/// Truncate to at most `max_chars` characters
pub fn clamp(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn dotted_version(pattern: &Regex, ua: &str) -> Option<String> {
    let captures = pattern.captures(ua)?;
    let major = captures.get(1)?.as_str();
    let minor = captures.get(2)?.as_str();
    let patch = captures.get(3).map(|m| m.as_str()).unwrap_or("0");
    Some(format!("{}.{}.{}", major, minor, patch))
}
