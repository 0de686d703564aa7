//! Request-side inputs to the auth flows

use chrono::NaiveDate;

use crate::domain::entities::device::{clamp, DeviceInfo, ParsedDevice, IP_ADDRESS_MAX_CHARS};

/// Where a login request came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_info: Option<DeviceInfo>,
}

impl LoginContext {
    /// `ip_address` is cut to the width of the `ip_address` columns
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address: ip_address.map(|ip| clamp(&ip, IP_ADDRESS_MAX_CHARS)),
            user_agent,
            device_info: None,
        }
    }

    pub fn with_device_info(mut self, device_info: Option<DeviceInfo>) -> Self {
        self.device_info = device_info;
        self
    }

    pub fn device(&self) -> ParsedDevice {
        ParsedDevice::parse(self.user_agent.as_deref(), self.device_info.as_ref())
    }
}

/// Phone registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRegistration {
    pub phone_number: String,
    pub verification_code: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    /// One of `male`, `female`, `other`, `prefer_not_to_say`
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
}
