//! Phone verification codes: generation, rate limiting, delivery and checks.
//!
//! Codes live in the shared expiring cache under `phone_verification:{phone}`
//! for ten minutes; a `phone_code_rate:{phone}` marker blocks new requests for
//! sixty seconds.

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use config::OtpServiceConfig;
pub use service::{rate_limit_key, verification_key, OtpService};
pub(crate) use service::parse_phone;
pub use traits::{SmsDispatchError, SmsDispatcher};
pub use types::{CodeCheck, SendCodeResult, SmsReceipt};
