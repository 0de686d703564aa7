//! Types returned by verification flows

use serde::{Deserialize, Serialize};

/// Transport acknowledgement for one SMS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsReceipt {
    pub provider: String,
    pub message_id: String,
}

/// Result of sending a verification code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResult {
    /// Seconds until the code expires
    pub expires_in: u64,
    pub receipt: SmsReceipt,
}

/// Outcome of comparing a submitted code with the stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Matched,
    Mismatched,
    /// No code stored: never sent, expired or already consumed
    Missing,
}
