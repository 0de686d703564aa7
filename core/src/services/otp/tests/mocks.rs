//! Test doubles for the SMS seam

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lc_shared::Language;

use crate::services::otp::{SmsDispatchError, SmsDispatcher, SmsReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub phone: String,
    pub code: String,
    pub language: Language,
}

/// Records every dispatched code; optionally fails every call
#[derive(Clone, Default)]
pub struct RecordingSmsDispatcher {
    sent: Arc<Mutex<Vec<SentSms>>>,
    failure: Option<SmsDispatchError>,
}

impl RecordingSmsDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: SmsDispatchError) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.phone == phone)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl SmsDispatcher for RecordingSmsDispatcher {
    async fn dispatch_verification_code(
        &self,
        phone: &str,
        code: &str,
        language: Language,
    ) -> Result<SmsReceipt, SmsDispatchError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentSms {
            phone: phone.to_string(),
            code: code.to_string(),
            language,
        });
        Ok(SmsReceipt {
            provider: "recording".to_string(),
            message_id: format!("msg-{}", sent.len()),
        })
    }
}
