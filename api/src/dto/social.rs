use serde::Deserialize;

/// Query string of the provider redirect to `/auth/social/{provider}/callback`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    #[serde(default)]
    pub state: String,
    /// Set by the provider when the user denied access
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackQuery {
    /// Provider-reported failure, preferring the human-readable description
    pub fn provider_error(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.error.as_deref())
            .filter(|e| !e.is_empty())
    }
}
