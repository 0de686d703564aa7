//! Shared HTTP plumbing for provider calls

use std::time::Duration;

use lc_core::domain::value_objects::identity::ProviderKind;
use lc_core::errors::{AuthError, DomainError};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::InfrastructureError;

/// Client with the request timeout applied to every provider call
pub fn build_http_client(timeout_secs: u64) -> Result<Client, InfrastructureError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("lc-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(InfrastructureError::Http)
}

/// Transport failure (timeout, DNS, TLS) talking to a provider
pub(crate) fn transport_error(kind: ProviderKind, error: reqwest::Error) -> DomainError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else {
        error.to_string()
    };
    tracing::warn!(provider = %kind, error = %message, "Identity provider unreachable");
    DomainError::upstream(kind.display_name(), message)
}

pub(crate) fn invalid_credential(kind: ProviderKind) -> DomainError {
    AuthError::InvalidCredential {
        provider: kind.display_name().to_string(),
    }
    .into()
}

/// Read a JSON body, treating 4xx as a rejected credential and 5xx as an
/// upstream outage
pub(crate) async fn read_json<T: DeserializeOwned>(
    kind: ProviderKind,
    response: Response,
) -> Result<T, DomainError> {
    let status = response.status();
    if status.is_client_error() {
        tracing::info!(provider = %kind, status = status.as_u16(), "Provider rejected credential");
        return Err(invalid_credential(kind));
    }
    if !status.is_success() {
        return Err(upstream_status(kind, status));
    }

    let body = response.text().await.map_err(|e| transport_error(kind, e))?;
    serde_json::from_str(&body).map_err(|e| {
        DomainError::upstream(kind.display_name(), format!("unexpected response: {}", e))
    })
}

fn upstream_status(kind: ProviderKind, status: StatusCode) -> DomainError {
    DomainError::upstream(kind.display_name(), format!("HTTP {}", status.as_u16()))
}

/// Read an authorization-code exchange response; any non-2xx is surfaced
/// with the provider's body so the polling client can show it
pub(crate) async fn read_exchange_json<T: DeserializeOwned>(
    kind: ProviderKind,
    response: Response,
) -> Result<T, DomainError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| transport_error(kind, e))?;
    if !status.is_success() {
        return Err(DomainError::upstream(
            kind.display_name(),
            format!("token exchange failed: {}", body),
        ));
    }
    serde_json::from_str(&body).map_err(|e| {
        DomainError::upstream(kind.display_name(), format!("unexpected token response: {}", e))
    })
}

/// `base?k=v&...` with every value percent-encoded
pub(crate) fn url_with_params(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::error!("Invalid provider URL {}: {}", base, e);
            base.to_string()
        }
    }
}
