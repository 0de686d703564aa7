//! Main auth orchestration implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lc_shared::phone::mask_phone_number;

use crate::domain::entities::device::ParsedDevice;
use crate::domain::entities::login_history::{LoginHistory, LoginStatus, NewLoginHistory};
use crate::domain::entities::session::{NewSession, Session, SessionId};
use crate::domain::entities::social_account::NewSocialAccount;
use crate::domain::entities::token::{SessionGrant, TokenSubject, TokenType};
use crate::domain::entities::user::{Gender, NewUser, User, UserId};
use crate::domain::value_objects::auth_response::{RefreshResponse, TokenResponse};
use crate::domain::value_objects::auth_status::{AuthStatus, UnauthenticatedReason};
use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::services::clock::{Clock, SystemClock};
use crate::services::identity::ProviderRegistry;
use crate::services::otp::{CodeCheck, OtpService};
use crate::services::token::TokenCodec;

use super::context::{LoginContext, PhoneRegistration};
use super::repositories::AuthRepositories;

const USERNAME_MAX_CHARS: usize = 50;
const DISPLAY_NAME_MAX_CHARS: usize = 100;

/// Composes the codec, session store, login history, identity providers and
/// OTP service into the externally visible auth operations
pub struct AuthService {
    repos: AuthRepositories,
    codec: Arc<TokenCodec>,
    otp: Arc<OtpService>,
    providers: Arc<ProviderRegistry>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        repos: AuthRepositories,
        codec: Arc<TokenCodec>,
        otp: Arc<OtpService>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self::with_clock(repos, codec, otp, providers, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repos: AuthRepositories,
        codec: Arc<TokenCodec>,
        otp: Arc<OtpService>,
        providers: Arc<ProviderRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            codec,
            otp,
            providers,
            clock,
        }
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn otp(&self) -> &OtpService {
        &self.otp
    }

    /// Resolve identity through the provider for `kind`, load or provision the
    /// user, open a session and record the attempt.
    pub async fn login(
        &self,
        kind: ProviderKind,
        credential: Credential,
        context: &LoginContext,
    ) -> DomainResult<TokenResponse> {
        let provider = self.providers.get(kind)?;
        let device = context.device();

        let identity = match provider.resolve_identity(&credential).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::info!(provider = %kind, error = %e, event = "login_failed", "Identity resolution failed");
                self.record_attempt(
                    None,
                    kind,
                    credential_subject(&credential),
                    context,
                    &device,
                    LoginStatus::Failed,
                    Some(e.to_string()),
                )
                .await;
                return Err(e);
            }
        };

        let user = match kind {
            ProviderKind::Password => self
                .repos
                .users
                .find_by_email(&identity.provider_user_id)
                .await?
                .ok_or(AuthError::InvalidCredential {
                    provider: kind.as_str().to_string(),
                })?,
            ProviderKind::Phone => self
                .repos
                .users
                .find_by_phone(&identity.provider_user_id)
                .await?
                .ok_or(AuthError::UserNotFound)?,
            _ => {
                let access_token = match &credential {
                    Credential::AccessToken(token) => Some(token.as_str()),
                    _ => None,
                };
                self.provision_social(kind, &identity, access_token).await?
            }
        };

        if !user.is_active {
            tracing::warn!(user_id = user.id, provider = %kind, event = "login_blocked", "Inactive user attempted login");
            self.record_attempt(
                Some(user.id),
                kind,
                Some(identity.provider_user_id.clone()),
                context,
                &device,
                LoginStatus::Blocked,
                Some(AuthError::UserInactive.to_string()),
            )
            .await;
            return Err(AuthError::UserInactive.into());
        }

        let response = self
            .open_session(&user, kind, Some(identity.provider_user_id.clone()), context, &device)
            .await?;

        if kind == ProviderKind::Phone {
            if let Credential::PhoneOtp { phone, .. } = &credential {
                if let Err(e) = self.otp.consume_code(phone).await {
                    tracing::warn!(phone = %mask_phone_number(phone), error = %e, "Failed to delete used verification code");
                }
            }
        }

        Ok(response)
    }

    /// Login with a third-party access token (or Google ID token)
    pub async fn social_login(
        &self,
        kind: ProviderKind,
        access_token: &str,
        context: &LoginContext,
    ) -> DomainResult<TokenResponse> {
        if !kind.is_social() {
            return Err(AuthError::UnknownProvider {
                provider: kind.as_str().to_string(),
            }
            .into());
        }
        self.login(kind, Credential::AccessToken(access_token.to_string()), context)
            .await
    }

    /// Reuse the user linked to `(provider, provider_user_id)` or create both
    /// user and link in one transaction
    async fn provision_social(
        &self,
        kind: ProviderKind,
        identity: &ExternalIdentity,
        access_token: Option<&str>,
    ) -> DomainResult<User> {
        let now = self.clock.now();

        if let Some(user) = self.linked_user(kind, identity, access_token, now).await? {
            return Ok(user);
        }

        let mut new_user = NewUser::viewer(
            social_username(kind, &identity.provider_user_id),
            social_display_name(kind, identity),
            now,
        );
        new_user.email = identity.email.clone();
        new_user.avatar_url = identity.avatar_url.clone();
        new_user.is_verified = identity.email_verified;

        let account = NewSocialAccount {
            provider: kind.as_str().to_string(),
            provider_user_id: identity.provider_user_id.clone(),
            provider_username: identity.provider_username.clone(),
            access_token: access_token.map(str::to_string),
            is_primary: true,
            linked_at: now,
        };

        match self
            .repos
            .registration
            .create_user_with_social_account(new_user, account)
            .await
        {
            Ok((user, account)) => {
                tracing::info!(
                    user_id = user.id,
                    provider = %kind,
                    social_account_id = account.id,
                    event = "social_user_provisioned",
                    "Provisioned user from social login"
                );
                Ok(user)
            }
            Err(DomainError::Conflict { resource }) => {
                // A concurrent first login for the same account won the insert
                tracing::info!(provider = %kind, resource = %resource, "Provisioning conflict, retrying lookup");
                self.linked_user(kind, identity, access_token, now)
                    .await?
                    .ok_or(DomainError::Conflict { resource })
            }
            Err(e) => Err(e),
        }
    }

    async fn linked_user(
        &self,
        kind: ProviderKind,
        identity: &ExternalIdentity,
        access_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<User>> {
        let Some(account) = self
            .repos
            .social_accounts
            .find_by_provider(kind.as_str(), &identity.provider_user_id)
            .await?
        else {
            return Ok(None);
        };

        self.repos
            .social_accounts
            .record_use(account.id, access_token, now)
            .await?;
        let user = self
            .repos
            .users
            .find_by_id(account.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(Some(user))
    }

    /// Create a session for an already loaded user and record the login
    async fn open_session(
        &self,
        user: &User,
        kind: ProviderKind,
        provider_user_id: Option<String>,
        context: &LoginContext,
        device: &ParsedDevice,
    ) -> DomainResult<TokenResponse> {
        let grant = self.codec.mint_grant();
        let session = self
            .repos
            .sessions
            .create_session(user.id, new_session(&grant, context, device))
            .await?;
        let pair = self
            .codec
            .sign_grant(&TokenSubject::new(user.id, user.username.clone()), &grant)?;

        self.repos.users.record_login(user.id, grant.issued_at).await?;
        self.record_attempt(
            Some(user.id),
            kind,
            provider_user_id,
            context,
            device,
            LoginStatus::Success,
            None,
        )
        .await;

        tracing::info!(
            user_id = user.id,
            session_id = session.id,
            provider = %kind,
            event = "login_succeeded",
            "Session created"
        );
        Ok(TokenResponse::from_pair(pair, user))
    }

    /// Issue a new access token for an active, unexpired session.
    ///
    /// The refresh token is not rotated; the client keeps using it.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<RefreshResponse> {
        let claims = self
            .codec
            .decode_expecting(refresh_token, TokenType::Refresh)
            .map_err(|reason| TokenError::InvalidToken { reason })?;

        let session = self
            .repos
            .sessions
            .find_active_by_refresh_jti(&claims.jti)
            .await?
            .ok_or(TokenError::SessionNotFound)?;

        let now = self.clock.now();
        if session.is_expired_at(now) {
            self.repos.sessions.deactivate(session.id).await?;
            tracing::info!(session_id = session.id, event = "session_expired", "Refresh token expired, session deactivated");
            return Err(TokenError::RefreshTokenExpired.into());
        }

        let user = self
            .repos
            .users
            .find_by_id(session.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(DomainError::Unauthorized)?;

        let access = self
            .codec
            .issue_default_access_token(&TokenSubject::new(user.id, user.username.clone()))?;
        self.repos
            .sessions
            .rotate_access_token(session.id, &access.jti, now)
            .await?;

        tracing::debug!(session_id = session.id, user_id = user.id, event = "token_refreshed", "Access token rotated");
        Ok(RefreshResponse::new(access.token))
    }

    /// Always succeeds for undecodable tokens; otherwise deactivates the
    /// session holding this refresh jti, if any
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let claims = match self.codec.decode_token(refresh_token) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::debug!(reason = %reason, "Logout with undecodable token");
                return Ok(());
            }
        };

        let deactivated = self
            .repos
            .sessions
            .deactivate_by_refresh_jti(&claims.jti)
            .await?;
        tracing::info!(user_id = %claims.sub, deactivated, event = "logout", "Logout processed");
        Ok(())
    }

    /// Verify OTP, check the number is free, validate the form, then commit
    /// user and session together. A wrong code is always reported as such;
    /// a registered number is reported once the code matches or is gone.
    pub async fn register_with_phone(
        &self,
        registration: PhoneRegistration,
        context: &LoginContext,
    ) -> DomainResult<TokenResponse> {
        let phone = crate::services::otp::parse_phone(&registration.phone_number)?;
        let masked = mask_phone_number(&phone);

        let check = self
            .otp
            .compare_code(&phone, &registration.verification_code)
            .await?;
        if check == CodeCheck::Mismatched {
            tracing::info!(phone = %masked, event = "register_bad_code", "Registration with invalid code");
            return Err(AuthError::InvalidVerificationCode.into());
        }
        // A missing code for a registered number was consumed by that registration
        let registered = self.repos.users.find_by_phone(&phone).await?.is_some();
        if registered {
            return Err(AuthError::PhoneAlreadyRegistered.into());
        }
        if check == CodeCheck::Missing {
            tracing::info!(phone = %masked, event = "register_bad_code", "Registration without a pending code");
            return Err(AuthError::InvalidVerificationCode.into());
        }

        let gender = match registration.gender.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<Gender>().map_err(|_| ValidationError::InvalidGender {
                allowed: Gender::allowed_list(),
            })?),
        };

        let now = self.clock.now();
        let display_name = truncate(
            format!("{} {}", registration.first_name.trim(), registration.last_name.trim()).trim(),
            DISPLAY_NAME_MAX_CHARS,
        );
        let mut new_user = NewUser::viewer(phone.clone(), display_name, now);
        new_user.phone_number = Some(phone.clone());
        new_user.first_name = Some(registration.first_name.trim().to_string());
        new_user.last_name = Some(registration.last_name.trim().to_string());
        new_user.nickname = registration.nickname.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        new_user.gender = gender;
        new_user.date_of_birth = registration.date_of_birth;
        new_user.email = registration
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        new_user.is_verified = true;
        new_user.last_login_at = Some(now);

        let device = context.device();
        let grant = self.codec.mint_grant();
        let (user, session) = self
            .repos
            .registration
            .create_user_with_session(new_user, new_session(&grant, context, &device))
            .await
            .map_err(|e| match e {
                DomainError::Conflict { resource } if !resource.contains("email") => {
                    DomainError::from(AuthError::PhoneAlreadyRegistered)
                }
                other => other,
            })?;

        if let Err(e) = self.otp.consume_code(&phone).await {
            tracing::warn!(phone = %masked, error = %e, "Failed to delete used verification code");
        }

        self.record_attempt(
            Some(user.id),
            ProviderKind::Phone,
            Some(phone),
            context,
            &device,
            LoginStatus::Success,
            None,
        )
        .await;

        let pair = self
            .codec
            .sign_grant(&TokenSubject::new(user.id, user.username.clone()), &grant)?;
        tracing::info!(user_id = user.id, session_id = session.id, phone = %masked, event = "phone_registered", "User registered by phone");
        Ok(TokenResponse::from_pair(pair, &user))
    }

    /// Resolve a bearer access token to its user and current session
    pub async fn authenticate(&self, access_token: &str) -> DomainResult<AuthStatus> {
        let claims = match self.codec.decode_expecting(access_token, TokenType::Access) {
            Ok(claims) => claims,
            Err(rejection) => {
                return Ok(AuthStatus::Unauthenticated(UnauthenticatedReason::InvalidToken(
                    rejection,
                )))
            }
        };

        let session = match self.repos.sessions.find_by_access_jti(&claims.jti).await? {
            Some(session) if session.is_active && Some(session.user_id) == claims.user_id() => session,
            _ => return Ok(AuthStatus::Unauthenticated(UnauthenticatedReason::SessionRevoked)),
        };
        if session.is_expired_at(self.clock.now()) {
            return Ok(AuthStatus::Unauthenticated(UnauthenticatedReason::SessionExpired));
        }

        match self.repos.users.find_by_id(session.user_id).await? {
            Some(user) if user.is_active => Ok(AuthStatus::authenticated(user, session)),
            _ => Ok(AuthStatus::Unauthenticated(UnauthenticatedReason::UserUnavailable)),
        }
    }

    pub async fn list_sessions(&self, user_id: UserId) -> DomainResult<Vec<Session>> {
        self.repos.sessions.list_active_for_user(user_id).await
    }

    /// Deactivate one of the caller's own sessions
    pub async fn revoke_session(&self, user_id: UserId, session_id: SessionId) -> DomainResult<()> {
        let session = self
            .repos
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("session {}", session_id),
            })?;

        if session.user_id != user_id {
            tracing::warn!(user_id, session_id, event = "session_revoke_forbidden", "Attempt to revoke another user's session");
            return Err(DomainError::Forbidden {
                message: "Session belongs to another user".to_string(),
            });
        }

        self.repos.sessions.deactivate(session_id).await?;
        tracing::info!(user_id, session_id, event = "session_revoked", "Session revoked");
        Ok(())
    }

    pub async fn login_history(&self, user_id: UserId, limit: usize) -> DomainResult<Vec<LoginHistory>> {
        self.repos.login_history.list_for_user(user_id, limit).await
    }

    /// History writes never fail the surrounding flow
    #[allow(clippy::too_many_arguments)]
    async fn record_attempt(
        &self,
        user_id: Option<UserId>,
        kind: ProviderKind,
        provider_user_id: Option<String>,
        context: &LoginContext,
        device: &ParsedDevice,
        status: LoginStatus,
        failure_reason: Option<String>,
    ) {
        let entry = NewLoginHistory {
            user_id,
            login_method: kind.as_str().to_string(),
            provider_user_id,
            ip_address: context.ip_address.clone(),
            user_agent: device.user_agent.clone(),
            device_type: device.history_label(),
            status,
            failure_reason,
            created_at: self.clock.now(),
        };
        if let Err(e) = self.repos.login_history.append(entry).await {
            tracing::error!(error = %e, provider = %kind, status = %status, "Failed to write login history");
        }
    }
}

fn new_session(grant: &SessionGrant, context: &LoginContext, device: &ParsedDevice) -> NewSession {
    NewSession {
        access_token_jti: grant.access_jti.clone(),
        refresh_token_jti: grant.refresh_jti.clone(),
        device_type: device.session_device_type(),
        device_name: device.device_name.clone(),
        ip_address: context.ip_address.clone(),
        user_agent: device.user_agent.clone(),
        expires_at: grant.refresh_expires_at,
        created_at: grant.issued_at,
    }
}

/// Identifier worth keeping in history for a failed attempt
fn credential_subject(credential: &Credential) -> Option<String> {
    match credential {
        Credential::Password { email, .. } => Some(email.trim().to_lowercase()),
        Credential::PhoneOtp { phone, .. } => Some(phone.clone()),
        Credential::AccessToken(_) => None,
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// `line_{id}`, `facebook_{id}`, `google_{first 16 of sub}`
pub(crate) fn social_username(kind: ProviderKind, provider_user_id: &str) -> String {
    let id = match kind {
        ProviderKind::Google => truncate(provider_user_id, 16),
        _ => provider_user_id.to_string(),
    };
    truncate(&format!("{}_{}", kind.as_str(), id), USERNAME_MAX_CHARS)
}

/// Provider name, else (Google) the email local part, else `"{Provider} User {id prefix}"`
pub(crate) fn social_display_name(kind: ProviderKind, identity: &ExternalIdentity) -> String {
    if let Some(name) = identity.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return truncate(name, DISPLAY_NAME_MAX_CHARS);
    }
    if kind == ProviderKind::Google {
        if let Some(local) = identity
            .email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|l| !l.is_empty())
        {
            return truncate(local, DISPLAY_NAME_MAX_CHARS);
        }
    }
    format!(
        "{} User {}",
        kind.display_name(),
        truncate(&identity.provider_user_id, 8)
    )
}
