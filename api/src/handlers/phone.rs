use actix_web::{web, HttpRequest, HttpResponse};
use lc_core::domain::{Credential, LocalizedCountry, ProviderKind};
use lc_shared::phone::mask_phone_number;

use crate::dto::{
    CountriesQuery, PhoneLoginRequest, RegisterRequest, SendCodeRequest, SendCodeResponse,
    VerifyCodeRequest, VerifyCodeResponse,
};
use crate::error::{validate, ApiError};
use crate::state::AppState;

use super::login_context;

/// GET /phone/countries?language=en|zh_TW|zh_CN|th|ja
pub async fn countries(
    state: web::Data<AppState>,
    query: web::Query<CountriesQuery>,
) -> Result<HttpResponse, ApiError> {
    let language = query.language();
    let countries: Vec<LocalizedCountry> = state
        .countries
        .list_active()
        .await?
        .iter()
        .map(|country| country.localize(language))
        .collect();
    Ok(HttpResponse::Ok().json(countries))
}

/// POST /phone/send-code
///
/// Registration code for a number that has no account yet.
pub async fn send_code(
    state: web::Data<AppState>,
    body: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    let phone = body.full_phone_number();
    log::info!("Registration code requested for {}", mask_phone_number(&phone));

    let result = state.otp.send_verification_code(&phone, body.language()).await?;
    Ok(HttpResponse::Ok().json(SendCodeResponse {
        success: true,
        message: "Verification code sent".to_string(),
        expires_in: result.expires_in,
    }))
}

/// POST /phone/login-code
///
/// Login code for a number that already belongs to a user.
pub async fn send_login_code(
    state: web::Data<AppState>,
    body: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    let phone = body.full_phone_number();
    log::info!("Login code requested for {}", mask_phone_number(&phone));

    let result = state.otp.send_login_code(&phone, body.language()).await?;
    Ok(HttpResponse::Ok().json(SendCodeResponse {
        success: true,
        message: "Verification code sent".to_string(),
        expires_in: result.expires_in,
    }))
}

/// POST /phone/verify-code
///
/// Pre-validation only; the code stays usable for registration.
pub async fn verify_code(
    state: web::Data<AppState>,
    body: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    state.otp.verify_code(&body.phone_number, &body.code).await?;
    Ok(HttpResponse::Ok().json(VerifyCodeResponse {
        success: true,
        message: "Code verified successfully".to_string(),
    }))
}

/// POST /phone/register
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    let (registration, device_info) = body.into_inner().into_parts();

    let context = login_context(&req, device_info);
    let response = state.auth.register_with_phone(registration, &context).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /phone/login
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PhoneLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    let body = body.into_inner();

    let context = login_context(&req, body.device_info);
    let credential = Credential::PhoneOtp {
        phone: body.phone_number,
        code: body.code,
    };
    let response = state.auth.login(ProviderKind::Phone, credential, &context).await?;
    Ok(HttpResponse::Ok().json(response))
}
