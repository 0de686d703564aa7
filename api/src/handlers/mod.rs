//! Route handlers, grouped by surface

pub mod auth;
pub mod health;
pub mod phone;
pub mod social;

use actix_web::HttpRequest;
use lc_core::domain::DeviceInfo;
use lc_core::LoginContext;

/// Client address and user agent of a login request
pub fn login_context(req: &HttpRequest, device_info: Option<DeviceInfo>) -> LoginContext {
    LoginContext::new(client_ip(req), user_agent(req)).with_device_info(device_info)
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`, then the peer address
fn client_ip(req: &HttpRequest) -> Option<String> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(forwarded) = header("X-Forwarded-For") {
        if let Some(first) = forwarded.split(',').next().map(str::trim).filter(|ip| !ip.is_empty()) {
            return Some(first.to_string());
        }
    }
    header("X-Real-IP").or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
}

fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_login_context_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .insert_header(("User-Agent", "LiveCommerce/2.1 (iPhone; iOS 17.2)"))
            .to_http_request();
        let context = login_context(&req, None);
        assert_eq!(context.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(context.user_agent.as_deref(), Some("LiveCommerce/2.1 (iPhone; iOS 17.2)"));
    }

    #[test]
    fn test_login_context_falls_back_to_peer() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:443".parse().unwrap())
            .to_http_request();
        let context = login_context(&req, None);
        assert_eq!(context.ip_address.as_deref(), Some("192.0.2.10"));
        assert_eq!(context.user_agent, None);
    }
}
