//! HTML pages shown in the browser at the end of the OAuth redirect flow

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use lc_core::domain::ProviderKind;

const LINE_GREEN: &str = "#00B900";
const DEFAULT_ACCENT: &str = "#1877F2";

pub fn success_page(provider: ProviderKind) -> HttpResponse {
    let color = match provider {
        ProviderKind::Line => LINE_GREEN,
        _ => DEFAULT_ACCENT,
    };
    let provider = escape_html(provider.display_name());

    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Login Successful</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }}
        .container {{ background: white; padding: 2rem; border-radius: 1rem; box-shadow: 0 10px 40px rgba(0,0,0,0.1); text-align: center; max-width: 400px; }}
        .success-icon {{ font-size: 4rem; color: {color}; margin-bottom: 1rem; }}
        h2 {{ color: #333; margin: 0 0 0.5rem 0; }}
        p {{ color: #666; margin: 0.5rem 0; }}
        .note {{ background: #f0f0f0; padding: 1rem; border-radius: 0.5rem; margin-top: 1.5rem; font-size: 0.9rem; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="success-icon">&#10003;</div>
        <h2>Login Successful!</h2>
        <p>You have successfully logged in with {provider}.</p>
        <div class="note">You can close this window and return to the app.<br><br>The app will automatically detect your login.</div>
    </div>
</body>
</html>"#
    );

    html(StatusCode::OK, body)
}

pub fn error_page(status: StatusCode, error: &str) -> HttpResponse {
    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Login Error</title></head>
<body>
    <h2>Login Error</h2>
    <p>{}</p>
    <p>You can close this window and return to the app.</p>
</body>
</html>"#,
        escape_html(error)
    );

    html(status, body)
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Provider error strings come from the query string and must not inject markup
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("access_denied"), "access_denied");
    }

    #[actix_web::test]
    async fn test_success_page_uses_provider_accent() {
        let line = success_page(ProviderKind::Line);
        assert_eq!(line.status(), StatusCode::OK);
        let body = actix_web::body::to_bytes(line.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Login Successful!"));
        assert!(text.contains(LINE_GREEN));
        assert!(text.contains("logged in with LINE"));

        let facebook = success_page(ProviderKind::Facebook);
        let body = actix_web::body::to_bytes(facebook.into_body()).await.unwrap();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains(DEFAULT_ACCENT));
    }
}
