//! Localized verification message bodies

use lc_shared::Language;

/// Verification SMS body for `language`
pub fn verification_message(code: &str, language: Language) -> String {
    match language {
        Language::English => format!(
            "Your Live Commerce verification code is: {}. Valid for 10 minutes.",
            code
        ),
        Language::TraditionalChinese => format!("您的直播商城驗證碼是：{}。有效期限10分鐘。", code),
        Language::SimplifiedChinese => format!("您的直播商城验证码是：{}。有效期限10分钟。", code),
        Language::Thai => format!("รหัสยืนยัน Live Commerce ของคุณคือ: {} มีอายุ 10 นาที", code),
        Language::Japanese => format!("Live Commerce認証コードは {} です。10分間有効です。", code),
    }
}
