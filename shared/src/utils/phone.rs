//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").expect("E.164 pattern is a valid regex")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is in E.164 format (`+` followed by 7 to 15 digits)
pub fn is_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Mask a phone number for logs (e.g., +88****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+886 912-345-678"), "+886912345678");
        assert_eq!(normalize_phone_number("(02) 1234 5678"), "0212345678");
    }

    #[test]
    fn test_is_e164() {
        assert!(is_e164("+886912345678"));
        assert!(is_e164("+66812345678"));
        assert!(is_e164("+14155552671"));
        assert!(!is_e164("0912345678"));
        assert!(!is_e164("+0123456789"));
        assert!(!is_e164("+886 912 345 678"));
        assert!(!is_e164("+1234"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+886912345678"), "+88****5678");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
