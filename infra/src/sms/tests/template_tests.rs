use lc_shared::Language;

use crate::sms::{check_length, region_of, validate_phone_number, verification_message};

#[test]
fn test_every_language_embeds_the_code() {
    for language in Language::ALL {
        let message = verification_message("482913", language);
        assert!(message.contains("482913"), "{:?} template lost the code", language);
    }
}

#[test]
fn test_english_template() {
    assert_eq!(
        verification_message("123456", Language::English),
        "Your Live Commerce verification code is: 123456. Valid for 10 minutes."
    );
    assert!(verification_message("123456", Language::TraditionalChinese).contains("驗證碼"));
}

#[test]
fn test_phone_validation_requires_e164() {
    assert_eq!(validate_phone_number("+886912345678").unwrap(), "+886912345678");
    assert!(validate_phone_number("0912345678").is_err());
    assert!(validate_phone_number("+").is_err());
}

#[test]
fn test_region_detection() {
    assert_eq!(region_of("+886912345678").as_deref(), Some("TW"));
    assert_eq!(region_of("+66812345678").as_deref(), Some("TH"));
    assert_eq!(region_of("+14155552671").as_deref(), Some("US"));
    assert_eq!(region_of("not a number"), None);
}

#[test]
fn test_message_length_limit() {
    assert!(check_length(&"a".repeat(1600)).is_ok());
    assert!(check_length(&"a".repeat(1601)).is_err());
}
