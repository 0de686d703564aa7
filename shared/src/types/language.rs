//! Languages supported for SMS templates and localized country names

use serde::{Deserialize, Serialize};

/// Supported client languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh_TW")]
    TraditionalChinese,
    #[serde(rename = "zh_CN")]
    SimplifiedChinese,
    #[serde(rename = "th")]
    Thai,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::TraditionalChinese,
        Language::SimplifiedChinese,
        Language::Thai,
        Language::Japanese,
    ];

    /// Wire code, e.g. `zh_TW`
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::TraditionalChinese => "zh_TW",
            Language::SimplifiedChinese => "zh_CN",
            Language::Thai => "th",
            Language::Japanese => "ja",
        }
    }

    /// Parse a wire code, falling back to English for anything unknown
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    /// Accepts both `zh_TW` and `zh-TW` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>(), Ok(lang));
        }
    }

    #[test]
    fn test_language_parsing_variants() {
        assert_eq!("zh-TW".parse::<Language>(), Ok(Language::TraditionalChinese));
        assert_eq!("ZH_cn".parse::<Language>(), Ok(Language::SimplifiedChinese));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::from_code_or_default("fr"), Language::English);
    }

    #[test]
    fn test_language_serde() {
        let json = serde_json::to_string(&Language::Thai).unwrap();
        assert_eq!(json, "\"th\"");
        let lang: Language = serde_json::from_str("\"zh_TW\"").unwrap();
        assert_eq!(lang, Language::TraditionalChinese);
    }
}
