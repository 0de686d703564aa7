//! Countries selectable for phone registration.

use lc_shared::Language;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2
    pub country_code: String,
    /// Dial prefix including `+`
    pub dial_code: String,
    pub name_en: String,
    pub name_zh_tw: Option<String>,
    pub name_zh_cn: Option<String>,
    pub name_th: Option<String>,
    pub name_ja: Option<String>,
    pub flag_emoji: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

/// Country as returned to clients, with the name in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedCountry {
    pub country_code: String,
    pub dial_code: String,
    pub name: String,
    pub flag_emoji: Option<String>,
}

impl Country {
    /// Name in the requested language, falling back to English when missing
    pub fn name_for(&self, language: Language) -> &str {
        let localized = match language {
            Language::English => None,
            Language::TraditionalChinese => self.name_zh_tw.as_deref(),
            Language::SimplifiedChinese => self.name_zh_cn.as_deref(),
            Language::Thai => self.name_th.as_deref(),
            Language::Japanese => self.name_ja.as_deref(),
        };
        localized.filter(|name| !name.is_empty()).unwrap_or(&self.name_en)
    }

    pub fn localize(&self, language: Language) -> LocalizedCountry {
        LocalizedCountry {
            country_code: self.country_code.clone(),
            dial_code: self.dial_code.clone(),
            name: self.name_for(language).to_string(),
            flag_emoji: self.flag_emoji.clone(),
        }
    }
}

fn entry(
    country_code: &str,
    dial_code: &str,
    names: [&str; 5],
    flag_emoji: &str,
    display_order: i32,
) -> Country {
    let [en, zh_tw, zh_cn, th, ja] = names;
    Country {
        country_code: country_code.to_string(),
        dial_code: dial_code.to_string(),
        name_en: en.to_string(),
        name_zh_tw: Some(zh_tw.to_string()),
        name_zh_cn: Some(zh_cn.to_string()),
        name_th: Some(th.to_string()),
        name_ja: Some(ja.to_string()),
        flag_emoji: Some(flag_emoji.to_string()),
        is_active: true,
        display_order,
    }
}

/// Seed catalogue, mirrored by the SQL migration
pub fn default_countries() -> Vec<Country> {
    vec![
        entry("TW", "+886", ["Taiwan", "台灣", "台湾", "ไต้หวัน", "台湾"], "🇹🇼", 1),
        entry("TH", "+66", ["Thailand", "泰國", "泰国", "ประเทศไทย", "タイ"], "🇹🇭", 2),
        entry("JP", "+81", ["Japan", "日本", "日本", "ญี่ปุ่น", "日本"], "🇯🇵", 3),
        entry("HK", "+852", ["Hong Kong", "香港", "香港", "ฮ่องกง", "香港"], "🇭🇰", 4),
        entry("CN", "+86", ["China", "中國", "中国", "จีน", "中国"], "🇨🇳", 5),
        entry("US", "+1", ["United States", "美國", "美国", "สหรัฐอเมริกา", "アメリカ"], "🇺🇸", 6),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_localization_with_english_fallback() {
        let mut taiwan = default_countries().remove(0);
        assert_eq!(taiwan.name_for(Language::TraditionalChinese), "台灣");
        assert_eq!(taiwan.name_for(Language::Japanese), "台湾");

        taiwan.name_th = None;
        assert_eq!(taiwan.name_for(Language::Thai), "Taiwan");
    }

    #[test]
    fn test_default_catalogue_is_ordered() {
        let countries = default_countries();
        let orders: Vec<i32> = countries.iter().map(|c| c.display_order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        assert_eq!(countries[0].localize(Language::English).dial_code, "+886");
    }
}
