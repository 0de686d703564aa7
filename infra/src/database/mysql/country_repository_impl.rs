//! MySQL implementation of the CountryRepository trait.

use async_trait::async_trait;
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use lc_core::domain::entities::country::Country;
use lc_core::errors::DomainError;
use lc_core::repositories::CountryRepository;

use super::{column_error, map_db_error};

pub struct MySqlCountryRepository {
    pool: MySqlPool,
}

impl MySqlCountryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn row_to_country(row: &MySqlRow) -> Result<Country, DomainError> {
    Ok(Country {
        country_code: row
            .try_get("country_code")
            .map_err(|e| column_error("country_code", e))?,
        dial_code: row.try_get("dial_code").map_err(|e| column_error("dial_code", e))?,
        name_en: row.try_get("name_en").map_err(|e| column_error("name_en", e))?,
        name_zh_tw: row.try_get("name_zh_tw").map_err(|e| column_error("name_zh_tw", e))?,
        name_zh_cn: row.try_get("name_zh_cn").map_err(|e| column_error("name_zh_cn", e))?,
        name_th: row.try_get("name_th").map_err(|e| column_error("name_th", e))?,
        name_ja: row.try_get("name_ja").map_err(|e| column_error("name_ja", e))?,
        flag_emoji: row.try_get("flag_emoji").map_err(|e| column_error("flag_emoji", e))?,
        is_active: row.try_get("is_active").map_err(|e| column_error("is_active", e))?,
        display_order: row
            .try_get("display_order")
            .map_err(|e| column_error("display_order", e))?,
    })
}

#[async_trait]
impl CountryRepository for MySqlCountryRepository {
    async fn list_active(&self) -> Result<Vec<Country>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT country_code, dial_code, name_en, name_zh_tw, name_zh_cn,
                   name_th, name_ja, flag_emoji, is_active, display_order
            FROM countries
            WHERE is_active = TRUE
            ORDER BY display_order, country_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list countries", e))?;

        rows.iter().map(row_to_country).collect()
    }
}
