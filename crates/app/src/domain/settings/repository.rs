//! Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::settings::{data::SettingsUpdate, records::StoreSettings};

// The singleton row is seeded by the migration; the upsert keeps reads
// working even against a wiped table.
const GET_SETTINGS_SQL: &str = "\
INSERT INTO settings DEFAULT VALUES \
ON CONFLICT (id) DO UPDATE SET id = TRUE \
RETURNING *";

const UPDATE_SETTINGS_SQL: &str = "\
UPDATE settings SET \
    flat_shipping_rate = COALESCE($1, flat_shipping_rate), \
    free_shipping_threshold = COALESCE($2, free_shipping_threshold), \
    cod_enabled = COALESCE($3, cod_enabled), \
    updated_at = now() \
RETURNING *";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSettingsRepository;

impl PgSettingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<StoreSettings, sqlx::Error> {
        query_as::<Postgres, StoreSettings>(GET_SETTINGS_SQL)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        update: &SettingsUpdate,
    ) -> Result<StoreSettings, sqlx::Error> {
        query_as::<Postgres, StoreSettings>(UPDATE_SETTINGS_SQL)
            .bind(update.flat_shipping_rate.map(try_to_i64).transpose()?)
            .bind(update.free_shipping_threshold.map(try_to_i64).transpose()?)
            .bind(update.cod_enabled)
            .fetch_one(&mut **tx)
            .await
    }
}

fn try_to_i64(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|source| sqlx::Error::Encode(Box::new(source)))
}

fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|source| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}

impl<'r> FromRow<'r, PgRow> for StoreSettings {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            flat_shipping_rate: try_get_amount(row, "flat_shipping_rate")?,
            free_shipping_threshold: try_get_amount(row, "free_shipping_threshold")?,
            cod_enabled: row.try_get("cod_enabled")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
