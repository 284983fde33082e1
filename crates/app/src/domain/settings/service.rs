//! Settings service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::settings::{
        data::SettingsUpdate, errors::SettingsServiceError, records::StoreSettings,
        repository::PgSettingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    db: Db,
    repository: PgSettingsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSettingsRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn get_settings(&self) -> Result<StoreSettings, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.get_settings(&mut tx).await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<StoreSettings, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.update_settings(&mut tx, &update).await?;

        tx.commit().await?;

        Ok(settings)
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Current store configuration.
    async fn get_settings(&self) -> Result<StoreSettings, SettingsServiceError>;

    /// Partial update of store configuration. Admin only.
    async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<StoreSettings, SettingsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn defaults_are_seeded_by_the_migration() -> TestResult {
        let ctx = TestContext::new().await;

        let settings = ctx.settings.get_settings().await?;

        assert_eq!(settings.flat_shipping_rate, 50);
        assert_eq!(settings.free_shipping_threshold, 999);
        assert!(!settings.cod_enabled);

        Ok(())
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() -> TestResult {
        let ctx = TestContext::new().await;

        let updated = ctx
            .settings
            .update_settings(SettingsUpdate {
                cod_enabled: Some(true),
                ..SettingsUpdate::default()
            })
            .await?;

        assert!(updated.cod_enabled);
        assert_eq!(updated.flat_shipping_rate, 50);
        assert_eq!(updated.free_shipping_threshold, 999);

        Ok(())
    }

    #[tokio::test]
    async fn updated_rates_feed_back_into_reads() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.settings
            .update_settings(SettingsUpdate {
                flat_shipping_rate: Some(75),
                free_shipping_threshold: Some(1500),
                ..SettingsUpdate::default()
            })
            .await?;

        let settings = ctx.settings.get_settings().await?;

        assert_eq!(settings.flat_shipping_rate, 75);
        assert_eq!(settings.free_shipping_threshold, 1500);

        Ok(())
    }
}
