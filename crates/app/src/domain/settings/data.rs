//! Settings Data

/// Settings Update Data
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub flat_shipping_rate: Option<u64>,
    pub free_shipping_threshold: Option<u64>,
    pub cod_enabled: Option<bool>,
}
