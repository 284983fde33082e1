//! Settings Records

use jiff::Timestamp;

/// Store-wide configuration. A single row backs this record.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub flat_shipping_rate: u64,
    pub free_shipping_threshold: u64,
    pub cod_enabled: bool,
    pub updated_at: Timestamp,
}
