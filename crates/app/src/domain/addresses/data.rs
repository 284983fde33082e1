//! Addresses Data

use crate::domain::addresses::records::AddressUuid;

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}
