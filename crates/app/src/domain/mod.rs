//! Storefront Domain Concerns

pub mod addresses;
pub mod carts;
pub mod coupons;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod users;
pub mod wishlists;
