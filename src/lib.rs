//! Delivery-area resolution for storefronts.
//!
//! Given a customer's coordinates (and address, for neighborhood-priced
//! stores) and a store's configured delivery areas, decide whether the store
//! delivers there and which fee in cents applies.

pub mod config;
pub mod delivery;
pub mod geo;
pub mod money;
pub mod server;
