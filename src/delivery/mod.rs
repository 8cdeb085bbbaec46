//! Delivery-area subsystem.
//!
//! Pure fee resolution over radius bands and named neighborhoods, plus the
//! on-disk store configuration those areas come from.

pub mod resolver;
pub mod store;
pub mod types;

pub use resolver::{
    find_matching_band, find_named_area, get_delivery_fee, get_named_area_fee, is_within_delivery_area,
    sort_bands_by_radius, BandMatch, DeliveryAreaResolver,
};
pub use store::{config_warnings, ConfigWarning, DeliveryConfigStore};
pub use types::{
    DeliveryAddress, DeliveryAreaBand, DeliveryConfig, DeliveryError, DeliveryMode, DeliveryQuote, NamedArea,
    QuoteMatch,
};
