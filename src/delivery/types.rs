//! Core types for the delivery subsystem.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One tier of a radius-priced delivery scheme.
///
/// Every geometry field is optional because store owners fill the
/// configuration in incrementally; a band missing any of them never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAreaBand {
    pub area_id: String,
    #[serde(default)]
    pub origin_latitude: Option<f64>,
    #[serde(default)]
    pub origin_longitude: Option<f64>,
    #[serde(default)]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub fee_in_cents: Option<u64>,
}

impl DeliveryAreaBand {
    /// Origin and radius, if both are fully configured.
    pub fn geometry(&self) -> Option<(GeoPoint, f64)> {
        match (self.origin_latitude, self.origin_longitude, self.max_distance_km) {
            (Some(lat), Some(lon), Some(max_km)) => Some((GeoPoint::new(lat, lon), max_km)),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        match (self.origin_latitude, self.origin_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

/// A neighborhood served at a flat fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedArea {
    pub area_id: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub fee_in_cents: Option<u64>,
}

/// Address parts of a delivery destination, as returned by geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Which area representation a store prices deliveries with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Neighborhood,
    #[default]
    Radius,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neighborhood => write!(f, "neighborhood"),
            Self::Radius => write!(f, "radius"),
        }
    }
}

/// A store's complete delivery configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub mode: DeliveryMode,
    /// Store location; bands without an origin of their own measure from here.
    #[serde(default)]
    pub origin: Option<GeoPoint>,
    #[serde(default)]
    pub named_areas: Vec<NamedArea>,
    #[serde(default)]
    pub bands: Vec<DeliveryAreaBand>,
}

impl DeliveryConfig {
    /// Bands with the store origin filled in where a band has none.
    ///
    /// A band's own origin always wins, and a half-set origin (only latitude
    /// or only longitude) is left alone so that the band stays unmatched.
    pub fn effective_bands(&self) -> Vec<DeliveryAreaBand> {
        self.bands
            .iter()
            .map(|band| match self.origin {
                Some(origin) if band.origin_latitude.is_none() && band.origin_longitude.is_none() => {
                    DeliveryAreaBand {
                        origin_latitude: Some(origin.latitude),
                        origin_longitude: Some(origin.longitude),
                        ..band.clone()
                    }
                }
                _ => band.clone(),
            })
            .collect()
    }
}

/// What produced a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteMatch {
    Band { area_id: String, max_distance_km: f64 },
    Named { area_id: String, neighborhood: String },
}

/// Result of resolving a destination against a store's delivery areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryQuote {
    pub covered: bool,
    pub fee_in_cents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<QuoteMatch>,
    /// Distance to the matched band's origin (radius mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl DeliveryQuote {
    pub fn not_covered() -> Self {
        Self {
            covered: false,
            fee_in_cents: None,
            matched: None,
            distance_km: None,
        }
    }
}

/// Errors raised at the edges of the subsystem (files, user input).
///
/// The resolver itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid delivery configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid coordinates ({latitude}, {longitude}); lat: -90..90, lon: -180..180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}
