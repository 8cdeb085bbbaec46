//! Great-circle geometry over decimal-degree coordinates.
//!
//! Spherical Earth, R = 6371 km. Inputs are never range-checked here;
//! NaN in, NaN out.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within -90..=90 and longitude within -180..=180.
    ///
    /// Only the CLI and HTTP layers call this; the resolver trusts its input.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Haversine distance between two points, in kilometers.
pub fn haversine_great_circle_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude) * DEG;
    let d_lon = (b.longitude - a.longitude) * DEG;

    let h = (d_lat / 2.0).sin().powi(2)
        + (a.latitude * DEG).cos() * (b.latitude * DEG).cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// "23.5505°S, 46.6333°W"
pub fn format_coords(point: GeoPoint) -> String {
    let ns = if point.latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if point.longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}",
        point.latitude.abs(),
        ns,
        point.longitude.abs(),
        ew
    )
}
