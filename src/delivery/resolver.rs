//! Delivery-area resolution.
//!
//! Radius flow:        bands in caller order → first band whose radius covers the point → its fee
//! Neighborhood flow:  named areas in caller order → first normalized (neighborhood, city, state) match
//!
//! Nothing here sorts. Tier selection is first-in-list; callers that want
//! "smallest covering radius" call [`sort_bands_by_radius`] themselves.

use super::types::{
    DeliveryAddress, DeliveryAreaBand, DeliveryConfig, DeliveryMode, DeliveryQuote, NamedArea,
    QuoteMatch,
};
use crate::geo::{haversine_great_circle_distance_km, GeoPoint};
use std::cmp::Ordering;

/// A band selected for an order, with the distance that qualified it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMatch<'a> {
    pub band: &'a DeliveryAreaBand,
    pub fee_in_cents: u64,
    pub distance_km: f64,
}

/// Whether any fully-located band covers `order`. Fees are not consulted.
pub fn is_within_delivery_area(order: GeoPoint, bands: &[DeliveryAreaBand]) -> bool {
    bands.iter().any(|band| match band.geometry() {
        Some((origin, max_km)) => haversine_great_circle_distance_km(order, origin) <= max_km,
        None => false,
    })
}

/// First band (caller order) that is fully configured, priced, and covers `order`.
pub fn find_matching_band(order: GeoPoint, bands: &[DeliveryAreaBand]) -> Option<BandMatch<'_>> {
    bands.iter().find_map(|band| {
        let (origin, max_km) = band.geometry()?;
        let fee_in_cents = band.fee_in_cents?;
        let distance_km = haversine_great_circle_distance_km(order, origin);
        (distance_km <= max_km).then_some(BandMatch {
            band,
            fee_in_cents,
            distance_km,
        })
    })
}

/// Fee of the first covering band, or `None` when nothing applies.
pub fn get_delivery_fee(order: GeoPoint, bands: &[DeliveryAreaBand]) -> Option<u64> {
    find_matching_band(order, bands).map(|m| m.fee_in_cents)
}

/// First priced named area matching the address on all three parts.
pub fn find_named_area<'a>(address: &DeliveryAddress, areas: &'a [NamedArea]) -> Option<&'a NamedArea> {
    let neighborhood = normalize_place(&address.neighborhood);
    let city = normalize_place(&address.city);
    let state = normalize_place(&address.state);
    if neighborhood.is_empty() || city.is_empty() || state.is_empty() {
        return None;
    }

    areas.iter().find(|area| {
        area.fee_in_cents.is_some()
            && normalize_place(&area.neighborhood) == neighborhood
            && normalize_place(&area.city) == city
            && normalize_place(&area.state) == state
    })
}

pub fn get_named_area_fee(address: &DeliveryAddress, areas: &[NamedArea]) -> Option<u64> {
    find_named_area(address, areas).and_then(|area| area.fee_in_cents)
}

/// Stable ascending sort by radius; bands without one (or with a NaN radius) go last.
pub fn sort_bands_by_radius(bands: &mut [DeliveryAreaBand]) {
    let radius = |band: &DeliveryAreaBand| band.max_distance_km.filter(|km| !km.is_nan());
    bands.sort_by(|a, b| match (radius(a), radius(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Stateless view over one store's configuration.
pub struct DeliveryAreaResolver<'a> {
    config: &'a DeliveryConfig,
    bands: Vec<DeliveryAreaBand>,
}

impl<'a> DeliveryAreaResolver<'a> {
    pub fn new(config: &'a DeliveryConfig) -> Self {
        Self {
            config,
            bands: config.effective_bands(),
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.config.mode
    }

    /// Coverage check. Neighborhood stores cannot be checked from coordinates alone.
    pub fn covers(&self, order: GeoPoint) -> bool {
        match self.config.mode {
            DeliveryMode::Radius => is_within_delivery_area(order, &self.bands),
            DeliveryMode::Neighborhood => false,
        }
    }

    /// Coverage and fee for a destination.
    pub fn quote(&self, order: GeoPoint, address: Option<&DeliveryAddress>) -> DeliveryQuote {
        match self.config.mode {
            DeliveryMode::Radius => match find_matching_band(order, &self.bands) {
                Some(m) => DeliveryQuote {
                    covered: true,
                    fee_in_cents: Some(m.fee_in_cents),
                    matched: Some(QuoteMatch::Band {
                        area_id: m.band.area_id.clone(),
                        max_distance_km: m.band.max_distance_km.unwrap_or(m.distance_km),
                    }),
                    distance_km: Some(m.distance_km),
                },
                None => DeliveryQuote::not_covered(),
            },
            DeliveryMode::Neighborhood => {
                let Some(address) = address else {
                    return DeliveryQuote::not_covered();
                };
                match find_named_area(address, &self.config.named_areas) {
                    Some(area) => DeliveryQuote {
                        covered: true,
                        fee_in_cents: area.fee_in_cents,
                        matched: Some(QuoteMatch::Named {
                            area_id: area.area_id.clone(),
                            neighborhood: area.neighborhood.clone(),
                        }),
                        distance_km: None,
                    },
                    None => DeliveryQuote::not_covered(),
                }
            }
        }
    }
}

/// Lowercase, fold common accented letters, collapse whitespace.
fn normalize_place(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::EARTH_RADIUS_KM;
    use approx::assert_abs_diff_eq;

    /// A point `km` kilometers due north of (0, 0).
    fn north_of_null_island(km: f64) -> GeoPoint {
        GeoPoint::new((km / EARTH_RADIUS_KM).to_degrees(), 0.0)
    }

    fn band(id: &str, max_km: f64, fee: u64) -> DeliveryAreaBand {
        DeliveryAreaBand {
            area_id: id.into(),
            origin_latitude: Some(0.0),
            origin_longitude: Some(0.0),
            max_distance_km: Some(max_km),
            fee_in_cents: Some(fee),
        }
    }

    fn area(id: &str, neighborhood: &str, fee: Option<u64>) -> NamedArea {
        NamedArea {
            area_id: id.into(),
            neighborhood: neighborhood.into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            fee_in_cents: fee,
        }
    }

    fn address(neighborhood: &str, city: &str, state: &str) -> DeliveryAddress {
        DeliveryAddress {
            neighborhood: neighborhood.into(),
            city: city.into(),
            state: state.into(),
        }
    }

    #[test]
    fn test_empty_bands() {
        let order = GeoPoint::new(0.0, 0.0);
        assert!(!is_within_delivery_area(order, &[]));
        assert_eq!(get_delivery_fee(order, &[]), None);
    }

    #[test]
    fn test_order_at_origin() {
        let bands = [band("b1", 10.0, 500)];
        let order = GeoPoint::new(0.0, 0.0);
        assert!(is_within_delivery_area(order, &bands));
        assert_eq!(get_delivery_fee(order, &bands), Some(500));
    }

    #[test]
    fn test_order_outside_radius() {
        let bands = [band("b1", 10.0, 500)];
        let order = north_of_null_island(15.0);
        assert!(!is_within_delivery_area(order, &bands));
        assert_eq!(get_delivery_fee(order, &bands), None);
    }

    #[test]
    fn test_helper_point_distance() {
        let d = haversine_great_circle_distance_km(GeoPoint::new(0.0, 0.0), north_of_null_island(8.0));
        assert_abs_diff_eq!(d, 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_first_covering_band_wins() {
        let bands = [band("near", 5.0, 300), band("far", 15.0, 600)];
        let order = north_of_null_island(8.0);
        assert_eq!(get_delivery_fee(order, &bands), Some(600));

        let m = find_matching_band(order, &bands).unwrap();
        assert_eq!(m.band.area_id, "far");
        assert_abs_diff_eq!(m.distance_km, 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unsorted_bands_use_list_order() {
        let bands = [band("far", 15.0, 600), band("near", 5.0, 300)];
        let order = north_of_null_island(2.0);
        assert_eq!(get_delivery_fee(order, &bands), Some(600));
    }

    #[test]
    fn test_sort_bands_by_radius() {
        let mut bands = vec![
            DeliveryAreaBand { max_distance_km: None, ..band("draft", 0.0, 0) },
            band("far", 15.0, 600),
            band("near", 5.0, 300),
        ];
        sort_bands_by_radius(&mut bands);
        let ids: Vec<_> = bands.iter().map(|b| b.area_id.as_str()).collect();
        assert_eq!(ids, ["near", "far", "draft"]);
        assert_eq!(get_delivery_fee(north_of_null_island(2.0), &bands), Some(300));
    }

    #[test]
    fn test_sort_bands_with_nan_radius() {
        let mut bands: Vec<_> = (0..25_u32)
            .map(|i| {
                let km = if i % 3 == 0 { f64::NAN } else { f64::from(25 - i) };
                DeliveryAreaBand { max_distance_km: Some(km), ..band(&format!("b{i}"), 0.0, 100) }
            })
            .collect();
        bands.push(DeliveryAreaBand { max_distance_km: None, ..band("draft", 0.0, 0) });

        sort_bands_by_radius(&mut bands);

        let radii: Vec<f64> = bands.iter().filter_map(|b| b.max_distance_km).filter(|km| !km.is_nan()).collect();
        assert_eq!(radii.len(), 16);
        assert!(radii.windows(2).all(|w| w[0] <= w[1]));
        // Real radii first, then NaN and missing radii in their original order.
        assert!(bands[..16].iter().all(|b| b.max_distance_km.is_some_and(|km| !km.is_nan())));
        let tail: Vec<_> = bands[16..].iter().map(|b| b.area_id.as_str()).collect();
        assert_eq!(tail, ["b0", "b3", "b6", "b9", "b12", "b15", "b18", "b21", "b24", "draft"]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let order = north_of_null_island(8.0);
        let exact = haversine_great_circle_distance_km(order, GeoPoint::new(0.0, 0.0));
        let bands = [band("edge", exact, 450)];
        assert_eq!(get_delivery_fee(order, &bands), Some(450));
    }

    #[test]
    fn test_missing_origin_latitude_never_matches() {
        let mut b = band("b1", 20_000.0, 500);
        b.origin_latitude = None;
        let bands = [b];
        for order in [GeoPoint::new(0.0, 0.0), GeoPoint::new(45.0, 90.0), north_of_null_island(1.0)] {
            assert!(!is_within_delivery_area(order, &bands));
            assert_eq!(get_delivery_fee(order, &bands), None);
        }
    }

    #[test]
    fn test_missing_fee_still_covers_but_has_no_fee() {
        let mut unpriced = band("unpriced", 10.0, 0);
        unpriced.fee_in_cents = None;
        let order = GeoPoint::new(0.0, 0.0);

        assert!(is_within_delivery_area(order, std::slice::from_ref(&unpriced)));
        assert_eq!(get_delivery_fee(order, std::slice::from_ref(&unpriced)), None);

        let bands = [unpriced, band("priced", 20.0, 800)];
        assert_eq!(get_delivery_fee(order, &bands), Some(800));
    }

    #[test]
    fn test_free_delivery_band() {
        let bands = [band("free", 3.0, 0)];
        assert_eq!(get_delivery_fee(north_of_null_island(1.0), &bands), Some(0));
    }

    #[test]
    fn test_named_area_match_is_normalized() {
        let areas = [area("a1", "Vila Mariana", Some(700)), area("a2", "Jardim Paulista", Some(900))];
        let addr = address("  jardim   PAULISTA ", "sao paulo", "sp");
        assert_eq!(get_named_area_fee(&addr, &areas), Some(900));
        assert_eq!(find_named_area(&addr, &areas).unwrap().area_id, "a2");
    }

    #[test]
    fn test_named_area_requires_city_and_state() {
        let areas = [area("a1", "Centro", Some(500))];
        assert_eq!(get_named_area_fee(&address("Centro", "Campinas", "SP"), &areas), None);
        assert_eq!(get_named_area_fee(&address("Centro", "São Paulo", "RJ"), &areas), None);
        assert_eq!(get_named_area_fee(&address("Centro", "São Paulo", "SP"), &areas), Some(500));
    }

    #[test]
    fn test_named_area_skips_unpriced_and_empty() {
        let areas = [area("draft", "Centro", None), area("priced", "Centro", Some(650))];
        assert_eq!(get_named_area_fee(&address("Centro", "São Paulo", "SP"), &areas), Some(650));
        assert_eq!(get_named_area_fee(&address("", "São Paulo", "SP"), &areas), None);
        assert_eq!(get_named_area_fee(&address("Centro", "São Paulo", "SP"), &[]), None);
    }

    #[test]
    fn test_resolver_radius_quote_uses_store_origin() {
        let config = DeliveryConfig {
            store_id: "pizzaria".into(),
            mode: DeliveryMode::Radius,
            origin: Some(GeoPoint::new(0.0, 0.0)),
            bands: vec![
                DeliveryAreaBand {
                    area_id: "near".into(),
                    origin_latitude: None,
                    origin_longitude: None,
                    max_distance_km: Some(5.0),
                    fee_in_cents: Some(300),
                },
                DeliveryAreaBand {
                    area_id: "far".into(),
                    origin_latitude: None,
                    origin_longitude: None,
                    max_distance_km: Some(15.0),
                    fee_in_cents: Some(600),
                },
            ],
            ..Default::default()
        };
        let resolver = DeliveryAreaResolver::new(&config);

        let quote = resolver.quote(north_of_null_island(8.0), None);
        assert!(quote.covered);
        assert_eq!(quote.fee_in_cents, Some(600));
        assert_eq!(
            quote.matched,
            Some(QuoteMatch::Band { area_id: "far".into(), max_distance_km: 15.0 })
        );
        assert_abs_diff_eq!(quote.distance_km.unwrap(), 8.0, epsilon = 1e-6);

        assert!(resolver.covers(north_of_null_island(14.0)));
        assert!(!resolver.covers(north_of_null_island(16.0)));
        assert_eq!(resolver.quote(north_of_null_island(16.0), None), DeliveryQuote::not_covered());
    }

    #[test]
    fn test_resolver_neighborhood_quote() {
        let config = DeliveryConfig {
            mode: DeliveryMode::Neighborhood,
            named_areas: vec![area("a1", "Moema", Some(550))],
            ..Default::default()
        };
        let resolver = DeliveryAreaResolver::new(&config);
        let order = GeoPoint::new(-23.6, -46.66);

        assert_eq!(resolver.quote(order, None), DeliveryQuote::not_covered());
        assert!(!resolver.covers(order));

        let quote = resolver.quote(order, Some(&address("Moema", "São Paulo", "SP")));
        assert!(quote.covered);
        assert_eq!(quote.fee_in_cents, Some(550));
        assert!(quote.distance_km.is_none());
    }

    #[test]
    fn test_normalize_place() {
        assert_eq!(normalize_place("  São   Conceição "), "sao conceicao");
        assert_eq!(normalize_place("Tromsø"), "tromso");
    }
}
