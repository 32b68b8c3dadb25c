//! Great-circle distance between latitude/longitude points

use crate::models::Position;

/// Mean Earth radius in kilometers (spherical approximation).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers, using the
/// haversine formula on a spherical Earth.
///
/// Symmetric, zero for identical points, and finite for every in-domain
/// latitude [-90, 90] / longitude [-180, 180] pair.
pub fn distance(a: Position, b: Position) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);

    // h can exceed 1.0 by a few ulps for antipodal points; clamp before sqrt
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}
