use crate::types::GeoPoint;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers on a sphere of the given radius.
#[inline]
pub fn haversine(a: GeoPoint, b: GeoPoint, earth_radius_km: f64) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    // abs() keeps the result bit-for-bit symmetric in (a, b)
    let d_phi = (b.latitude - a.latitude).abs().to_radians();
    let d_lambda = (b.longitude - a.longitude).abs().to_radians();

    let sin_d_phi = (d_phi / 2.0).sin();
    let sin_d_lambda = (d_lambda / 2.0).sin();
    let h = sin_d_phi.mul_add(sin_d_phi, phi1.cos() * phi2.cos() * sin_d_lambda * sin_d_lambda);

    // Rounding can push h a hair past 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    earth_radius_km * c
}

/// Haversine distance in kilometers using [`EARTH_RADIUS_KM`].
#[inline]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine(a, b, EARTH_RADIUS_KM)
}

/// Arithmetic mean of latitudes and longitudes.
///
/// `points` must not be empty. Lloyd's loop repairs empty clusters before
/// calling this, so the check is a debug assertion only.
pub fn centroid(points: impl IntoIterator<Item = GeoPoint>) -> GeoPoint {
    let mut count = 0usize;
    let mut sum_lat = 0.0f64;
    let mut sum_lng = 0.0f64;
    for p in points {
        sum_lat += p.latitude;
        sum_lng += p.longitude;
        count += 1;
    }
    debug_assert!(count > 0, "centroid of an empty point set");

    GeoPoint {
        latitude: sum_lat / count as f64,
        longitude: sum_lng / count as f64,
    }
}
