use crate::geo::haversine;
use crate::types::{BusinessRecord, GeoPoint};
use rand::RngExt;

/// Roulette-wheel pick: walks the cumulative weights until they cover a uniform
/// draw over `[0, sum)`.
#[inline(always)]
fn sample_by_distance(rng: &mut impl RngExt, min_distances: &[f64], sum: f64) -> usize {
    let random_threshold = rng.random::<f64>() * sum;
    let mut cumsum = 0.0;

    for (i, &distance) in min_distances.iter().enumerate() {
        cumsum += distance;
        if cumsum >= random_threshold {
            return i;
        }
    }

    // Only reachable through rounding in the running sum
    min_distances.len() - 1
}

/// Picks `k` seed indices into `points` with k-means++.
///
/// `k` is not clamped to `points.len()`: once every point is a seed the
/// remaining weights are all zero and the wheel keeps landing on index 0,
/// so duplicate seeds come back. Lloyd's loop repairs the resulting empty
/// clusters.
pub fn find_initial(
    rng: &mut impl RngExt,
    points: &[&BusinessRecord],
    k: usize,
    earth_radius_km: f64,
) -> Vec<usize> {
    let n = points.len();
    assert!(n > 0, "k-means++ needs at least one point");

    let mut init_points = Vec::<usize>::with_capacity(k);
    if k == 0 {
        return init_points;
    }

    let c0 = rng.random_range(0..n);
    init_points.push(c0);

    let squared_distance = |i: usize, c: usize| {
        let d = haversine(points[i].location, points[c].location, earth_radius_km);
        d * d
    };

    let mut min_distances = (0..n).map(|i| squared_distance(i, c0)).collect::<Vec<_>>();
    let mut min_distances_sum = min_distances.iter().sum::<f64>();

    for _ in 1..k {
        let next = sample_by_distance(rng, &min_distances, min_distances_sum);
        init_points.push(next);

        min_distances_sum = 0.0;
        for (i, current_min) in min_distances.iter_mut().enumerate() {
            let d = squared_distance(i, next);
            if d < *current_min {
                *current_min = d;
            }
            min_distances_sum += *current_min;
        }
    }

    init_points
}

/// Seed locations for `k` clusters.
pub fn initial_centroids(
    rng: &mut impl RngExt,
    points: &[&BusinessRecord],
    k: usize,
    earth_radius_km: f64,
) -> Vec<GeoPoint> {
    find_initial(rng, points, k, earth_radius_km)
        .into_iter()
        .map(|i| points[i].location)
        .collect()
}
