use super::plus_plus_init::initial_centroids;
use super::{Cluster, ClusterMember};
use crate::geo::{centroid, haversine};
use crate::types::{BusinessRecord, GeoPoint};
use rand::RngExt;

/// Index of the nearest centroid. Ties go to the lowest index.
#[inline]
pub fn nearest_centroid(point: GeoPoint, centroids: &[GeoPoint], earth_radius_km: f64) -> usize {
    let mut min = f64::INFINITY;
    let mut min_idx = 0;
    for (j, &c) in centroids.iter().enumerate() {
        let d = haversine(point, c, earth_radius_km);
        if d < min {
            min = d;
            min_idx = j;
        }
    }
    min_idx
}

/// Builds one cluster per centroid and assigns every point to its nearest one.
pub fn assign_points<'a>(
    points: &[&'a BusinessRecord],
    centroids: &[GeoPoint],
    earth_radius_km: f64,
) -> Vec<Cluster<'a>> {
    let mut clusters = centroids
        .iter()
        .enumerate()
        .map(|(id, &c)| Cluster::new(id, c))
        .collect::<Vec<_>>();

    for &p in points {
        let j = nearest_centroid(p.location, centroids, earth_radius_km);
        clusters[j].members.push(ClusterMember::from(p));
    }

    clusters
}

/// Gives every empty cluster a uniformly random point as its only member.
///
/// This keeps the centroid update defined, at the cost of pulling the cluster
/// to wherever the drawn record happens to be. Returns how many clusters were
/// repaired.
pub fn repair_empty_clusters<'a>(
    rng: &mut impl RngExt,
    points: &[&'a BusinessRecord],
    clusters: &mut [Cluster<'a>],
) -> usize {
    let mut repaired = 0;
    for cluster in clusters.iter_mut().filter(|c| c.members.is_empty()) {
        let fallback = points[rng.random_range(0..points.len())];
        cluster.members.push(ClusterMember::from(fallback));
        cluster.repaired = true;
        repaired += 1;
    }
    repaired
}

#[inline]
pub fn update_centroids(clusters: &[Cluster]) -> Vec<GeoPoint> {
    clusters
        .iter()
        .map(|cluster| centroid(cluster.member_locations()))
        .collect()
}

#[derive(Debug)]
pub struct LloydsLoopResult<'a> {
    pub clusters: Vec<Cluster<'a>>,
    pub iterations: usize,
    pub converged: bool,
}

/// Runs assignment, repair and update until the centroids stop moving
/// (bit-for-bit) or `max_iter` passes have been made.
///
/// The returned clusters carry the centroids of the last assignment pass.
pub fn lloyds_loop<'a>(
    rng: &mut impl RngExt,
    points: &[&'a BusinessRecord],
    mut centroids: Vec<GeoPoint>,
    max_iter: usize,
    earth_radius_km: f64,
) -> LloydsLoopResult<'a> {
    assert!(!points.is_empty());
    assert!(!centroids.is_empty());
    assert!(max_iter > 0);

    let mut clusters = Vec::new();

    for i in 0..max_iter {
        clusters = assign_points(points, &centroids, earth_radius_km);
        repair_empty_clusters(rng, points, &mut clusters);

        let new_centroids = update_centroids(&clusters);
        if new_centroids == centroids {
            return LloydsLoopResult {
                clusters,
                iterations: i + 1,
                converged: true,
            };
        }
        centroids = new_centroids;
    }

    LloydsLoopResult {
        clusters,
        iterations: max_iter,
        converged: false,
    }
}

/// k-means++ seeding followed by Lloyd's loop.
pub fn find_clusters<'a>(
    rng: &mut impl RngExt,
    points: &[&'a BusinessRecord],
    k: usize,
    max_iter: usize,
    earth_radius_km: f64,
) -> LloydsLoopResult<'a> {
    let centroids = initial_centroids(rng, points, k, earth_radius_km);
    lloyds_loop(rng, points, centroids, max_iter, earth_radius_km)
}
