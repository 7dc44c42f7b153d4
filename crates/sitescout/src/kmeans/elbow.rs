use super::lloyds::{self, LloydsLoopResult};
use super::Cluster;
use crate::geo::haversine;
use crate::types::BusinessRecord;
use rand::RngExt;
use tracing::trace;

/// Sum over all members of the squared distance to their cluster's centroid.
pub fn inertia(clusters: &[Cluster], earth_radius_km: f64) -> f64 {
    clusters
        .iter()
        .flat_map(|cluster| {
            cluster
                .member_locations()
                .map(move |p| haversine(p, cluster.centroid, earth_radius_km))
        })
        .map(|d| d * d)
        .sum()
}

/// First point of diminishing returns in an inertia curve.
///
/// With `drop[i] = inertias[i] - inertias[i + 1]`, returns `ks[i]` for the
/// first `i >= 1` whose drop is below `ratio * drop[0]`, or the last candidate
/// when no drop qualifies.
pub fn elbow_k(ks: &[usize], inertias: &[f64], ratio: f64) -> usize {
    assert!(!ks.is_empty());
    assert_eq!(ks.len(), inertias.len());

    let drops = inertias.windows(2).map(|w| w[0] - w[1]).collect::<Vec<_>>();
    let Some(&first_drop) = drops.first() else {
        return ks[0];
    };
    let threshold = first_drop * ratio;

    for (i, &drop) in drops.iter().enumerate().skip(1) {
        if drop < threshold {
            return ks[i];
        }
    }

    ks[ks.len() - 1]
}

#[derive(Debug)]
pub struct Result {
    pub k: usize,
    pub inertias: Vec<f64>,
    pub loop_iterations: Vec<usize>,
    pub converged: Vec<bool>,
}

/// Clusters the points once per candidate and picks K at the elbow of the
/// inertia curve. Trials run in candidate order on the one generator, so a
/// seeded run is reproducible.
pub fn select_k(
    rng: &mut impl RngExt,
    points: &[&BusinessRecord],
    ks: &[usize],
    ratio: f64,
    max_iter: usize,
    earth_radius_km: f64,
) -> Result {
    let mut inertias = Vec::with_capacity(ks.len());
    let mut loop_iterations = Vec::with_capacity(ks.len());
    let mut converged = Vec::with_capacity(ks.len());

    for &k in ks {
        let LloydsLoopResult {
            clusters,
            iterations,
            converged: trial_converged,
        } = lloyds::find_clusters(rng, points, k, max_iter, earth_radius_km);

        let trial_inertia = inertia(&clusters, earth_radius_km);
        trace!(k, inertia = trial_inertia, iterations, "elbow trial");

        inertias.push(trial_inertia);
        loop_iterations.push(iterations);
        converged.push(trial_converged);
    }

    Result {
        k: elbow_k(ks, &inertias, ratio),
        inertias,
        loop_iterations,
        converged,
    }
}
