#[cfg(feature = "_debug")]
pub mod analysis;
#[cfg(not(feature = "_debug"))]
mod analysis;
#[cfg(feature = "_debug")]
pub mod dataset;
#[cfg(not(feature = "_debug"))]
mod dataset;
#[cfg(feature = "_debug")]
pub mod debug_helpers;
#[cfg(feature = "_debug")]
pub mod kmeans;
#[cfg(not(feature = "_debug"))]
mod kmeans;
#[cfg(feature = "_debug")]
pub mod refine;
#[cfg(not(feature = "_debug"))]
mod refine;
#[cfg(feature = "_debug")]
pub mod rng;
#[cfg(not(feature = "_debug"))]
mod rng;
#[cfg(feature = "_debug")]
pub mod scoring;
#[cfg(not(feature = "_debug"))]
mod scoring;

pub mod config;
pub mod geo;
mod types;

pub use analysis::{CompetitorAnalysis, NearbyBusiness};
pub use config::{BoundingBox, ClusteringConfig, ConfidenceTiers, ConfigError, ScoreWeights};
pub use kmeans::{Cluster, ClusterMember};
pub use scoring::ClusterScore;
pub use types::{BusinessRecord, GeoPoint};

use scoring::OpportunityMetrics;
use serde::Serialize;
use snafu::prelude::*;
use tracing::debug;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum LocationError {
    #[snafu(display("at least one business record is required"))]
    EmptyDataset,

    #[snafu(display("invalid clustering config: {source}"))]
    InvalidConfig { source: ConfigError },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub confidence: f64,
    pub opportunity: &'static str,
    pub opportunity_score: f64,
    pub competitor_count: usize,
}

/// Everything one recommendation run produces. Borrows the input records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringResult<'a> {
    pub clusters: Vec<Cluster<'a>>,
    pub recommended_location: GeoPoint,
    pub nearby_businesses: Vec<NearbyBusiness<'a>>,
    pub competitor_analysis: CompetitorAnalysis<'a>,
    pub zone_type: String,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub seed: u64,
    /// True when no record matched the category and the whole dataset was clustered
    pub category_fallback: bool,
    pub k_candidates: Vec<usize>,
    pub candidate_inertias: Vec<f64>,
    pub candidate_loop_iterations: Vec<usize>,
    pub candidate_converged: Vec<bool>,
    pub selected_k: usize,
    pub kmeans_loop_iterations: usize,
    pub kmeans_converged: bool,
    /// Best first
    pub cluster_scores: Vec<ClusterScore>,
    pub selected_cluster: usize,
    pub snapped_to: Option<i64>,
}

/// Recommend a site for a business of `category` among `businesses`.
///
/// ```
/// use sitescout::{BusinessRecord, GeoPoint};
///
/// let shop = |id, lat, lng| BusinessRecord {
///     id,
///     name: format!("Shop {id}"),
///     category: "Retail".to_owned(),
///     location: GeoPoint::new(lat, lng),
///     street: "Rizal Ave".to_owned(),
///     zone_type: "Commercial".to_owned(),
///     zone_weight: 2,
///     business_density_50m: 4,
///     business_density_100m: 6,
///     business_density_200m: 9,
///     competitor_density_50m: 1,
///     competitor_density_100m: 1,
///     competitor_density_200m: 2,
///     status: "Active".to_owned(),
/// };
/// let businesses = vec![
///     shop(1, 14.8350, 120.9530),
///     shop(2, 14.8352, 120.9533),
///     shop(3, 14.8400, 120.9590),
/// ];
///
/// let result = sitescout::find_optimal_location(&businesses, "retail").unwrap();
///
/// let bounds = sitescout::BoundingBox::default();
/// assert!(bounds.contains(result.recommended_location));
/// assert_eq!(result.competitor_analysis.competitor_count, 3);
/// ```
///
/// Clustering is seeded from fresh entropy, so repeated calls may disagree.
/// See [`find_optimal_location_extra`] for a fixed seed and tuning.
pub fn find_optimal_location<'a>(
    businesses: &'a [BusinessRecord],
    category: &str,
) -> Result<ClusteringResult<'a>, LocationError> {
    find_optimal_location_extra(businesses, category, &ClusteringConfig::default(), None)
}

pub fn find_optimal_location_extra<'a>(
    businesses: &'a [BusinessRecord],
    category: &str,
    config: &ClusteringConfig,
    seed: Option<u64>,
) -> Result<ClusteringResult<'a>, LocationError> {
    find_optimal_location_debug(businesses, category, config, seed).map(|(result, _)| result)
}

pub fn find_optimal_location_debug<'a>(
    businesses: &'a [BusinessRecord],
    category: &str,
    config: &ClusteringConfig,
    seed: Option<u64>,
) -> Result<(ClusteringResult<'a>, DebugInfo), LocationError> {
    ensure!(!businesses.is_empty(), EmptyDatasetSnafu);
    config.validate().context(InvalidConfigSnafu)?;

    let seed = seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = rng::new(Some(seed));
    let radius = config.earth_radius_km;

    let filtered = dataset::filter_by_category(businesses, category);
    let points = filtered.points;
    let streets = dataset::StreetStats::from_businesses(businesses);
    debug!(
        category,
        records = businesses.len(),
        clustered = points.len(),
        fallback = filtered.fell_back,
        streets = streets.len(),
        "dataset prepared"
    );

    let elbow = kmeans::elbow::select_k(
        &mut rng,
        &points,
        &config.k_candidates,
        config.elbow_ratio,
        config.trial_max_iterations,
        radius,
    );
    debug!(k = elbow.k, inertias = ?elbow.inertias, "elbow scan done");

    let lloyds = kmeans::lloyds::find_clusters(
        &mut rng,
        &points,
        elbow.k,
        config.final_max_iterations,
        radius,
    );
    debug!(
        iterations = lloyds.iterations,
        converged = lloyds.converged,
        "final clustering done"
    );
    let clusters = lloyds.clusters;

    let cluster_scores = scoring::rank_clusters(&clusters, &streets, &config.weights);
    let selected = scoring::select_cluster(&cluster_scores, config.low_traffic_floor);
    let winner = &clusters[selected.cluster_id];
    debug!(
        cluster = selected.cluster_id,
        score = selected.score,
        members = winner.members.len(),
        "cluster selected"
    );

    let refined = refine::refine(winner.centroid, businesses, &streets, config);

    let confidence =
        analysis::confidence(winner.members.len(), points.len(), &config.confidence);
    let competitor_analysis =
        analysis::analyze_competitors(refined.location, businesses, category, confidence, config);
    let nearby_businesses =
        analysis::nearest_businesses(refined.location, businesses, config.nearby_count, radius);

    let opportunity_score = scoring::opportunity_score(&winner_metrics(
        winner,
        competitor_analysis.competitors_within_1km,
    ));

    debug!(
        latitude = refined.location.latitude,
        longitude = refined.location.longitude,
        snapped = refined.snapped_to.is_some(),
        confidence,
        "recommendation ready"
    );

    let debug_info = DebugInfo {
        seed,
        category_fallback: filtered.fell_back,
        k_candidates: config.k_candidates.clone(),
        candidate_inertias: elbow.inertias,
        candidate_loop_iterations: elbow.loop_iterations,
        candidate_converged: elbow.converged,
        selected_k: elbow.k,
        kmeans_loop_iterations: lloyds.iterations,
        kmeans_converged: lloyds.converged,
        cluster_scores,
        selected_cluster: selected.cluster_id,
        snapped_to: refined.snapped_to.map(|b| b.id),
    };

    let result = ClusteringResult {
        analysis: Analysis {
            confidence,
            opportunity: analysis::opportunity(confidence, &config.confidence),
            opportunity_score,
            competitor_count: competitor_analysis.competitor_count,
        },
        clusters,
        recommended_location: refined.location,
        nearby_businesses,
        competitor_analysis,
        zone_type: refined.zone_type,
    };

    Ok((result, debug_info))
}

/// Mean surrounding densities of the winning cluster, its size, and the
/// competitors near the recommendation.
fn winner_metrics(winner: &Cluster, competitors_nearby: usize) -> OpportunityMetrics {
    let n = winner.members.len() as f64;
    let mean = |f: fn(&BusinessRecord) -> u32| {
        winner
            .members
            .iter()
            .map(|m| f(m.business) as f64)
            .sum::<f64>()
            / n
    };

    OpportunityMetrics {
        competitor_count: competitors_nearby as f64,
        business_density_50m: mean(|b| b.business_density_50m),
        business_density_100m: mean(|b| b.business_density_100m),
        business_density_200m: mean(|b| b.business_density_200m),
        cluster_strength: n,
    }
}
