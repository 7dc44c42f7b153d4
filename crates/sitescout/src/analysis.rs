use crate::config::{ClusteringConfig, ConfidenceTiers};
use crate::dataset::matching_category;
use crate::geo::haversine;
use crate::types::{BusinessRecord, GeoPoint};
use serde::Serialize;

const EXCELLENT_OPPORTUNITY: &str =
    "EXCELLENT OPPORTUNITY — High foot-traffic indicators and healthy market space.";
const GOOD_OPPORTUNITY: &str =
    "GOOD OPPORTUNITY — Balanced customer reach with moderate competition.";
const CAUTION: &str = "CAUTION — Competition density is high relative to surroundings.";

const STRATEGY_ENTER: &str = "Ideal location for business entry.";
const STRATEGY_DIFFERENTIATE: &str = "Proceed with clear differentiation.";

#[derive(Debug, Copy, Clone, Serialize)]
pub struct NearbyBusiness<'a> {
    pub business: &'a BusinessRecord,
    /// Kilometers from the recommended location
    pub distance: f64,
}

/// `limit` closest businesses of any category, nearest first.
pub fn nearest_businesses<'a>(
    from: GeoPoint,
    businesses: &'a [BusinessRecord],
    limit: usize,
    earth_radius_km: f64,
) -> Vec<NearbyBusiness<'a>> {
    let mut nearby = with_distances(from, businesses.iter(), earth_radius_km);
    nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    nearby.truncate(limit);
    nearby
}

fn with_distances<'a>(
    from: GeoPoint,
    businesses: impl Iterator<Item = &'a BusinessRecord>,
    earth_radius_km: f64,
) -> Vec<NearbyBusiness<'a>> {
    businesses
        .map(|business| NearbyBusiness {
            business,
            distance: haversine(from, business.location, earth_radius_km),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis<'a> {
    pub competitor_count: usize,
    pub nearest_competitor: Option<&'a BusinessRecord>,
    /// Kilometers, 0 when there is no competitor
    pub distance_to_nearest: f64,
    pub competitors_within_500m: usize,
    pub competitors_within_1km: usize,
    pub competitors_within_2km: usize,
    /// Share of businesses within the saturation radius that are competitors
    pub market_saturation: f64,
    pub recommended_strategy: &'static str,
}

/// Same-category businesses around `from`. Competitors come from the whole
/// dataset, never the fallback set.
pub fn analyze_competitors<'a>(
    from: GeoPoint,
    businesses: &'a [BusinessRecord],
    category: &str,
    confidence: f64,
    config: &ClusteringConfig,
) -> CompetitorAnalysis<'a> {
    let radius = config.earth_radius_km;
    let competitors = with_distances(from, matching_category(businesses, category), radius);

    // First minimum wins
    let nearest = competitors.iter().fold(None::<&NearbyBusiness>, |best, c| match best {
        Some(b) if b.distance <= c.distance => best,
        _ => Some(c),
    });

    let within = |km: f64| competitors.iter().filter(|c| c.distance <= km).count();
    let [r_500m, r_1km, r_2km] = config.competitor_radii_km;

    let saturation_radius = config.saturation_radius_km;
    let competitors_in_saturation_radius = within(saturation_radius);
    let businesses_in_saturation_radius = businesses
        .iter()
        .filter(|b| haversine(from, b.location, radius) <= saturation_radius)
        .count();
    let market_saturation = if businesses_in_saturation_radius > 0 {
        competitors_in_saturation_radius as f64 / businesses_in_saturation_radius as f64
    } else {
        0.0
    };

    CompetitorAnalysis {
        competitor_count: competitors.len(),
        nearest_competitor: nearest.map(|c| c.business),
        distance_to_nearest: nearest.map_or(0.0, |c| c.distance),
        competitors_within_500m: within(r_500m),
        competitors_within_1km: within(r_1km),
        competitors_within_2km: within(r_2km),
        market_saturation,
        recommended_strategy: strategy(confidence, &config.confidence),
    }
}

/// Confidence from the share of the clustered records the winning cluster holds.
pub fn confidence(winning_members: usize, clustered: usize, tiers: &ConfidenceTiers) -> f64 {
    tiers.confidence(winning_members as f64 / clustered as f64)
}

pub fn opportunity(confidence: f64, tiers: &ConfidenceTiers) -> &'static str {
    if confidence >= tiers.excellent_at {
        EXCELLENT_OPPORTUNITY
    } else if confidence >= tiers.good_at {
        GOOD_OPPORTUNITY
    } else {
        CAUTION
    }
}

pub fn strategy(confidence: f64, tiers: &ConfidenceTiers) -> &'static str {
    if confidence >= tiers.excellent_at {
        STRATEGY_ENTER
    } else {
        STRATEGY_DIFFERENTIATE
    }
}
