use crate::geo::EARTH_RADIUS_KM;
use crate::types::GeoPoint;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ConfigError {
    #[snafu(display(
        "bounding box is inverted: lat [{min_lat}, {max_lat}], lng [{min_lng}, {max_lng}]"
    ))]
    InvertedBounds {
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    },

    #[snafu(display("at least one candidate cluster count is required"))]
    NoCandidates,

    #[snafu(display("candidate cluster counts must be positive and strictly ascending, got {ks:?}"))]
    UnorderedCandidates { ks: Vec<usize> },

    #[snafu(display("{name} must be at least 1"))]
    ZeroIterations { name: &'static str },

    #[snafu(display("{name} must be a finite positive number, got {value}"))]
    NotPositive { name: &'static str, value: f64 },

    #[snafu(display("{name} must be a finite non-negative number, got {value}"))]
    Negative { name: &'static str, value: f64 },
}

/// Geographic box the recommendation is confined to.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Default for BoundingBox {
    // Barangay limits the engine was tuned for
    fn default() -> Self {
        Self {
            min_lat: 14.8338,
            max_lat: 14.8413,
            min_lng: 120.9518,
            max_lng: 120.9608,
        }
    }
}

impl BoundingBox {
    /// Inclusive on all four edges.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.latitude >= self.min_lat
            && p.latitude <= self.max_lat
            && p.longitude >= self.min_lng
            && p.longitude <= self.max_lng
    }

    /// Component-wise clamp. Requires a validated (non-inverted) box.
    #[inline]
    pub fn clamp(&self, p: GeoPoint) -> GeoPoint {
        GeoPoint {
            latitude: p.latitude.max(self.min_lat).min(self.max_lat),
            longitude: p.longitude.max(self.min_lng).min(self.max_lng),
        }
    }
}

/// Coefficients of the per-business traffic score.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreWeights {
    pub density_50m: f64,
    pub density_100m: f64,
    pub density_200m: f64,
    pub competitor_50m: f64,
    pub competitor_100m: f64,
    pub competitor_200m: f64,
    pub zone: f64,
    pub street_popularity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            density_50m: 0.3,
            density_100m: 0.2,
            density_200m: 0.1,
            competitor_50m: 0.25,
            competitor_100m: 0.1,
            competitor_200m: 0.05,
            zone: 0.1,
            street_popularity: 0.15,
        }
    }
}

/// Maps the winning cluster's share of the dataset to a confidence level.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfidenceTiers {
    pub high_share: f64,
    pub high: f64,
    pub medium_share: f64,
    pub medium: f64,
    pub low: f64,
    /// Confidence at or above which the opportunity is rated excellent
    pub excellent_at: f64,
    /// Confidence at or above which the opportunity is rated good
    pub good_at: f64,
}

impl Default for ConfidenceTiers {
    fn default() -> Self {
        Self {
            high_share: 0.45,
            high: 0.82,
            medium_share: 0.25,
            medium: 0.68,
            low: 0.55,
            excellent_at: 0.8,
            good_at: 0.6,
        }
    }
}

impl ConfidenceTiers {
    pub fn confidence(&self, share: f64) -> f64 {
        if share >= self.high_share {
            self.high
        } else if share >= self.medium_share {
            self.medium
        } else {
            self.low
        }
    }
}

/// Every tunable of the engine. Defaults reproduce the production behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusteringConfig {
    pub bounds: BoundingBox,
    pub earth_radius_km: f64,
    /// Cluster counts tried by the elbow scan, ascending
    pub k_candidates: Vec<usize>,
    /// An inertia drop below this fraction of the first drop marks the elbow
    pub elbow_ratio: f64,
    pub trial_max_iterations: usize,
    pub final_max_iterations: usize,
    pub weights: ScoreWeights,
    /// Mean cluster score under which the runner-up cluster is preferred
    pub low_traffic_floor: f64,
    pub major_road_min_count: usize,
    pub snap_distance_km: f64,
    pub competitor_radii_km: [f64; 3],
    pub saturation_radius_km: f64,
    pub nearby_count: usize,
    pub confidence: ConfidenceTiers,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::default(),
            earth_radius_km: EARTH_RADIUS_KM,
            k_candidates: vec![2, 3, 4, 5, 6],
            elbow_ratio: 0.25,
            trial_max_iterations: 25,
            final_max_iterations: 40,
            weights: ScoreWeights::default(),
            low_traffic_floor: 1.0,
            major_road_min_count: 3,
            snap_distance_km: 0.3,
            competitor_radii_km: [0.5, 1.0, 2.0],
            saturation_radius_km: 1.0,
            nearby_count: 10,
            confidence: ConfidenceTiers::default(),
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let BoundingBox {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        } = self.bounds;
        ensure!(
            min_lat <= max_lat && min_lng <= max_lng,
            InvertedBoundsSnafu {
                min_lat,
                max_lat,
                min_lng,
                max_lng
            }
        );

        ensure!(!self.k_candidates.is_empty(), NoCandidatesSnafu);
        ensure!(
            self.k_candidates[0] > 0 && self.k_candidates.windows(2).all(|w| w[0] < w[1]),
            UnorderedCandidatesSnafu {
                ks: self.k_candidates.clone()
            }
        );

        ensure!(
            self.trial_max_iterations > 0,
            ZeroIterationsSnafu {
                name: "trial_max_iterations"
            }
        );
        ensure!(
            self.final_max_iterations > 0,
            ZeroIterationsSnafu {
                name: "final_max_iterations"
            }
        );

        ensure!(
            self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0,
            NotPositiveSnafu {
                name: "earth_radius_km",
                value: self.earth_radius_km
            }
        );

        let non_negative = [
            ("snap_distance_km", self.snap_distance_km),
            ("saturation_radius_km", self.saturation_radius_km),
            ("competitor_radii_km[0]", self.competitor_radii_km[0]),
            ("competitor_radii_km[1]", self.competitor_radii_km[1]),
            ("competitor_radii_km[2]", self.competitor_radii_km[2]),
        ];
        for (name, value) in non_negative {
            ensure!(value.is_finite() && value >= 0.0, NegativeSnafu { name, value });
        }

        Ok(())
    }
}
