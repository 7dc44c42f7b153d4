use crate::config::ScoreWeights;
use crate::dataset::StreetStats;
use crate::kmeans::Cluster;
use crate::types::BusinessRecord;
use serde::Serialize;

/// Foot-traffic estimate for one business: nearby businesses and zoning push
/// it up, nearby competitors pull it down, busy streets add to it.
pub fn traffic_score(b: &BusinessRecord, streets: &StreetStats, w: &ScoreWeights) -> f64 {
    let street_popularity = streets.popularity(&b.street) as f64;

    w.density_50m * b.business_density_50m as f64
        + w.density_100m * b.business_density_100m as f64
        + w.density_200m * b.business_density_200m as f64
        - w.competitor_50m * b.competitor_density_50m as f64
        - w.competitor_100m * b.competitor_density_100m as f64
        - w.competitor_200m * b.competitor_density_200m as f64
        + w.zone * b.zone_weight as f64
        + w.street_popularity * street_popularity
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterScore {
    pub cluster_id: usize,
    pub score: f64,
    pub members: usize,
}

/// Mean traffic score of the cluster's members (repaired members included).
pub fn cluster_score(cluster: &Cluster, streets: &StreetStats, w: &ScoreWeights) -> f64 {
    let total: f64 = cluster
        .members
        .iter()
        .map(|m| traffic_score(m.business, streets, w))
        .sum();
    total / cluster.members.len() as f64
}

/// Scores of all clusters, best first. Equal scores keep cluster order.
pub fn rank_clusters(clusters: &[Cluster], streets: &StreetStats, w: &ScoreWeights) -> Vec<ClusterScore> {
    let mut scores = clusters
        .iter()
        .map(|cluster| ClusterScore {
            cluster_id: cluster.id,
            score: cluster_score(cluster, streets, w),
            members: cluster.members.len(),
        })
        .collect::<Vec<_>>();

    // Sort by score descending
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

/// Picks the top-ranked cluster, unless its score is under `low_traffic_floor`
/// and there is a runner-up to fall back to. `ranked` must not be empty.
pub fn select_cluster(ranked: &[ClusterScore], low_traffic_floor: f64) -> ClusterScore {
    let best = ranked[0];
    if best.score < low_traffic_floor && ranked.len() > 1 {
        ranked[1]
    } else {
        best
    }
}

/// Inputs of [`opportunity_score`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OpportunityMetrics {
    pub competitor_count: f64,
    pub business_density_50m: f64,
    pub business_density_100m: f64,
    pub business_density_200m: f64,
    pub cluster_strength: f64,
}

/// Normalized 0..1 opportunity rating, rounded to three decimals.
///
/// Competition weighs most (five or more competitors zero that term out),
/// then surrounding business density (saturating at 20), then the size of the
/// winning cluster (saturating at 5 members).
pub fn opportunity_score(m: &OpportunityMetrics) -> f64 {
    let competition = (1.0 - m.competitor_count / 5.0).clamp(0.0, 1.0);

    let density_raw = m.business_density_50m * 0.5
        + m.business_density_100m * 0.3
        + m.business_density_200m * 0.2;
    let density = (density_raw / 20.0).min(1.0);

    let cluster = (m.cluster_strength / 5.0).min(1.0);

    let score = competition * 0.45 + density * 0.30 + cluster * 0.25;
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::business;
    use crate::kmeans::ClusterMember;
    use crate::types::GeoPoint;
    use pretty_assertions::assert_eq;

    fn scored(cluster_id: usize, score: f64) -> ClusterScore {
        ClusterScore {
            cluster_id,
            score,
            members: 1,
        }
    }

    #[test]
    fn traffic_score_weights() {
        let mut b = business(1, "Retail", "Main St", 0.0, 0.0);
        b.business_density_50m = 10;
        b.business_density_100m = 10;
        b.business_density_200m = 10;
        b.competitor_density_50m = 4;
        b.competitor_density_100m = 10;
        b.competitor_density_200m = 20;
        b.zone_weight = 2;

        let others = vec![
            b.clone(),
            business(2, "Retail", "main st", 0.0, 0.0),
            business(3, "Retail", "Side St", 0.0, 0.0),
        ];
        let streets = StreetStats::from_businesses(&others);

        // 3 + 2 + 1 - 1 - 1 - 1 + 0.2 + 0.3
        let score = traffic_score(&b, &streets, &ScoreWeights::default());
        assert!((score - 3.5).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn unknown_street_contributes_nothing() {
        let b = business(1, "Retail", "Ghost Rd", 0.0, 0.0);
        let streets = StreetStats::default();
        let score = traffic_score(&b, &streets, &ScoreWeights::default());
        // Only the zone weight of 1
        assert!((score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn cluster_score_is_the_member_mean() {
        let mut a = business(1, "Retail", "A", 0.0, 0.0);
        a.business_density_50m = 10;
        let mut b = business(2, "Retail", "B", 0.0, 0.0);
        b.business_density_50m = 20;
        let data = [a, b];
        let streets = StreetStats::default();

        let mut cluster = Cluster::new(0, GeoPoint::new(0.0, 0.0));
        cluster.members = data.iter().map(ClusterMember::from).collect();

        // (3.1 + 6.1) / 2
        let score = cluster_score(&cluster, &streets, &ScoreWeights::default());
        assert!((score - 4.6).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mut low = business(1, "Retail", "A", 0.0, 0.0);
        low.zone_weight = 0;
        let mut high = business(2, "Retail", "A", 0.0, 0.0);
        high.business_density_50m = 10;
        let data = [low, high.clone(), high];
        let streets = StreetStats::default();

        let clusters = data
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let mut c = Cluster::new(i, b.location);
                c.members.push(ClusterMember::from(b));
                c
            })
            .collect::<Vec<_>>();

        let ranked = rank_clusters(&clusters, &streets, &ScoreWeights::default());
        let ids = ranked.iter().map(|s| s.cluster_id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn select_best_when_above_floor() {
        let ranked = [scored(3, 5.0), scored(1, 2.0)];
        assert_eq!(select_cluster(&ranked, 1.0), ranked[0]);
    }

    #[test]
    fn select_runner_up_when_best_is_quiet() {
        let ranked = [scored(3, 0.9), scored(1, 0.2)];
        assert_eq!(select_cluster(&ranked, 1.0), ranked[1]);
    }

    #[test]
    fn lone_cluster_is_kept_even_when_quiet() {
        let ranked = [scored(0, 0.1)];
        assert_eq!(select_cluster(&ranked, 1.0), ranked[0]);
    }

    #[test]
    fn opportunity_score_bounds() {
        let best = OpportunityMetrics {
            competitor_count: 0.0,
            business_density_50m: 100.0,
            business_density_100m: 100.0,
            business_density_200m: 100.0,
            cluster_strength: 50.0,
        };
        assert_eq!(opportunity_score(&best), 1.0);

        let worst = OpportunityMetrics {
            competitor_count: 12.0,
            ..OpportunityMetrics::default()
        };
        assert_eq!(opportunity_score(&worst), 0.0);
    }

    #[test]
    fn opportunity_score_mixed() {
        let m = OpportunityMetrics {
            competitor_count: 2.0,
            business_density_50m: 10.0,
            business_density_100m: 10.0,
            business_density_200m: 10.0,
            cluster_strength: 2.0,
        };
        // 0.6 * 0.45 + 0.5 * 0.30 + 0.4 * 0.25 = 0.52
        assert_eq!(opportunity_score(&m), 0.52);
    }
}
