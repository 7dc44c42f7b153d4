use crate::config::ClusteringConfig;
use crate::dataset::StreetStats;
use crate::geo::haversine;
use crate::types::{BusinessRecord, GeoPoint};
use tracing::debug;

const UNKNOWN_ZONE: &str = "Unknown";

/// The closest business to `from`, with its distance in km. Ties keep the
/// earlier record.
pub fn nearest_business<'a>(
    from: GeoPoint,
    businesses: impl IntoIterator<Item = &'a BusinessRecord>,
    earth_radius_km: f64,
) -> Option<(&'a BusinessRecord, f64)> {
    businesses
        .into_iter()
        .map(|b| (b, haversine(from, b.location, earth_radius_km)))
        .fold(None, |best, (b, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((b, d)),
        })
}

/// The nearest business on a major road inside the bounding box, if it is
/// strictly closer than the snap distance. Records without a street never
/// qualify, even though they are counted under "unknown".
pub fn major_road_anchor<'a>(
    centroid: GeoPoint,
    businesses: &'a [BusinessRecord],
    streets: &StreetStats,
    config: &ClusteringConfig,
) -> Option<&'a BusinessRecord> {
    let threshold = streets.major_road_threshold(config.major_road_min_count);

    let candidates = businesses
        .iter()
        .filter(|b| !b.street.trim().is_empty())
        .filter(|b| streets.is_major_road(&b.street, threshold))
        .filter(|b| config.bounds.contains(b.location));

    let (anchor, distance) = nearest_business(centroid, candidates, config.earth_radius_km)?;
    debug!(
        threshold,
        anchor = anchor.id,
        distance_km = distance,
        "nearest major-road business"
    );

    (distance < config.snap_distance_km).then_some(anchor)
}

#[derive(Debug, Clone)]
pub struct Refined<'a> {
    pub location: GeoPoint,
    pub snapped_to: Option<&'a BusinessRecord>,
    pub zone_type: String,
}

/// Turns a cluster centroid into the final recommendation: snap to a nearby
/// major-road business, clamp into the bounding box, and read the zone off
/// the closest business.
pub fn refine<'a>(
    centroid: GeoPoint,
    businesses: &'a [BusinessRecord],
    streets: &StreetStats,
    config: &ClusteringConfig,
) -> Refined<'a> {
    let snapped_to = major_road_anchor(centroid, businesses, streets, config);
    let location = config
        .bounds
        .clamp(snapped_to.map_or(centroid, |b| b.location));

    let zone_type = nearest_business(location, businesses, config.earth_radius_km)
        .map(|(b, _)| b.zone_type.clone())
        .unwrap_or_else(|| UNKNOWN_ZONE.to_owned());

    Refined {
        location,
        snapped_to,
        zone_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::business;
    use crate::geo::EARTH_RADIUS_KM;
    use pretty_assertions::assert_eq;

    // Inside the default bounding box
    const CENTER: GeoPoint = GeoPoint::new(14.8370, 120.9560);

    /// 10 records on Rizal Ave spread along the box, one each on two side streets.
    fn dominant_street() -> Vec<BusinessRecord> {
        let mut data = (0..10)
            .map(|i| {
                business(
                    i,
                    "Retail",
                    "Rizal Ave",
                    14.8345 + i as f64 * 0.0006,
                    120.9540,
                )
            })
            .collect::<Vec<_>>();
        data.push(business(10, "Retail", "Luna St", 14.8371, 120.9561));
        data.push(business(11, "Retail", "Mabini St", 14.8400, 120.9600));
        data
    }

    #[test]
    fn nearest_keeps_first_on_ties() {
        let data = vec![
            business(1, "Retail", "A", 14.0, 121.0),
            business(2, "Retail", "A", 14.0, 121.0),
        ];
        let (b, d) = nearest_business(GeoPoint::new(14.0, 121.0), &data, EARTH_RADIUS_KM).unwrap();
        assert_eq!(b.id, 1);
        assert_eq!(d, 0.0);
        assert!(nearest_business(CENTER, &[], EARTH_RADIUS_KM).is_none());
    }

    #[test]
    fn snaps_to_the_dominant_street() {
        let data = dominant_street();
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig::default();

        // Luna St is closer, but it isn't a major road
        let refined = refine(CENTER, &data, &streets, &config);
        let anchor = refined.snapped_to.expect("should snap");
        assert_eq!(anchor.street, "Rizal Ave");
        assert_eq!(refined.location, anchor.location);
    }

    #[test]
    fn snapped_location_is_an_exact_record_coordinate() {
        let data = dominant_street();
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig::default();

        for step in 0..10 {
            let centroid = GeoPoint::new(14.8345 + step as f64 * 0.0006, 120.9545);
            let refined = refine(centroid, &data, &streets, &config);
            assert!(
                data[..10].iter().any(|b| b.location == refined.location),
                "step {step}: {:?} is not on Rizal Ave",
                refined.location
            );
        }
    }

    #[test]
    fn no_snap_when_too_far() {
        let data = dominant_street();
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig {
            snap_distance_km: 0.05,
            ..ClusteringConfig::default()
        };

        // ~0.2 km east of Rizal Ave
        let refined = refine(CENTER, &data, &streets, &config);
        assert!(refined.snapped_to.is_none());
        assert_eq!(refined.location, CENTER);
    }

    #[test]
    fn major_road_outside_the_box_is_ignored() {
        let mut data = dominant_street();
        for b in data.iter_mut().take(10) {
            b.location.latitude += 1.0;
        }
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig::default();

        assert!(major_road_anchor(CENTER, &data, &streets, &config).is_none());
    }

    #[test]
    fn blank_streets_are_never_anchors() {
        // "unknown" holds 5 of 7 records and clears the threshold of 3
        let mut data = (1..=5)
            .map(|i| business(i, "Retail", "  ", 14.8371, 120.9560 + i as f64 * 0.0001))
            .collect::<Vec<_>>();
        data.push(business(6, "Retail", "Rizal Ave", 14.8370, 120.9540));
        data.push(business(7, "Retail", "Rizal Ave", 14.8372, 120.9541));
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig::default();

        assert!(streets.is_major_road("", streets.major_road_threshold(3)));
        assert!(major_road_anchor(GeoPoint::new(14.8371, 120.9560), &data, &streets, &config).is_none());

        let refined = refine(GeoPoint::new(14.8371, 120.9560), &data, &streets, &config);
        assert!(refined.snapped_to.is_none());
        assert_eq!(refined.location, GeoPoint::new(14.8371, 120.9560));
    }

    #[test]
    fn clamps_into_the_box() {
        let data = vec![business(1, "Retail", "A", 14.0, 121.5)];
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig::default();

        let refined = refine(GeoPoint::new(14.0, 121.5), &data, &streets, &config);
        assert!(config.bounds.contains(refined.location));
        assert_eq!(
            refined.location,
            GeoPoint::new(config.bounds.min_lat, config.bounds.max_lng)
        );
    }

    #[test]
    fn zone_comes_from_the_nearest_business() {
        let mut data = dominant_street();
        data[10].zone_type = "Residential".to_owned();
        let streets = StreetStats::from_businesses(&data);
        let config = ClusteringConfig {
            snap_distance_km: 0.0,
            ..ClusteringConfig::default()
        };

        let refined = refine(CENTER, &data, &streets, &config);
        assert_eq!(refined.zone_type, "Residential");
    }
}
