use crate::types::{BusinessRecord, GeoPoint};
use serde::Serialize;

pub mod elbow;
pub mod lloyds;
pub mod plus_plus_init;

// References:
// - k-means++: The Advantages of Careful Seeding (D. Arthur, S. Vassilvitskii)
//   https://theory.stanford.edu/~sergei/papers/kMeansPP-soda.pdf
// - https://scikit-learn.org/stable/modules/generated/sklearn.cluster.KMeans.html
//
// Distances are great-circle kilometers throughout, so centroids are plain
// lat/lng means. Good enough at the scale of a single district.

pub const CLUSTER_COLORS: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#F97316", "#84CC16",
];

/// A point assigned to a cluster, borrowing the record it came from.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct ClusterMember<'a> {
    #[serde(flatten)]
    pub location: GeoPoint,
    pub business: &'a BusinessRecord,
}

impl<'a> From<&'a BusinessRecord> for ClusterMember<'a> {
    fn from(business: &'a BusinessRecord) -> Self {
        Self {
            location: business.location,
            business,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster<'a> {
    pub id: usize,
    pub color: &'static str,
    /// The centroid members were assigned against
    pub centroid: GeoPoint,
    pub members: Vec<ClusterMember<'a>>,
    /// Set when the cluster came out of assignment empty and got a random record
    pub repaired: bool,
}

impl<'a> Cluster<'a> {
    pub fn new(id: usize, centroid: GeoPoint) -> Self {
        Self {
            id,
            color: CLUSTER_COLORS[id % CLUSTER_COLORS.len()],
            centroid,
            members: Vec::new(),
            repaired: false,
        }
    }

    pub fn member_locations(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.members.iter().map(|m| m.location)
    }
}
