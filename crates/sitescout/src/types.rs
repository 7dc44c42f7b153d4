use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A geolocated business as supplied by the caller. The engine only reads these.
///
/// Field names on the wire follow the column names of the businesses table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(rename = "business_id")]
    pub id: i64,
    #[serde(rename = "business_name")]
    pub name: String,
    #[serde(rename = "general_category")]
    pub category: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zone_type: String,
    #[serde(rename = "zone_encoded", default)]
    pub zone_weight: i32,
    #[serde(default)]
    pub business_density_50m: u32,
    #[serde(default)]
    pub business_density_100m: u32,
    #[serde(default)]
    pub business_density_200m: u32,
    #[serde(default)]
    pub competitor_density_50m: u32,
    #[serde(default)]
    pub competitor_density_100m: u32,
    #[serde(default)]
    pub competitor_density_200m: u32,
    #[serde(default)]
    pub status: String,
}
