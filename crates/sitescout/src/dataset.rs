use crate::types::BusinessRecord;
use std::collections::HashMap;

const UNKNOWN_STREET: &str = "unknown";

/// Trimmed, lower-cased form used for every label comparison.
#[inline]
pub fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

#[inline]
pub fn normalize_street(street: &str) -> String {
    let key = normalize(street);
    if key.is_empty() {
        UNKNOWN_STREET.to_owned()
    } else {
        key
    }
}

/// Records matching the requested category, or the whole dataset when none do.
#[derive(Debug)]
pub struct Filtered<'a> {
    pub points: Vec<&'a BusinessRecord>,
    pub fell_back: bool,
}

pub fn filter_by_category<'a>(businesses: &'a [BusinessRecord], category: &str) -> Filtered<'a> {
    let points = matching_category(businesses, category).collect::<Vec<_>>();
    if points.is_empty() {
        Filtered {
            points: businesses.iter().collect(),
            fell_back: true,
        }
    } else {
        Filtered {
            points,
            fell_back: false,
        }
    }
}

/// Records whose normalized category equals the normalized `category`. No fallback.
pub fn matching_category<'a>(
    businesses: &'a [BusinessRecord],
    category: &str,
) -> impl Iterator<Item = &'a BusinessRecord> + 'a {
    let wanted = normalize(category);
    businesses
        .iter()
        .filter(move |b| normalize(&b.category) == wanted)
}

/// Number of businesses per normalized street name, over the whole dataset.
#[derive(Debug, Default)]
pub struct StreetStats {
    counts: HashMap<String, usize>,
}

impl StreetStats {
    pub fn from_businesses(businesses: &[BusinessRecord]) -> Self {
        let mut counts = HashMap::new();
        for b in businesses {
            *counts.entry(normalize_street(&b.street)).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// How many businesses share this street; zero for streets never seen.
    pub fn popularity(&self, street: &str) -> usize {
        self.counts
            .get(&normalize_street(street))
            .copied()
            .unwrap_or(0)
    }

    /// max(`min_count`, floor(mean businesses per street)).
    pub fn major_road_threshold(&self, min_count: usize) -> usize {
        if self.counts.is_empty() {
            return min_count;
        }
        let total: usize = self.counts.values().sum();
        min_count.max(total / self.counts.len())
    }

    pub fn is_major_road(&self, street: &str, threshold: usize) -> bool {
        self.popularity(street) >= threshold
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
