use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::Property;

/// Orderings offered by the listing page's sort selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    Bedrooms,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Bedrooms,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Bedrooms => "bedrooms",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Bedrooms => "Most Bedrooms",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| UnknownSortKey(value.to_string()))
    }
}

/// Returns a reordered copy. Input is assumed newest-first; ties keep their relative order.
pub fn sort_properties(properties: &[Property], key: SortKey) -> Vec<Property> {
    let mut sorted = properties.to_vec();
    match key {
        SortKey::Newest => {}
        SortKey::Oldest => sorted.reverse(),
        SortKey::PriceLow => sorted.sort_by_key(|property| property.price),
        SortKey::PriceHigh => sorted.sort_by_key(|property| Reverse(property.price)),
        SortKey::Bedrooms => sorted.sort_by_key(|property| Reverse(property.bedroom_count())),
    }
    sorted
}
