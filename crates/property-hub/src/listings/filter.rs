use serde::{Deserialize, Serialize};

use super::domain::Property;

/// Search form values exactly as submitted. Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<String>,
    #[serde(default)]
    pub bathrooms: Option<String>,
}

impl FilterCriteria {
    pub fn location(&self) -> Option<&str> {
        text(&self.location)
    }

    pub fn property_type(&self) -> Option<&str> {
        text(&self.property_type)
    }

    pub fn listing_type(&self) -> Option<&str> {
        text(&self.listing_type)
    }

    /// Lower price bound; non-numeric input counts as unset.
    pub fn min_price(&self) -> Option<u64> {
        number(&self.min_price)
    }

    pub fn max_price(&self) -> Option<u64> {
        number(&self.max_price)
    }

    pub fn min_bedrooms(&self) -> Option<u64> {
        number(&self.bedrooms)
    }

    pub fn min_bathrooms(&self) -> Option<u64> {
        number(&self.bathrooms)
    }

    /// Number of fields holding a value, the figure shown on the filter badge.
    pub fn active_count(&self) -> usize {
        [
            &self.location,
            &self.property_type,
            &self.listing_type,
            &self.min_price,
            &self.max_price,
            &self.bedrooms,
            &self.bathrooms,
        ]
        .into_iter()
        .filter(|value| text(value).is_some())
        .count()
    }

    /// True when no field constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.location().is_none()
            && self.property_type().is_none()
            && self.listing_type().is_none()
            && self.min_price().is_none()
            && self.max_price().is_none()
            && self.min_bedrooms().is_none()
            && self.min_bathrooms().is_none()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(location) = self.location() {
            if !property
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if let Some(kind) = self.property_type() {
            if property.property_type.trim().to_lowercase() != kind.to_lowercase() {
                return false;
            }
        }

        if let Some(kind) = self.listing_type() {
            if !property.listing_type.label().eq_ignore_ascii_case(kind) {
                return false;
            }
        }

        if let Some(min) = self.min_price() {
            if property.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price() {
            if property.price > max {
                return false;
            }
        }

        if let Some(min) = self.min_bedrooms() {
            if u64::from(property.bedroom_count()) < min {
                return false;
            }
        }

        if let Some(min) = self.min_bathrooms() {
            if u64::from(property.bathroom_count()) < min {
                return false;
            }
        }

        true
    }
}

/// Keeps the properties satisfying every set criterion, in their original order.
pub fn filter_properties(properties: &[Property], criteria: &FilterCriteria) -> Vec<Property> {
    if criteria.is_unconstrained() {
        return properties.to_vec();
    }

    properties
        .iter()
        .filter(|property| criteria.matches(property))
        .cloned()
        .collect()
}

fn text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn number(value: &Option<String>) -> Option<u64> {
    text(value).and_then(|value| value.parse::<u64>().ok())
}
