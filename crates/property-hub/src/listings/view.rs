use serde::{Deserialize, Serialize};

use super::domain::Property;
use super::filter::{filter_properties, FilterCriteria};
use super::sort::{sort_properties, SortKey};

/// Query string accepted by the public listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
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
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub page: Option<usize>,
}

impl ListingQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            location: self.location.clone(),
            property_type: self.property_type.clone(),
            listing_type: self.listing_type.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            bedrooms: self.bedrooms.clone(),
            bathrooms: self.bathrooms.clone(),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.unwrap_or_default()
    }
}

/// One-based page window over a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: Option<usize>, per_page: usize) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.max(1),
        }
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Display list handed to the listing page, including the "load more" affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    pub properties: Vec<Property>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub has_more: bool,
    pub sort: SortKey,
    pub active_filters: usize,
}

impl ListingView {
    /// Filters, then sorts, then slices the requested page.
    pub fn compose(
        properties: &[Property],
        criteria: &FilterCriteria,
        sort: SortKey,
        pagination: Pagination,
    ) -> Self {
        let matching = filter_properties(properties, criteria);
        let ordered = sort_properties(&matching, sort);
        let total = ordered.len();

        let page: Vec<Property> = ordered
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page)
            .collect();
        let shown_through = pagination.offset().saturating_add(page.len());

        Self {
            properties: page,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            has_more: shown_through < total,
            sort,
            active_filters: criteria.active_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalog;

    #[test]
    fn composes_filter_sort_and_page() {
        let criteria = FilterCriteria {
            location: Some("lagos".to_string()),
            ..FilterCriteria::default()
        };

        let view = ListingView::compose(
            &catalog(),
            &criteria,
            SortKey::PriceLow,
            Pagination::new(Some(1), 3),
        );

        assert_eq!(view.total, 4);
        assert_eq!(view.active_filters, 1);
        assert!(view.has_more);
        let ids: Vec<_> = view.properties.iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["5", "3", "1"]);
    }

    #[test]
    fn last_page_has_no_more() {
        let view = ListingView::compose(
            &catalog(),
            &FilterCriteria::default(),
            SortKey::Newest,
            Pagination::new(Some(2), 4),
        );

        assert_eq!(view.properties.len(), 2);
        assert!(!view.has_more);
        assert_eq!(view.page, 2);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let view = ListingView::compose(
            &catalog(),
            &FilterCriteria::default(),
            SortKey::Newest,
            Pagination::new(Some(9), 4),
        );

        assert!(view.properties.is_empty());
        assert!(!view.has_more);
        assert_eq!(view.total, 6);
    }

    #[test]
    fn pagination_clamps_zero_values() {
        let pagination = Pagination::new(Some(0), 0);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, 1);
    }

    #[test]
    fn query_maps_to_criteria_and_default_sort() {
        let query = ListingQuery {
            location: Some("abuja".to_string()),
            bedrooms: Some("2".to_string()),
            ..ListingQuery::default()
        };

        let criteria = query.criteria();
        assert_eq!(criteria.location(), Some("abuja"));
        assert_eq!(criteria.min_bedrooms(), Some(2));
        assert_eq!(query.sort_key(), SortKey::Newest);
    }
}
