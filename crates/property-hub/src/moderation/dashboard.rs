use serde::{Deserialize, Serialize};

use crate::accounts::domain::{Profile, Role};
use crate::listings::domain::{ListingType, Property, PropertyStatus};

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_properties: usize,
    pub active: usize,
    pub pending: usize,
    pub rejected: usize,
    pub sold: usize,
    pub for_rent: usize,
    pub for_sale: usize,
    /// Sum of listed prices across every property, in Naira.
    pub total_value: u64,
    pub total_users: usize,
    pub admins: usize,
    pub agents: usize,
    pub regular_users: usize,
}

impl DashboardStats {
    pub fn compute(properties: &[Property], profiles: &[Profile]) -> Self {
        let mut stats = DashboardStats {
            total_properties: properties.len(),
            total_users: profiles.len(),
            ..DashboardStats::default()
        };

        for property in properties {
            match property.status {
                PropertyStatus::Active => stats.active += 1,
                PropertyStatus::Pending => stats.pending += 1,
                PropertyStatus::Rejected => stats.rejected += 1,
                PropertyStatus::Sold => stats.sold += 1,
            }
            match property.listing_type {
                ListingType::Rent => stats.for_rent += 1,
                ListingType::Sale => stats.for_sale += 1,
            }
            stats.total_value = stats.total_value.saturating_add(property.price);
        }

        for profile in profiles {
            match profile.role {
                Role::Admin => stats.admins += 1,
                Role::Agent => stats.agents += 1,
                Role::User => stats.regular_users += 1,
            }
        }

        stats
    }
}

/// Status selector on the admin property table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Active,
    Rejected,
    Sold,
}

impl StatusFilter {
    pub fn admits(self, status: PropertyStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == PropertyStatus::Pending,
            StatusFilter::Active => status == PropertyStatus::Active,
            StatusFilter::Rejected => status == PropertyStatus::Rejected,
            StatusFilter::Sold => status == PropertyStatus::Sold,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPropertyQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUserQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Title/location search combined with the status selector.
pub fn search_properties(properties: &[Property], query: &AdminPropertyQuery) -> Vec<Property> {
    let needle = needle(query.search.as_deref());
    let status = query.status.unwrap_or_default();

    properties
        .iter()
        .filter(|property| status.admits(property.status))
        .filter(|property| match &needle {
            Some(needle) => {
                property.title.to_lowercase().contains(needle)
                    || property.location.to_lowercase().contains(needle)
            }
            None => true,
        })
        .cloned()
        .collect()
}

pub fn search_profiles(profiles: &[Profile], search: Option<&str>) -> Vec<Profile> {
    let Some(needle) = needle(search) else {
        return profiles.to_vec();
    };

    profiles
        .iter()
        .filter(|profile| {
            profile
                .full_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

fn needle(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}
