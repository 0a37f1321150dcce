use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{ListingType, Property, PropertyId, PropertyStatus};
use crate::accounts::domain::{non_blank, Role, UserId};

/// Default cap on images attached to a single submission.
pub const DEFAULT_MAX_IMAGES: usize = 10;

/// Listing form payload as submitted by a user, agent, or administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: u64,
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub area_sqm: Option<u32>,
    pub listing_type: String,
    pub property_type: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("listing type must be 'rent' or 'sale', got '{0}'")]
    InvalidListingType(String),
    #[error("price must be greater than zero")]
    InvalidPrice,
    #[error("area must be a positive number of square meters")]
    InvalidArea,
    #[error("at most {limit} images may be attached, got {submitted}")]
    TooManyImages { limit: usize, submitted: usize },
    #[error("image reference '{0}' is not an uploaded URL")]
    InvalidImage(String),
}

/// Validates drafts and assigns the initial moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    pub max_images: usize,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            max_images: DEFAULT_MAX_IMAGES,
        }
    }
}

impl SubmissionPolicy {
    pub fn new(max_images: usize) -> Self {
        Self { max_images }
    }

    /// Builds the record to store. Administrators publish directly; everyone else waits for
    /// review.
    pub fn prepare(
        &self,
        draft: PropertyDraft,
        owner: &UserId,
        role: Role,
    ) -> Result<Property, SubmissionError> {
        let title = required(draft.title, "title")?;
        let location = required(draft.location, "location")?;
        let property_type = required(draft.property_type, "property type")?;
        let listing_type = draft
            .listing_type
            .parse::<ListingType>()
            .map_err(|_| SubmissionError::InvalidListingType(draft.listing_type.clone()))?;

        if draft.price == 0 {
            return Err(SubmissionError::InvalidPrice);
        }
        if draft.area_sqm == Some(0) {
            return Err(SubmissionError::InvalidArea);
        }

        if draft.images.len() > self.max_images {
            return Err(SubmissionError::TooManyImages {
                limit: self.max_images,
                submitted: draft.images.len(),
            });
        }
        let images = draft
            .images
            .into_iter()
            .map(|image| {
                let trimmed = image.trim();
                if is_uploaded_url(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(SubmissionError::InvalidImage(image))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let features: BTreeSet<String> = draft.features.into_iter().filter_map(non_blank).collect();

        let status = match role {
            Role::Admin => PropertyStatus::Active,
            Role::Agent | Role::User => PropertyStatus::Pending,
        };

        let now = Utc::now();
        Ok(Property {
            id: PropertyId::generate(),
            title,
            description: draft.description.and_then(non_blank),
            price: draft.price,
            location,
            address: draft.address.and_then(non_blank),
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            area_sqm: draft.area_sqm,
            listing_type,
            property_type,
            status,
            images,
            features,
            owner_id: owner.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, SubmissionError> {
    non_blank(value).ok_or(SubmissionError::MissingField(field))
}

fn is_uploaded_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://") || value.starts_with('/')
}
