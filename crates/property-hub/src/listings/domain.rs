use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::domain::UserId;

/// Identifier wrapper for listed properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub const fn label(self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rent" => Ok(ListingType::Rent),
            "sale" => Ok(ListingType::Sale),
            other => Err(format!("unknown listing type '{other}'")),
        }
    }
}

/// Moderation status of a listing. Only administrators move a listing between states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Pending,
    Active,
    Rejected,
    Sold,
}

impl PropertyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyStatus::Pending => "pending",
            PropertyStatus::Active => "active",
            PropertyStatus::Rejected => "rejected",
            PropertyStatus::Sold => "sold",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Ok(PropertyStatus::Pending),
            "active" => Ok(PropertyStatus::Active),
            "rejected" => Ok(PropertyStatus::Rejected),
            "sold" => Ok(PropertyStatus::Sold),
            other => Err(format!("unknown property status '{other}'")),
        }
    }
}

/// A listed property. Prices are whole Naira.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: u64,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area_sqm: Option<u32>,
    pub listing_type: ListingType,
    pub property_type: String,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: BTreeSet<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn bedroom_count(&self) -> u32 {
        self.bedrooms.unwrap_or(0)
    }

    pub fn bathroom_count(&self) -> u32 {
        self.bathrooms.unwrap_or(0)
    }

    pub fn is_active(&self) -> bool {
        self.status == PropertyStatus::Active
    }
}
