use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::accounts::domain::UserId;
use crate::listings::domain::{ListingType, Property, PropertyId, PropertyStatus};

fn listed_at(offset_hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        - Duration::hours(offset_hours)
}

pub(crate) fn property(id: &str, price: u64, bedrooms: Option<u32>) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        title: format!("Listing {id}"),
        description: None,
        price,
        location: "Ikeja, Lagos".to_string(),
        address: None,
        bedrooms,
        bathrooms: None,
        area_sqm: Some(100),
        listing_type: ListingType::Rent,
        property_type: "Apartment".to_string(),
        status: PropertyStatus::Active,
        images: Vec::new(),
        features: BTreeSet::new(),
        owner_id: UserId("owner-1".to_string()),
        created_at: listed_at(0),
        updated_at: listed_at(0),
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    price: u64,
    location: &str,
    bedrooms: u32,
    bathrooms: u32,
    listing_type: ListingType,
    property_type: &str,
) -> Property {
    let age = id.parse::<i64>().unwrap_or_default();
    Property {
        title: title.to_string(),
        location: location.to_string(),
        bathrooms: Some(bathrooms),
        listing_type,
        property_type: property_type.to_string(),
        created_at: listed_at(age),
        updated_at: listed_at(age),
        ..property(id, price, Some(bedrooms))
    }
}

/// Six listings, newest first.
pub(crate) fn catalog() -> Vec<Property> {
    vec![
        listing(
            "1",
            "Luxury 3 Bedroom Apartment in Victoria Island",
            2_500_000,
            "Victoria Island, Lagos",
            3,
            2,
            ListingType::Rent,
            "Apartment",
        ),
        listing(
            "2",
            "Modern 4 Bedroom Duplex in Lekki",
            85_000_000,
            "Lekki Phase 1, Lagos",
            4,
            3,
            ListingType::Sale,
            "Duplex",
        ),
        listing(
            "3",
            "Executive 2 Bedroom Flat in Ikoyi",
            1_800_000,
            "Ikoyi, Lagos",
            2,
            2,
            ListingType::Rent,
            "Apartment",
        ),
        listing(
            "4",
            "Spacious 5 Bedroom House in Maitama",
            120_000_000,
            "Maitama, Abuja",
            5,
            4,
            ListingType::Sale,
            "House",
        ),
        listing(
            "5",
            "Affordable 1 Bedroom Apartment in Surulere",
            800_000,
            "Surulere, Lagos",
            1,
            1,
            ListingType::Rent,
            "Apartment",
        ),
        listing(
            "6",
            "Commercial Office Space in Central Business District",
            15_000_000,
            "CBD, Abuja",
            0,
            2,
            ListingType::Rent,
            "Office Space",
        ),
    ]
}
