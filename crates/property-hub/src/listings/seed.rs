use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{ListingType, Property, PropertyId, PropertyStatus};
use crate::accounts::domain::UserId;

#[derive(Debug, thiserror::Error)]
pub enum SeedImportError {
    #[error("failed to read seed catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("seed catalog line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

/// Loads a listing catalog from CSV.
///
/// Columns: `title, description, price, location, address, bedrooms, bathrooms, area_sqm,
/// listing_type, property_type, status, features, images, owner_id, created_at`. Features and
/// images are `;`-separated. Rows without `created_at` are stamped one hour apart, so file order
/// is newest-first order.
pub struct SeedImporter;

impl SeedImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Property>, SeedImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Property>, SeedImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let imported_at = Utc::now();
        let mut properties = Vec::new();

        for (index, record) in csv_reader.deserialize::<SeedRow>().enumerate() {
            let row = record?;
            let line = index + 2;
            let fallback = imported_at - Duration::hours(index as i64);
            let property = row
                .into_property(fallback)
                .map_err(|reason| SeedImportError::InvalidRow { line, reason })?;
            properties.push(property);
        }

        properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(properties)
    }
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    price: String,
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bedrooms: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bathrooms: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    area_sqm: Option<String>,
    listing_type: String,
    property_type: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    features: String,
    #[serde(default)]
    images: String,
    owner_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
}

impl SeedRow {
    fn into_property(self, fallback: DateTime<Utc>) -> Result<Property, String> {
        if self.title.is_empty() {
            return Err("title is required".to_string());
        }
        if self.owner_id.is_empty() {
            return Err("owner_id is required".to_string());
        }

        let price = self
            .price
            .replace(',', "")
            .parse::<u64>()
            .map_err(|_| format!("price '{}' is not a whole number", self.price))?;
        let listing_type = self.listing_type.parse::<ListingType>()?;
        let status = self.status.parse::<PropertyStatus>()?;
        let created_at = match self.created_at.as_deref() {
            Some(value) => parse_timestamp(value)
                .ok_or_else(|| format!("created_at '{value}' is not a date"))?,
            None => fallback,
        };

        Ok(Property {
            id: PropertyId::generate(),
            title: self.title,
            description: self.description,
            price,
            location: self.location,
            address: self.address,
            bedrooms: count(self.bedrooms.as_deref(), "bedrooms")?,
            bathrooms: count(self.bathrooms.as_deref(), "bathrooms")?,
            area_sqm: count(self.area_sqm.as_deref(), "area_sqm")?,
            listing_type,
            property_type: self.property_type,
            status,
            images: split_list(&self.images).collect(),
            features: split_list(&self.features).collect::<BTreeSet<_>>(),
            owner_id: UserId(self.owner_id),
            created_at,
            updated_at: created_at,
        })
    }
}

fn count(value: Option<&str>, column: &str) -> Result<Option<u32>, String> {
    value
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| format!("{column} '{raw}' is not a whole number"))
        })
        .transpose()
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "title,description,price,location,address,bedrooms,bathrooms,area_sqm,listing_type,property_type,status,features,images,owner_id,created_at\n";

    #[test]
    fn imports_rows_newest_first() {
        let csv = format!(
            "{HEADER}\
Older flat,,1800000,\"Ikoyi, Lagos\",,2,2,95,rent,Apartment,active,Parking; Security ;,,agent-1,2025-05-01\n\
Newer duplex,Gated estate,\"85,000,000\",\"Lekki, Lagos\",,4,3,,sale,Duplex,pending,,https://cdn.example.com/d.jpg,agent-2,2025-06-01T08:00:00Z\n"
        );

        let properties = SeedImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].title, "Newer duplex");
        assert_eq!(properties[0].price, 85_000_000);
        assert_eq!(properties[0].status, PropertyStatus::Pending);
        assert_eq!(properties[0].area_sqm, None);
        assert_eq!(properties[0].images.len(), 1);
        assert_eq!(properties[1].listing_type, ListingType::Rent);
        assert_eq!(
            properties[1].features.iter().cloned().collect::<Vec<_>>(),
            vec!["Parking".to_string(), "Security".to_string()]
        );
    }

    #[test]
    fn missing_timestamps_keep_file_order() {
        let csv = format!(
            "{HEADER}\
First,,100,Yaba,,,,,rent,Room,,,,agent-1,\n\
Second,,200,Yaba,,,,,rent,Room,,,,agent-1,\n"
        );

        let properties = SeedImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(properties[0].title, "First");
        assert_eq!(properties[0].status, PropertyStatus::Pending);
        assert!(properties[0].created_at > properties[1].created_at);
    }

    #[test]
    fn invalid_values_report_their_line() {
        let csv = format!(
            "{HEADER}\
Fine,,100,Yaba,,,,,rent,Room,,,,agent-1,\n\
Broken,,100,Yaba,,,,,lease,Room,,,,agent-1,\n"
        );

        match SeedImporter::from_reader(Cursor::new(csv)) {
            Err(SeedImportError::InvalidRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("lease"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = SeedImporter::from_path("./does-not-exist.csv").expect_err("expected io error");
        assert!(matches!(error, SeedImportError::Io(_)));
    }

    #[test]
    fn import_errors_describe_their_cause() {
        let row = SeedImportError::InvalidRow {
            line: 7,
            reason: "unknown listing type 'lease'".to_string(),
        };
        assert_eq!(
            row.to_string(),
            "seed catalog line 7: unknown listing type 'lease'"
        );
        assert!(std::error::Error::source(&row).is_none());

        let io = SeedImporter::from_path("./does-not-exist.csv").expect_err("expected io error");
        assert!(io.to_string().starts_with("failed to read seed catalog:"));
        assert!(std::error::Error::source(&io).is_some());
    }
}
