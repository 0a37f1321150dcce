use property_hub::listings::{
    ListingQuery, ListingType, ListingView, Pagination, PropertyStatus, SeedImportError,
    SeedImporter, SortKey,
};

#[test]
fn importer_reads_bundled_seed_catalog() {
    let data = include_bytes!("../../../data/seed_properties.csv");

    let properties = SeedImporter::from_reader(&data[..]).expect("seed catalog imports");

    assert_eq!(properties.len(), 6);
    assert!(properties
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
    assert_eq!(
        properties[0].title,
        "Luxury 3 Bedroom Apartment in Victoria Island"
    );
    assert!(properties[0].features.contains("Swimming Pool"));
    assert_eq!(properties[0].images.len(), 2);

    let pending: Vec<_> = properties
        .iter()
        .filter(|property| property.status == PropertyStatus::Pending)
        .collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].location, "CBD, Abuja");
}

#[test]
fn seeded_catalog_feeds_the_listing_view() {
    let data = include_bytes!("../../../data/seed_properties.csv");
    let properties = SeedImporter::from_reader(&data[..]).expect("seed catalog imports");
    let query = ListingQuery {
        listing_type: Some("rent".to_string()),
        ..ListingQuery::default()
    };

    let view = ListingView::compose(
        &properties,
        &query.criteria(),
        SortKey::PriceHigh,
        Pagination::new(None, 12),
    );

    let prices: Vec<u64> = view.properties.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![15_000_000, 2_500_000, 1_800_000, 800_000]);
    assert!(view
        .properties
        .iter()
        .all(|p| p.listing_type == ListingType::Rent));
    assert_eq!(view.active_filters, 1);
    assert!(!view.has_more);
}

#[test]
fn importer_stamps_missing_dates_in_file_order() {
    let csv = "title,price,location,listing_type,property_type,status,owner_id,created_at\n\
First,\"1,200,000\",\"Yaba, Lagos\",rent,Apartment,active,owner-1,\n\
Second,900000,\"Ikeja, Lagos\",rent,Apartment,,owner-1,\n";

    let properties = SeedImporter::from_reader(csv.as_bytes()).expect("rows import");

    assert_eq!(properties[0].title, "First");
    assert_eq!(properties[0].price, 1_200_000);
    assert_eq!(properties[1].status, PropertyStatus::Pending);
    assert!(properties[0].created_at > properties[1].created_at);
}

#[test]
fn importer_reports_offending_line() {
    let csv = "title,price,location,listing_type,property_type,status,owner_id\n\
Good,100,Lagos,rent,Apartment,active,owner-1\n\
Bad,100,Lagos,lease,Apartment,active,owner-1\n";

    let err = SeedImporter::from_reader(csv.as_bytes()).expect_err("bad listing type");

    match err {
        SeedImportError::InvalidRow { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}
