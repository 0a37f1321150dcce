use crate::infra::{default_seed_path, load_catalog, offline_hub};
use clap::Args;
use property_hub::accounts::{SignInRequest, SignUpRequest};
use property_hub::error::AppError;
use property_hub::listings::{ListingQuery, ListingView, PropertyDraft, SortKey};
use property_hub::messaging::MessageDraft;
use property_hub::moderation::{AgentDraft, DashboardStats};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ListingSearchArgs {
    /// Listing catalog export (CSV)
    #[arg(long, default_value_os_t = default_seed_path())]
    pub(crate) csv: PathBuf,
    /// Case-insensitive substring of the location
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Exact property type, e.g. Apartment or Duplex
    #[arg(long)]
    pub(crate) property_type: Option<String>,
    /// rent or sale
    #[arg(long)]
    pub(crate) listing_type: Option<String>,
    /// Lower price bound in Naira
    #[arg(long)]
    pub(crate) min_price: Option<String>,
    /// Upper price bound in Naira
    #[arg(long)]
    pub(crate) max_price: Option<String>,
    /// Minimum bedrooms
    #[arg(long)]
    pub(crate) bedrooms: Option<String>,
    /// Minimum bathrooms
    #[arg(long)]
    pub(crate) bathrooms: Option<String>,
    /// newest, oldest, price-low, price-high, or bedrooms
    #[arg(long, default_value_t = SortKey::Newest)]
    pub(crate) sort: SortKey,
    /// One-based result page
    #[arg(long)]
    pub(crate) page: Option<usize>,
}

impl ListingSearchArgs {
    fn query(&self) -> ListingQuery {
        ListingQuery {
            location: self.location.clone(),
            property_type: self.property_type.clone(),
            listing_type: self.listing_type.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            bedrooms: self.bedrooms.clone(),
            bathrooms: self.bathrooms.clone(),
            sort: Some(self.sort),
            page: self.page,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed catalog (CSV). Defaults to the bundled Lagos/Abuja sample.
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

pub(crate) fn run_listing_search(args: ListingSearchArgs) -> Result<(), AppError> {
    let catalog = load_catalog(Some(&args.csv))?;
    let hub = offline_hub(catalog);
    let view = match hub.catalog.public_listings(&args.query()) {
        Ok(view) => view,
        Err(err) => {
            println!("Listing search unavailable: {}", err);
            return Ok(());
        }
    };
    render_listing_view(&view);
    Ok(())
}

pub(crate) fn render_listing_view(view: &ListingView) {
    println!(
        "{} matching listing(s) | sorted by {} | {} active filter(s)",
        view.total,
        view.sort.label(),
        view.active_filters
    );
    if view.properties.is_empty() {
        println!("  No properties match the current filters.");
        return;
    }
    for property in &view.properties {
        println!(
            "  - {} | {} | {} ({}) | {} bd / {} ba",
            property.title,
            property.location,
            format_naira(property.price),
            property.listing_type.label(),
            property.bedroom_count(),
            property.bathroom_count()
        );
    }
    if view.has_more {
        println!("  More results on page {}.", view.page + 1);
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let seed = args.seed_csv.unwrap_or_else(default_seed_path);
    let hub = offline_hub(load_catalog(Some(&seed))?);

    println!("Property Hub demo");
    render_listing_view(&match hub.catalog.public_listings(&ListingQuery::default()) {
        Ok(view) => view,
        Err(err) => {
            println!("  Catalog unavailable: {}", err);
            return Ok(());
        }
    });

    hub.accounts
        .bootstrap_admin("demo-admin@example.com", "demo-admin-pass", "Demo Admin")?;
    let admin = hub.accounts.sign_in(SignInRequest {
        email: "demo-admin@example.com".to_string(),
        password: "demo-admin-pass".to_string(),
    })?;
    let admin = hub.accounts.current(&admin.token)?;

    let seller = hub.accounts.sign_up(SignUpRequest {
        email: "chidi@example.com".to_string(),
        password: "chidi-pass".to_string(),
        full_name: Some("Chidi Okeke".to_string()),
        phone: Some("+234 803 555 0101".to_string()),
    })?;
    let seller = hub.accounts.current(&seller.token)?;

    println!("\nSubmission");
    let submitted = match hub.catalog.submit(&seller, demo_draft()) {
        Ok(property) => property,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- {} submitted '{}' -> status {}",
        seller.profile.display_name(),
        submitted.title,
        submitted.status.label()
    );
    print_public_total(&hub);

    println!("\nModeration");
    match hub.moderation.approve_property(&admin, &submitted.id) {
        Ok(property) => println!("- Approved '{}' -> {}", property.title, property.status.label()),
        Err(err) => println!("- Approval failed: {}", err),
    }
    print_public_total(&hub);

    let agent = match hub.moderation.create_agent(
        &admin,
        AgentDraft {
            full_name: "Amaka Obi".to_string(),
            email: "amaka@example.com".to_string(),
            phone: None,
            password: "amaka-temp-pass".to_string(),
        },
    ) {
        Ok(profile) => profile,
        Err(err) => {
            println!("- Agent onboarding failed: {}", err);
            return Ok(());
        }
    };
    println!("- Onboarded agent {} ({})", agent.display_name(), agent.role);

    println!("\nMessaging");
    let draft = MessageDraft {
        recipient_id: agent.user_id.clone(),
        property_id: Some(submitted.id.clone()),
        subject: Some("Viewing request".to_string()),
        message: "Can we schedule a viewing this weekend?".to_string(),
    };
    if let Err(err) = hub.messaging.send(&seller, draft) {
        println!("- Message not sent: {}", err);
        return Ok(());
    }
    let agent_session = hub.accounts.sign_in(SignInRequest {
        email: "amaka@example.com".to_string(),
        password: "amaka-temp-pass".to_string(),
    })?;
    let agent_user = hub.accounts.current(&agent_session.token)?;
    match hub.messaging.conversations(&agent_user, None) {
        Ok(conversations) => {
            for summary in conversations {
                println!(
                    "- {}: {} message(s), {} unread, last: \"{}\"",
                    summary.counterpart_name,
                    summary.message_count,
                    summary.unread,
                    summary.last_message.message
                );
            }
        }
        Err(err) => println!("- Conversations unavailable: {}", err),
    }

    println!("\nDashboard");
    match hub.moderation.dashboard() {
        Ok(stats) => render_dashboard(&stats),
        Err(err) => println!("  Dashboard unavailable: {}", err),
    }

    Ok(())
}

fn print_public_total(hub: &property_hub::PropertyHub) {
    match hub.catalog.public_listings(&ListingQuery::default()) {
        Ok(view) => println!("  Public catalog now lists {} propert(ies)", view.total),
        Err(err) => println!("  Public catalog unavailable: {}", err),
    }
}

fn render_dashboard(stats: &DashboardStats) {
    println!(
        "  Listings: {} total | {} active | {} pending | {} rejected | {} sold",
        stats.total_properties, stats.active, stats.pending, stats.rejected, stats.sold
    );
    println!(
        "  {} for rent / {} for sale | listed value {}",
        stats.for_rent,
        stats.for_sale,
        format_naira(stats.total_value)
    );
    println!(
        "  Users: {} total ({} admin, {} agent, {} regular)",
        stats.total_users, stats.admins, stats.agents, stats.regular_users
    );
}

fn demo_draft() -> PropertyDraft {
    PropertyDraft {
        title: "Serviced 3 Bedroom Terrace in Gwarinpa".to_string(),
        description: Some("Corner terrace with dedicated parking and steady water.".to_string()),
        price: 4_200_000,
        location: "Gwarinpa, Abuja".to_string(),
        address: None,
        bedrooms: Some(3),
        bathrooms: Some(3),
        area_sqm: Some(160),
        listing_type: "rent".to_string(),
        property_type: "Terrace".to_string(),
        images: vec!["/placeholder.svg".to_string()],
        features: vec!["Parking".to_string(), "Borehole".to_string()],
    }
}

/// Whole-Naira amount with thousands separators, e.g. `₦2,500,000`.
pub(crate) fn format_naira(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("₦{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naira_amounts_are_grouped() {
        assert_eq!(format_naira(0), "₦0");
        assert_eq!(format_naira(800_000), "₦800,000");
        assert_eq!(format_naira(120_000_000), "₦120,000,000");
    }

    #[test]
    fn search_args_become_listing_query() {
        let args = ListingSearchArgs {
            csv: default_seed_path(),
            location: Some("lagos".to_string()),
            property_type: None,
            listing_type: Some("rent".to_string()),
            min_price: None,
            max_price: Some("2000000".to_string()),
            bedrooms: None,
            bathrooms: None,
            sort: SortKey::PriceLow,
            page: None,
        };

        let query = args.query();
        assert_eq!(query.sort_key(), SortKey::PriceLow);
        assert_eq!(query.criteria().active_count(), 3);
    }
}
