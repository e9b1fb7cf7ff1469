use clap::Args;
use estate_market::config::MarketplaceConfig;
use estate_market::error::AppError;
use estate_market::marketplace::{
    InMemoryMarketplaceStore, InquirySubmission, ListingImporter, MarketplaceService,
    PriceRange, Principal, Property, PropertyDraft, PropertyQuery, PropertyStatus,
    Registration, Role, SortKey, Threshold,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Listing CSV to load instead of the built-in sample listings.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = MarketplaceService::new(
        Arc::new(InMemoryMarketplaceStore::new()),
        MarketplaceConfig::default(),
    );

    println!("Estate market demo");
    let seller = service.register(Registration {
        username: "demo-seller".to_string(),
        password: "demo-password".to_string(),
        name: "Demo Seller".to_string(),
        email: "seller@example.com".to_string(),
        role: Role::Seller,
    })
    .await?;
    let principal = Principal::from(&seller.user);
    println!("- registered seller '{}' (id {})", seller.user.username, seller.user.id);

    let drafts = match &args.csv {
        Some(path) => ListingImporter::from_path(path)?,
        None => sample_listings(),
    };
    let listed = service.seed_listings(&principal, drafts)?;
    println!("- listed {} properties", listed.len());

    let query = PropertyQuery {
        price: PriceRange::parse("200000-400000"),
        bedrooms: Threshold::parse("3+"),
        sort: SortKey::PriceLow,
        ..PropertyQuery::default()
    };
    let page = service.search_properties(&query, 1, None)?;
    println!(
        "\nSearch: $200k-$400k, 3+ beds, {} ({} matches, page {}/{})",
        query.sort.label(),
        page.total_items,
        page.page,
        page.total_pages.max(1)
    );
    for property in &page.items {
        print_listing(property);
    }

    let Some(target) = page.items.first().or_else(|| listed.first()) else {
        println!("\nNo listings available; skipping inquiry.");
        return Ok(());
    };

    let inquiry = service.submit_inquiry(
        None,
        target.id,
        InquirySubmission {
            name: "Jordan Buyer".to_string(),
            email: "jordan@example.com".to_string(),
            phone: None,
            message: "Is this home still available for a showing this weekend?".to_string(),
        },
    )?;
    println!(
        "\nAnonymous inquiry #{} sent for property #{}",
        inquiry.id, inquiry.property_id
    );

    let inbox = service.seller_inquiries(Some(&principal))?;
    println!("Seller inbox ({} inquiries):", inbox.len());
    for item in &inbox {
        println!(
            "  - #{} from {} <{}> on property #{}: {}",
            item.id, item.name, item.email, item.property_id, item.message
        );
    }

    Ok(())
}

fn print_listing(property: &Property) {
    println!(
        "  - #{} {} | ${} | {} bd / {} ba | {}, {} | {}",
        property.id,
        property.title,
        property.price,
        property.bedrooms,
        property.bathrooms,
        property.city,
        property.state,
        property.status.label()
    );
}

fn sample_listings() -> Vec<PropertyDraft> {
    let rows = [
        ("Prairie Ranch", "12 Oak St", "Ames", "50010", 185_000, 3, 2.0, "Single Family", PropertyStatus::OffMarket),
        ("River Loft", "301 Walnut St", "Des Moines", "50309", 329_000, 2, 2.0, "Condo", PropertyStatus::Exclusive),
        ("Drake Foursquare", "2210 Cottage Grove Ave", "Des Moines", "50311", 300_000, 3, 2.0, "Single Family", PropertyStatus::Exclusive),
        ("Lakeside Colonial", "640 Lake Rd", "Clive", "50325", 455_000, 4, 3.5, "Single Family", PropertyStatus::OffMarket),
        ("Ankeny Split-Level", "88 Pine Rd", "Ankeny", "50023", 265_000, 4, 2.5, "Single Family", PropertyStatus::OffMarket),
    ];

    rows.into_iter()
        .map(
            |(title, address, city, zip, price, bedrooms, bathrooms, kind, status)| PropertyDraft {
                title: title.to_string(),
                address: address.to_string(),
                city: city.to_string(),
                state: "IA".to_string(),
                zip_code: zip.to_string(),
                price,
                description: format!("{kind} in {city}, IA"),
                bedrooms,
                bathrooms,
                square_feet: 1_800,
                lot_size: None,
                year_built: 1990,
                property_type: kind.to_string(),
                status,
                features: vec!["garage".to_string()],
                image_url: None,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_market::marketplace::{MarketplaceStore, NewUser};

    #[test]
    fn sample_listings_pass_listing_checks() {
        let store = Arc::new(InMemoryMarketplaceStore::new());
        let service = MarketplaceService::new(store.clone(), MarketplaceConfig::default());
        let seller = store
            .create_user(NewUser {
                username: "demo".to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
                name: "Demo".to_string(),
                email: "demo@example.com".to_string(),
                role: Role::Seller,
            })
            .expect("seller created");

        let listed = service
            .seed_listings(&Principal::from(&seller), sample_listings())
            .expect("samples are valid");
        assert_eq!(listed.len(), 5);
    }

    #[tokio::test]
    async fn demo_runs_end_to_end() {
        run_demo(DemoArgs::default()).await.expect("demo completes");
    }
}
