use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::MarketplaceConfig;
use crate::marketplace::access::Principal;
use crate::marketplace::domain::{
    InquirySubmission, NewInquiry, NewUser, Property, PropertyDraft, PropertyId,
    PropertyInquiry, PropertyStatus, PropertyUpdate, Role, User, UserId,
};
use crate::marketplace::memory::InMemoryMarketplaceStore;
use crate::marketplace::service::MarketplaceService;
use crate::marketplace::store::{MarketplaceStore, StoreError};

pub(crate) type MemoryService = MarketplaceService<InMemoryMarketplaceStore>;

pub(crate) fn build_service() -> (MemoryService, Arc<InMemoryMarketplaceStore>) {
    let store = Arc::new(InMemoryMarketplaceStore::new());
    let service = MarketplaceService::new(store.clone(), MarketplaceConfig::default());
    (service, store)
}

fn listing_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        name: format!("{username} example"),
        email: format!("{username}@example.com"),
        role,
    }
}

/// Registers an account straight through the store, skipping password hashing.
pub(crate) fn account(store: &InMemoryMarketplaceStore, username: &str, role: Role) -> (User, Principal) {
    let user = store
        .create_user(new_user(username, role))
        .expect("account created");
    let principal = Principal::from(&user);
    (user, principal)
}

pub(crate) fn draft(title: &str, price: u64, bedrooms: u32, bathrooms: f64) -> PropertyDraft {
    PropertyDraft {
        title: title.to_string(),
        address: "410 Grand Ave".to_string(),
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        zip_code: "50309".to_string(),
        price,
        description: "Updated kitchen, fenced yard, close to downtown.".to_string(),
        bedrooms,
        bathrooms,
        square_feet: 1_640,
        lot_size: Some("0.2 acres".to_string()),
        year_built: 1998,
        property_type: "Single Family".to_string(),
        status: PropertyStatus::OffMarket,
        features: vec!["garage".to_string(), "fireplace".to_string()],
        image_url: None,
    }
}

pub(crate) fn property_fixture(id: u64, seller: UserId, price: u64) -> Property {
    Property::from_draft(
        PropertyId(id),
        seller,
        draft(&format!("Listing {id}"), price, 3, 2.0),
        listing_epoch() + Duration::minutes(id as i64),
    )
}

/// Ten listings with distinct prices and varied rooms, locations, and
/// statuses; ids double as creation order.
pub(crate) fn listing_collection() -> Vec<Property> {
    let rows: [(u64, u32, f64, &str, &str, &str, &str, PropertyStatus); 10] = [
        (150_000, 2, 1.0, "12 Oak St", "Ames", "IA", "50010", PropertyStatus::OffMarket),
        (210_000, 3, 2.0, "88 Pine Rd", "Ankeny", "IA", "50023", PropertyStatus::Exclusive),
        (265_000, 4, 2.5, "5 Birch Ln", "Des Moines", "IA", "50310", PropertyStatus::OffMarket),
        (320_000, 3, 1.5, "301 Walnut St", "Des Moines", "IA", "50309", PropertyStatus::Exclusive),
        (399_999, 2, 2.0, "77 Cedar Ct", "Omaha", "NE", "68102", PropertyStatus::OffMarket),
        (400_000, 5, 3.5, "19 Elm Dr", "Omaha", "NE", "68114", PropertyStatus::Exclusive),
        (455_000, 3, 2.0, "640 Lake Rd", "Clive", "IA", "50325", PropertyStatus::OffMarket),
        (610_000, 4, 3.0, "2 Ridge Way", "West Des Moines", "IA", "50266", PropertyStatus::OffMarket),
        (800_000, 5, 4.0, "9 Summit Pl", "Lincoln", "NE", "68508", PropertyStatus::Exclusive),
        (1_250_000, 6, 5.5, "1 Estate Dr", "Waukee", "IA", "50263", PropertyStatus::OffMarket),
    ];

    rows.iter()
        .enumerate()
        .map(|(index, (price, beds, baths, address, city, state, zip, status))| {
            let id = index as u64 + 1;
            let mut property = property_fixture(id, UserId(1), *price);
            property.bedrooms = *beds;
            property.bathrooms = *baths;
            property.address = address.to_string();
            property.city = city.to_string();
            property.state = state.to_string();
            property.zip_code = zip.to_string();
            property.status = *status;
            if id % 2 == 0 {
                property.property_type = "Condo".to_string();
                property.features = vec!["pool".to_string()];
            }
            property
        })
        .collect()
}

pub(crate) fn inquiry_submission() -> InquirySubmission {
    InquirySubmission {
        name: "Jordan Buyer".to_string(),
        email: "jordan@example.com".to_string(),
        phone: Some("515-555-0199".to_string()),
        message: "Is the basement finished? I'd like to schedule a tour.".to_string(),
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(crate) struct UnavailableStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("database offline".to_string()))
}

impl MarketplaceStore for UnavailableStore {
    fn create_user(&self, _user: NewUser) -> Result<User, StoreError> {
        offline()
    }

    fn user(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        offline()
    }

    fn user_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        offline()
    }

    fn create_property(
        &self,
        _seller: UserId,
        _draft: PropertyDraft,
    ) -> Result<Property, StoreError> {
        offline()
    }

    fn property(&self, _id: PropertyId) -> Result<Option<Property>, StoreError> {
        offline()
    }

    fn properties(&self) -> Result<Vec<Property>, StoreError> {
        offline()
    }

    fn properties_by_seller(&self, _seller: UserId) -> Result<Vec<Property>, StoreError> {
        offline()
    }

    fn update_property(
        &self,
        _id: PropertyId,
        _update: PropertyUpdate,
    ) -> Result<Option<Property>, StoreError> {
        offline()
    }

    fn delete_property(&self, _id: PropertyId) -> Result<bool, StoreError> {
        offline()
    }

    fn create_inquiry(&self, _inquiry: NewInquiry) -> Result<PropertyInquiry, StoreError> {
        offline()
    }

    fn inquiries_for_property(
        &self,
        _id: PropertyId,
    ) -> Result<Vec<PropertyInquiry>, StoreError> {
        offline()
    }

    fn inquiries_for_seller(&self, _seller: UserId) -> Result<Vec<PropertyInquiry>, StoreError> {
        offline()
    }
}
