use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier assigned to registered accounts.
    UserId
);
entity_id!(
    /// Identifier assigned to listed properties.
    PropertyId
);
entity_id!(
    /// Identifier assigned to buyer inquiries.
    InquiryId
);

/// Closed set of account roles; only sellers may list properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

/// Registered account. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Store input for a new account; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Registration payload accepted at the API boundary.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Market visibility of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    #[default]
    OffMarket,
    Exclusive,
}

impl PropertyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyStatus::OffMarket => "off-market",
            PropertyStatus::Exclusive => "exclusive",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off-market" | "off_market" | "offmarket" => Ok(Self::OffMarket),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(format!("unknown property status '{other}'")),
        }
    }
}

/// A listed property as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub price: u64,
    pub description: String,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_feet: u32,
    pub lot_size: Option<String>,
    pub year_built: u16,
    pub property_type: String,
    pub status: PropertyStatus,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub seller_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn from_draft(
        id: PropertyId,
        seller_id: UserId,
        draft: PropertyDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let PropertyDraft {
            title,
            address,
            city,
            state,
            zip_code,
            price,
            description,
            bedrooms,
            bathrooms,
            square_feet,
            lot_size,
            year_built,
            property_type,
            status,
            features,
            image_url,
        } = draft;

        Self {
            id,
            title,
            address,
            city,
            state,
            zip_code,
            price,
            description,
            bedrooms,
            bathrooms,
            square_feet,
            lot_size,
            year_built,
            property_type,
            status,
            features,
            image_url,
            seller_id,
            created_at,
        }
    }
}

/// Listing payload for a new property. Any `sellerId` supplied by a client is
/// ignored; ownership always comes from the session.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 2, max = 32, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 3, max = 10, message = "zip code must be 3-10 characters"))]
    pub zip_code: String,
    pub price: u64,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub bedrooms: u32,
    #[validate(range(min = 0.0, max = 100.0, message = "bathrooms must be between 0 and 100"))]
    pub bathrooms: f64,
    pub square_feet: u32,
    #[serde(default)]
    pub lot_size: Option<String>,
    #[validate(range(min = 1600, max = 2100, message = "year built must be between 1600 and 2100"))]
    pub year_built: u16,
    #[validate(length(min = 1, message = "property type is required"))]
    pub property_type: String,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial update merged over an existing listing. Identity, ownership and
/// creation time are not part of the payload, and unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyUpdate {
    #[validate(length(min = 1, max = 200, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "city cannot be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 2, max = 32, message = "state cannot be empty"))]
    pub state: Option<String>,
    #[validate(length(min = 3, max = 10, message = "zip code must be 3-10 characters"))]
    pub zip_code: Option<String>,
    pub price: Option<u64>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    pub bedrooms: Option<u32>,
    #[validate(range(min = 0.0, max = 100.0, message = "bathrooms must be between 0 and 100"))]
    pub bathrooms: Option<f64>,
    pub square_feet: Option<u32>,
    pub lot_size: Option<String>,
    #[validate(range(min = 1600, max = 2100, message = "year built must be between 1600 and 2100"))]
    pub year_built: Option<u16>,
    #[validate(length(min = 1, message = "property type cannot be empty"))]
    pub property_type: Option<String>,
    pub status: Option<PropertyStatus>,
    pub features: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl PropertyUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(self, property: &mut Property) {
        let PropertyUpdate {
            title,
            address,
            city,
            state,
            zip_code,
            price,
            description,
            bedrooms,
            bathrooms,
            square_feet,
            lot_size,
            year_built,
            property_type,
            status,
            features,
            image_url,
        } = self;

        if let Some(value) = title {
            property.title = value;
        }
        if let Some(value) = address {
            property.address = value;
        }
        if let Some(value) = city {
            property.city = value;
        }
        if let Some(value) = state {
            property.state = value;
        }
        if let Some(value) = zip_code {
            property.zip_code = value;
        }
        if let Some(value) = price {
            property.price = value;
        }
        if let Some(value) = description {
            property.description = value;
        }
        if let Some(value) = bedrooms {
            property.bedrooms = value;
        }
        if let Some(value) = bathrooms {
            property.bathrooms = value;
        }
        if let Some(value) = square_feet {
            property.square_feet = value;
        }
        if lot_size.is_some() {
            property.lot_size = lot_size;
        }
        if let Some(value) = year_built {
            property.year_built = value;
        }
        if let Some(value) = property_type {
            property.property_type = value;
        }
        if let Some(value) = status {
            property.status = value;
        }
        if let Some(value) = features {
            property.features = value;
        }
        if image_url.is_some() {
            property.image_url = image_url;
        }
    }
}

/// Buyer-to-seller contact record. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInquiry {
    pub id: InquiryId,
    pub property_id: PropertyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Minimum inquiry message length, counted in characters after trimming.
pub const MIN_INQUIRY_MESSAGE_CHARS: usize = 10;

/// Contact form payload; the property comes from the request path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InquirySubmission {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "phone must be at most 32 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "message must be at least 10 characters"))]
    pub message: String,
}

/// Store input for an inquiry that already passed intake checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub property_id: PropertyId,
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl NewInquiry {
    /// The email is taken as is; intake trims it before validating.
    pub fn from_submission(
        property_id: PropertyId,
        user_id: Option<UserId>,
        submission: InquirySubmission,
    ) -> Self {
        Self {
            property_id,
            user_id,
            name: submission.name.trim().to_string(),
            email: submission.email,
            phone: submission
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            message: submission.message.trim().to_string(),
        }
    }
}
