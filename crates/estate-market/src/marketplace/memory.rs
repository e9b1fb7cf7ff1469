use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{
    InquiryId, NewInquiry, NewUser, Property, PropertyDraft, PropertyId, PropertyInquiry,
    PropertyUpdate, Role, User, UserId,
};
use super::store::{MarketplaceStore, StoreError};

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    properties: BTreeMap<PropertyId, Property>,
    inquiries: BTreeMap<InquiryId, PropertyInquiry>,
    last_user_id: u64,
    last_property_id: u64,
    last_inquiry_id: u64,
}

/// Process-lifetime store. Id counters and maps share one lock, so id
/// assignment and the insert it belongs to are a single step.
///
/// Ids increase monotonically and are never reused, which makes `BTreeMap`
/// iteration order equal to insertion order.
#[derive(Debug, Default)]
pub struct InMemoryMarketplaceStore {
    state: Mutex<StoreState>,
}

impl InMemoryMarketplaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl MarketplaceStore for InMemoryMarketplaceStore {
    fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.lock()?;
        if state
            .users
            .values()
            .any(|existing| existing.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(StoreError::UsernameTaken(user.username));
        }

        state.last_user_id += 1;
        let id = UserId(state.last_user_id);
        let NewUser {
            username,
            password_hash,
            name,
            email,
            role,
        } = user;
        let stored = User {
            id,
            username,
            password_hash,
            name,
            email,
            role,
        };
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    fn create_property(
        &self,
        seller: UserId,
        draft: PropertyDraft,
    ) -> Result<Property, StoreError> {
        let mut state = self.lock()?;
        match state.users.get(&seller) {
            Some(user) if user.role == Role::Seller => {}
            _ => return Err(StoreError::UnknownSeller(seller)),
        }

        state.last_property_id += 1;
        let id = PropertyId(state.last_property_id);
        let property = Property::from_draft(id, seller, draft, Utc::now());
        state.properties.insert(id, property.clone());
        Ok(property)
    }

    fn property(&self, id: PropertyId) -> Result<Option<Property>, StoreError> {
        Ok(self.lock()?.properties.get(&id).cloned())
    }

    fn properties(&self) -> Result<Vec<Property>, StoreError> {
        Ok(self.lock()?.properties.values().cloned().collect())
    }

    fn properties_by_seller(&self, seller: UserId) -> Result<Vec<Property>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .properties
            .values()
            .filter(|property| property.seller_id == seller)
            .cloned()
            .collect())
    }

    fn update_property(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Option<Property>, StoreError> {
        let mut state = self.lock()?;
        let Some(property) = state.properties.get_mut(&id) else {
            return Ok(None);
        };
        update.apply_to(property);
        Ok(Some(property.clone()))
    }

    fn delete_property(&self, id: PropertyId) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if !state.properties.contains_key(&id) {
            return Ok(false);
        }

        let inquiries = state
            .inquiries
            .values()
            .filter(|inquiry| inquiry.property_id == id)
            .count();
        if inquiries > 0 {
            return Err(StoreError::Referenced { id, inquiries });
        }

        Ok(state.properties.remove(&id).is_some())
    }

    fn create_inquiry(&self, inquiry: NewInquiry) -> Result<PropertyInquiry, StoreError> {
        let mut state = self.lock()?;
        if !state.properties.contains_key(&inquiry.property_id) {
            return Err(StoreError::UnknownProperty(inquiry.property_id));
        }

        state.last_inquiry_id += 1;
        let id = InquiryId(state.last_inquiry_id);
        let NewInquiry {
            property_id,
            user_id,
            name,
            email,
            phone,
            message,
        } = inquiry;
        let stored = PropertyInquiry {
            id,
            property_id,
            user_id,
            name,
            email,
            phone,
            message,
            created_at: Utc::now(),
        };
        state.inquiries.insert(id, stored.clone());
        Ok(stored)
    }

    fn inquiries_for_property(
        &self,
        id: PropertyId,
    ) -> Result<Vec<PropertyInquiry>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .inquiries
            .values()
            .filter(|inquiry| inquiry.property_id == id)
            .cloned()
            .collect())
    }

    fn inquiries_for_seller(&self, seller: UserId) -> Result<Vec<PropertyInquiry>, StoreError> {
        let state = self.lock()?;
        let owned: BTreeSet<PropertyId> = state
            .properties
            .values()
            .filter(|property| property.seller_id == seller)
            .map(|property| property.id)
            .collect();

        Ok(state
            .inquiries
            .values()
            .filter(|inquiry| owned.contains(&inquiry.property_id))
            .cloned()
            .collect())
    }
}
