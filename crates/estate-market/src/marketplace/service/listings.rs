use tracing::{debug, info};

use super::{MarketplaceError, MarketplaceService, MAX_PAGE_SIZE};
use crate::marketplace::access::{require_authenticated, require_owner, require_seller, Principal};
use crate::marketplace::domain::{Property, PropertyDraft, PropertyId, PropertyUpdate};
use crate::marketplace::search::{paginate, Page, PropertyQuery};
use crate::marketplace::store::MarketplaceStore;
use crate::marketplace::validation::{validate, ValidationReport};

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore + 'static,
{
    /// Public listing in insertion order; paging is left to the client.
    pub fn list_properties(&self) -> Result<Vec<Property>, MarketplaceError> {
        Ok(self.store.properties()?)
    }

    pub fn property(&self, id: PropertyId) -> Result<Property, MarketplaceError> {
        self.store
            .property(id)?
            .ok_or(MarketplaceError::NotFound("property"))
    }

    /// Listings owned by the calling seller. The seller is always the session
    /// identity.
    pub fn seller_properties(
        &self,
        caller: Option<&Principal>,
    ) -> Result<Vec<Property>, MarketplaceError> {
        let seller = require_seller(caller)?;
        Ok(self.store.properties_by_seller(seller.user_id)?)
    }

    /// Server-side evaluation of the browse filters.
    pub fn search_properties(
        &self,
        query: &PropertyQuery,
        page: usize,
        page_size: Option<usize>,
    ) -> Result<Page<Property>, MarketplaceError> {
        let page_size = page_size
            .unwrap_or(self.config.page_size)
            .clamp(1, MAX_PAGE_SIZE);
        let matched = query.apply(&self.store.properties()?);
        debug!(matched = matched.len(), page, page_size, "property search");
        Ok(paginate(&matched, page, page_size))
    }

    pub fn create_property(
        &self,
        caller: Option<&Principal>,
        draft: PropertyDraft,
    ) -> Result<Property, MarketplaceError> {
        let seller = require_seller(caller)?;
        check_draft(&draft)?;

        let property = self.store.create_property(seller.user_id, draft)?;
        info!(property_id = %property.id, seller_id = %seller.user_id, "property listed");
        Ok(property)
    }

    /// Loads a listing the caller is about to change. Checks run in the order
    /// session, existence, ownership, so a foreign seller is refused before
    /// any payload is looked at.
    pub fn authorize_property_change(
        &self,
        caller: Option<&Principal>,
        id: PropertyId,
    ) -> Result<Property, MarketplaceError> {
        require_authenticated(caller)?;
        let property = self.property(id)?;
        require_owner(caller, &property)?;
        Ok(property)
    }

    pub fn update_property(
        &self,
        caller: Option<&Principal>,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Property, MarketplaceError> {
        self.update_property_with(caller, id, || Ok(update))
    }

    /// Like [`Self::update_property`], but the payload is only decoded once
    /// ownership is settled.
    pub(crate) fn update_property_with<F>(
        &self,
        caller: Option<&Principal>,
        id: PropertyId,
        payload: F,
    ) -> Result<Property, MarketplaceError>
    where
        F: FnOnce() -> Result<PropertyUpdate, MarketplaceError>,
    {
        self.authorize_property_change(caller, id)?;
        let update = payload()?;
        check_update(&update)?;

        let updated = self
            .store
            .update_property(id, update)?
            .ok_or(MarketplaceError::NotFound("property"))?;
        info!(property_id = %id, "property updated");
        Ok(updated)
    }

    /// Listings that already received inquiries cannot be deleted.
    pub fn delete_property(
        &self,
        caller: Option<&Principal>,
        id: PropertyId,
    ) -> Result<(), MarketplaceError> {
        self.authorize_property_change(caller, id)?;

        if !self.store.delete_property(id)? {
            return Err(MarketplaceError::NotFound("property"));
        }
        info!(property_id = %id, "property deleted");
        Ok(())
    }

    /// Bulk-list drafts for one seller, e.g. from a CSV import. Stops at the
    /// first rejected draft.
    pub fn seed_listings(
        &self,
        seller: &Principal,
        drafts: Vec<PropertyDraft>,
    ) -> Result<Vec<Property>, MarketplaceError> {
        drafts
            .into_iter()
            .map(|draft| self.create_property(Some(seller), draft))
            .collect()
    }
}

/// Derive checks plus the blank-text rules `validator` cannot express.
pub(crate) fn check_draft(draft: &PropertyDraft) -> Result<(), ValidationReport> {
    let mut report = validate(draft).err().unwrap_or_default();
    report.require_not_blank("title", &draft.title, "title is required");
    report.require_not_blank("address", &draft.address, "address is required");
    report.require_not_blank("city", &draft.city, "city is required");
    report.require_not_blank("description", &draft.description, "description is required");
    report.require_not_blank("propertyType", &draft.property_type, "property type is required");
    report.into_result()
}

pub(crate) fn check_update(update: &PropertyUpdate) -> Result<(), ValidationReport> {
    if update.is_empty() {
        return Err(ValidationReport::single(
            "body",
            "update must change at least one field",
        ));
    }

    let mut report = validate(update).err().unwrap_or_default();
    let text_fields = [
        ("title", &update.title),
        ("address", &update.address),
        ("city", &update.city),
        ("description", &update.description),
        ("propertyType", &update.property_type),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            report.require_not_blank(field, value, "value cannot be blank");
        }
    }
    report.into_result()
}
