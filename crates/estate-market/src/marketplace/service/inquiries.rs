use tracing::info;

use super::{MarketplaceError, MarketplaceService};
use crate::marketplace::access::{require_seller, Principal};
use crate::marketplace::domain::{
    InquirySubmission, NewInquiry, PropertyId, PropertyInquiry, MIN_INQUIRY_MESSAGE_CHARS,
};
use crate::marketplace::store::MarketplaceStore;
use crate::marketplace::validation::validate;

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore + 'static,
{
    /// Record a buyer's message to a listing's seller.
    ///
    /// No session is needed; a signed-in caller is attached to the inquiry.
    /// The property is checked before the payload, and nothing is stored on
    /// either failure.
    pub fn submit_inquiry(
        &self,
        caller: Option<&Principal>,
        property_id: PropertyId,
        submission: InquirySubmission,
    ) -> Result<PropertyInquiry, MarketplaceError> {
        self.submit_inquiry_with(caller, property_id, || Ok(submission))
    }

    /// Like [`Self::submit_inquiry`], but the payload is only decoded once the
    /// property is known to exist.
    pub(crate) fn submit_inquiry_with<F>(
        &self,
        caller: Option<&Principal>,
        property_id: PropertyId,
        payload: F,
    ) -> Result<PropertyInquiry, MarketplaceError>
    where
        F: FnOnce() -> Result<InquirySubmission, MarketplaceError>,
    {
        self.property(property_id)?;

        let mut submission = payload()?;
        submission.email = submission.email.trim().to_string();
        let mut report = validate(&submission).err().unwrap_or_default();
        report.require_not_blank("name", &submission.name, "name is required");
        report.require_min_chars(
            "message",
            &submission.message,
            MIN_INQUIRY_MESSAGE_CHARS,
            "message must be at least 10 characters",
        );
        report.into_result()?;

        let user_id = caller.map(|principal| principal.user_id);
        let inquiry = self.store.create_inquiry(NewInquiry::from_submission(
            property_id,
            user_id,
            submission,
        ))?;

        info!(
            inquiry_id = %inquiry.id,
            property_id = %property_id,
            authenticated = user_id.is_some(),
            "inquiry received"
        );
        Ok(inquiry)
    }

    /// Inquiries across every listing the calling seller owns.
    pub fn seller_inquiries(
        &self,
        caller: Option<&Principal>,
    ) -> Result<Vec<PropertyInquiry>, MarketplaceError> {
        let seller = require_seller(caller)?;
        Ok(self.store.inquiries_for_seller(seller.user_id)?)
    }

    /// Inquiries for one listing, visible to its owner only.
    pub fn property_inquiries(
        &self,
        caller: Option<&Principal>,
        property_id: PropertyId,
    ) -> Result<Vec<PropertyInquiry>, MarketplaceError> {
        require_seller(caller)?;
        self.authorize_property_change(caller, property_id)?;
        Ok(self.store.inquiries_for_property(property_id)?)
    }
}
