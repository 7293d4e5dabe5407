use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::enquirymodel::{
    ClosureOutcome, Enquiry, EnquiryKind, EnquiryStage, EnquiryStatus,
};

//Wizard step: property details
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub value: Option<String>, // Free text amount, e.g. "8,500,000"
    pub currency: Option<String>,
}

//Wizard step: buyer / seller details
#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct PartyInput {
    pub name: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    #[validate(length(min = 7, max = 20, message = "Phone must be between 7 and 20 characters"))]
    pub phone: Option<String>,
}

impl PartyInput {
    /// Blank optional fields from the form count as absent.
    pub fn normalized(&self) -> PartyInput {
        PartyInput {
            name: non_blank(&self.name),
            email: non_blank(&self.email),
            phone: non_blank(&self.phone),
        }
    }
}

/// Everything the create-enquiry wizard collects. Which sections are required depends on
/// the enquiry kind: `property` for buy/sell, `offeredProperty` + `receivedProperty` for
/// exchange.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnquiryDto {
    pub property: Option<PropertyInput>,
    pub offered_property: Option<PropertyInput>,
    pub received_property: Option<PropertyInput>,
    pub buyer: Option<PartyInput>,
    pub seller: Option<PartyInput>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CloseEnquiryDto {
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,
    pub outcome: ClosureOutcome,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertySide {
    Subject,  // buy/sell property
    Offered,
    Received,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryFilter {
    pub kind: Option<EnquiryKind>,
    pub status: Option<EnquiryStatus>,
    pub stage: Option<EnquiryStage>,
    pub agent_id: Option<Uuid>,
    pub search: Option<String>,
    #[serde(default)]
    pub open_only: bool,
}

impl EnquiryFilter {
    pub fn matches(&self, enquiry: &Enquiry) -> bool {
        if self.kind.is_some_and(|kind| enquiry.kind != kind) {
            return false;
        }
        if self.status.is_some_and(|status| enquiry.status != status) {
            return false;
        }
        if self.stage.is_some_and(|stage| enquiry.stage != stage) {
            return false;
        }
        if self.agent_id.is_some() && enquiry.assigned_agent != self.agent_id {
            return false;
        }
        if self.open_only && enquiry.is_terminal() {
            return false;
        }

        match non_blank(&self.search) {
            Some(term) => {
                let term = term.to_lowercase();
                let party_hit = [enquiry.buyer(), enquiry.seller()]
                    .into_iter()
                    .flatten()
                    .any(|party| party.name.to_lowercase().contains(&term));
                let property_hit = enquiry.properties().into_iter().any(|property| {
                    property.name.to_lowercase().contains(&term)
                        || property.location.to_lowercase().contains(&term)
                });
                party_hit || property_hit
            }
            None => true,
        }
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
