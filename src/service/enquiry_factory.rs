// service/enquiry_factory.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::enquirydtos::{non_blank, CreateEnquiryDto, PartyInput, PropertyInput, PropertySide},
    models::{
        agentmodel::ReferenceData,
        enquirymodel::{
            Counterparties, Enquiry, EnquiryKind, EnquiryStage, EnquiryStatus, EnquirySubject,
            Money, Party, PropertyDetails,
        },
    },
    service::{error::ServiceError, lifecycle::EnquiryLifecycle, valuation::money_match},
    utils::currency::{format_amount, normalize_currency, parse_amount},
};

#[derive(Debug, Clone)]
pub struct EnquiryFactory {
    reference: Arc<ReferenceData>,
    default_currency: String,
}

impl EnquiryFactory {
    pub fn new(reference: Arc<ReferenceData>, default_currency: &str) -> Self {
        Self {
            reference,
            default_currency: normalize_currency(default_currency),
        }
    }

    /// Validates wizard input for `kind` and builds a fresh Pending/Initial enquiry.
    /// Required fields are checked in wizard order and the first gap is reported.
    pub fn create(
        &self,
        kind: EnquiryKind,
        input: &CreateEnquiryDto,
    ) -> Result<Enquiry, ServiceError> {
        let (subject, counterparties, valuation_match_percent) = match kind {
            EnquiryKind::Buy => {
                let property = self.property("property", input.property.as_ref())?;
                let buyer = Self::party("buyer", input.buyer.as_ref())?;
                (
                    EnquirySubject::Single { property },
                    Counterparties::Buyer { buyer },
                    None,
                )
            }
            EnquiryKind::Sell => {
                let property = self.property("property", input.property.as_ref())?;
                let seller = Self::party("seller", input.seller.as_ref())?;
                (
                    EnquirySubject::Single { property },
                    Counterparties::Seller { seller },
                    None,
                )
            }
            EnquiryKind::Exchange => {
                let offered = self.property("offeredProperty", input.offered_property.as_ref())?;
                let received =
                    self.property("receivedProperty", input.received_property.as_ref())?;
                let buyer = Self::party("buyer", input.buyer.as_ref())?;
                let seller = Self::party("seller", input.seller.as_ref())?;

                if offered.value.currency != received.value.currency {
                    return Err(ServiceError::validation(
                        "receivedProperty.currency",
                        "must match the offered property currency",
                    ));
                }
                let percent = money_match(&offered.value, &received.value)?;

                (
                    EnquirySubject::Exchange { offered, received },
                    Counterparties::Both { buyer, seller },
                    Some(percent),
                )
            }
        };

        let now = Utc::now();
        Ok(Enquiry {
            id: Uuid::new_v4(),
            kind,
            subject,
            counterparties,
            assigned_agent: None,
            stage: EnquiryStage::Initial,
            status: EnquiryStatus::Pending,
            valuation_match_percent,
            closure_reason: None,
            history: Vec::new(),
            created_at: now,
            last_updated: now,
        })
    }

    /// Replaces one property value and recomputes the valuation match for exchanges.
    pub fn revalue(
        &self,
        enquiry: &Enquiry,
        side: PropertySide,
        value: &str,
    ) -> Result<Enquiry, ServiceError> {
        EnquiryLifecycle::ensure_editable(enquiry, "revalue a property")?;

        let amount = parse_amount(value).map_err(|e| {
            ServiceError::validation(format!("{}.value", Self::side_field(side)), e)
        })?;

        if let Some(current) = enquiry.properties().first() {
            tracing::debug!(
                "Revaluing {} of enquiry {} to {}",
                Self::side_field(side),
                enquiry.id,
                format_amount(&amount, &current.value.currency)
            );
        }

        let mut updated = enquiry.clone();
        match (&mut updated.subject, side) {
            (EnquirySubject::Single { property }, PropertySide::Subject) => {
                property.value.amount = amount;
            }
            (EnquirySubject::Exchange { offered, received }, PropertySide::Offered) => {
                offered.value.amount = amount;
                updated.valuation_match_percent = Some(money_match(&offered.value, &received.value)?);
            }
            (EnquirySubject::Exchange { offered, received }, PropertySide::Received) => {
                received.value.amount = amount;
                updated.valuation_match_percent = Some(money_match(&offered.value, &received.value)?);
            }
            _ => {
                return Err(ServiceError::validation(
                    "side",
                    format!("{:?} does not apply to a {} enquiry", side, enquiry.kind.to_str()),
                ));
            }
        }

        updated.touch();
        Ok(updated)
    }

    fn side_field(side: PropertySide) -> &'static str {
        match side {
            PropertySide::Subject => "property",
            PropertySide::Offered => "offeredProperty",
            PropertySide::Received => "receivedProperty",
        }
    }

    fn property(
        &self,
        field: &str,
        input: Option<&PropertyInput>,
    ) -> Result<PropertyDetails, ServiceError> {
        let blank = PropertyInput::default();
        let input = input.unwrap_or(&blank);

        let name = required(field, "name", &input.name)?;
        let location = required(field, "location", &input.location)?;
        let raw_value = required(field, "value", &input.value)?;
        let raw_type = required(field, "propertyType", &input.property_type)?;

        let amount = parse_amount(&raw_value)
            .map_err(|e| ServiceError::validation(format!("{}.value", field), e))?;

        let property_type = self.reference.resolve_property_type(&raw_type).ok_or_else(|| {
            ServiceError::validation(
                format!("{}.propertyType", field),
                format!("unknown property type '{}'", raw_type),
            )
        })?;

        let currency = non_blank(&input.currency)
            .map(|c| normalize_currency(&c))
            .unwrap_or_else(|| self.default_currency.clone());
        if !self.reference.is_known_currency(&currency) {
            return Err(ServiceError::validation(
                format!("{}.currency", field),
                format!("unknown currency '{}'", currency),
            ));
        }

        Ok(PropertyDetails {
            name,
            location,
            property_type,
            value: Money { amount, currency },
        })
    }

    fn party(field: &str, input: Option<&PartyInput>) -> Result<Party, ServiceError> {
        let input = input.map(PartyInput::normalized).unwrap_or_default();
        let name = required(field, "name", &input.name)?;

        input
            .validate()
            .map_err(|e| ServiceError::from_validation(&format!("{}.", field), &e))?;

        Ok(Party {
            name,
            email: input.email,
            phone: input.phone,
        })
    }
}

fn required(section: &str, field: &str, value: &Option<String>) -> Result<String, ServiceError> {
    non_blank(value).ok_or_else(|| ServiceError::validation(format!("{}.{}", section, field), "is required"))
}
