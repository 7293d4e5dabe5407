use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryKind {
    Buy,
    Sell,
    Exchange,
}

impl EnquiryKind {
    pub fn to_str(&self) -> &str {
        match self {
            EnquiryKind::Buy => "buy",
            EnquiryKind::Sell => "sell",
            EnquiryKind::Exchange => "exchange",
        }
    }
}

/// Position in the deal pipeline. Declaration order is pipeline order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStage {
    Initial,
    Negotiation,
    Offer,
    Payment,
    Completed,
}

impl EnquiryStage {
    pub const ALL: [EnquiryStage; 5] = [
        EnquiryStage::Initial,
        EnquiryStage::Negotiation,
        EnquiryStage::Offer,
        EnquiryStage::Payment,
        EnquiryStage::Completed,
    ];

    pub fn position(&self) -> usize {
        match self {
            EnquiryStage::Initial => 0,
            EnquiryStage::Negotiation => 1,
            EnquiryStage::Offer => 2,
            EnquiryStage::Payment => 3,
            EnquiryStage::Completed => 4,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            EnquiryStage::Initial => "initial",
            EnquiryStage::Negotiation => "negotiation",
            EnquiryStage::Offer => "offer",
            EnquiryStage::Payment => "payment",
            EnquiryStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    Pending,
    Negotiating,
    Accepted,
    Rejected, // Terminal
    Completed, // Terminal
    Cancelled, // Terminal
}

impl EnquiryStatus {
    pub const ALL: [EnquiryStatus; 6] = [
        EnquiryStatus::Pending,
        EnquiryStatus::Negotiating,
        EnquiryStatus::Accepted,
        EnquiryStatus::Rejected,
        EnquiryStatus::Completed,
        EnquiryStatus::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EnquiryStatus::Rejected | EnquiryStatus::Completed | EnquiryStatus::Cancelled
        )
    }

    pub fn to_str(&self) -> &str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::Negotiating => "negotiating",
            EnquiryStatus::Accepted => "accepted",
            EnquiryStatus::Rejected => "rejected",
            EnquiryStatus::Completed => "completed",
            EnquiryStatus::Cancelled => "cancelled",
        }
    }
}

/// How an operator closes an enquiry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClosureOutcome {
    Completed,
    Cancelled,
}

impl From<ClosureOutcome> for EnquiryStatus {
    fn from(outcome: ClosureOutcome) -> Self {
        match outcome {
            ClosureOutcome::Completed => EnquiryStatus::Completed,
            ClosureOutcome::Cancelled => EnquiryStatus::Cancelled,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Money {
    pub amount: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub name: String,
    pub location: String,
    pub property_type: String,
    pub value: Money,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Party {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The property (or pair of properties) an enquiry is about.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "shape")]
pub enum EnquirySubject {
    Single {
        property: PropertyDetails,
    },
    Exchange {
        offered: PropertyDetails,
        received: PropertyDetails,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "shape")]
pub enum Counterparties {
    Buyer { buyer: Party },
    Seller { seller: Party },
    Both { buyer: Party, seller: Party },
}

impl Counterparties {
    pub fn buyer(&self) -> Option<&Party> {
        match self {
            Counterparties::Buyer { buyer } | Counterparties::Both { buyer, .. } => Some(buyer),
            Counterparties::Seller { .. } => None,
        }
    }

    pub fn seller(&self) -> Option<&Party> {
        match self {
            Counterparties::Seller { seller } | Counterparties::Both { seller, .. } => Some(seller),
            Counterparties::Buyer { .. } => None,
        }
    }
}

//Status change record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusTransition {
    pub from: EnquiryStatus,
    pub to: EnquiryStatus,
    pub action: String,
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

/// A tracked request to buy, sell or exchange a property.
///
/// Only the enquiry factory constructs these, so `kind`, `subject` and `counterparties`
/// always agree and the valuation match exists exactly for exchanges.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: Uuid,
    pub kind: EnquiryKind,
    pub subject: EnquirySubject,
    pub counterparties: Counterparties,
    pub assigned_agent: Option<Uuid>,
    pub stage: EnquiryStage,
    pub status: EnquiryStatus,
    pub(crate) valuation_match_percent: Option<u8>,
    pub closure_reason: Option<String>,
    pub history: Vec<StatusTransition>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Enquiry {
    pub fn valuation_match_percent(&self) -> Option<u8> {
        self.valuation_match_percent
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn buyer(&self) -> Option<&Party> {
        self.counterparties.buyer()
    }

    pub fn seller(&self) -> Option<&Party> {
        self.counterparties.seller()
    }

    pub fn properties(&self) -> Vec<&PropertyDetails> {
        match &self.subject {
            EnquirySubject::Single { property } => vec![property],
            EnquirySubject::Exchange { offered, received } => vec![offered, received],
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
