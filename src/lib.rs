//! Enquiry desk for a property marketplace: buy, sell and exchange enquiries, their stage
//! pipeline, status lifecycle and exchange valuation matching, kept in memory.
pub mod config;
pub mod db;
pub mod dtos;
pub mod models;
pub mod service;
pub mod utils;

pub use config::{init_tracing, Config};
pub use db::enquirydb::{EnquiryExt, EnquiryStore};
pub use dtos::enquirydtos::{
    CloseEnquiryDto, CreateEnquiryDto, EnquiryFilter, PartyInput, PropertyInput, PropertySide,
};
pub use models::{
    agentmodel::{Agent, ReferenceData},
    enquirymodel::{
        ClosureOutcome, Enquiry, EnquiryKind, EnquiryStage, EnquiryStatus, Money, Party,
        PropertyDetails,
    },
};
pub use service::{
    enquiry_factory::EnquiryFactory,
    enquiry_service::{EnquirySummary, EnquiryService},
    error::ServiceError,
    lifecycle::EnquiryLifecycle,
    stage_tracker::{StageProgress, StageTracker},
    valuation::{decimal_match, valuation_match, ValuationError},
};
