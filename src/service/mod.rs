pub mod enquiry_factory;
pub mod enquiry_service;
pub mod error;
pub mod lifecycle;
pub mod stage_tracker;
pub mod valuation;
