pub mod agentmodel;
pub mod enquirymodel;
