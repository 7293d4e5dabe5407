pub mod enquirydb;
