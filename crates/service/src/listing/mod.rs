//! Cashbox listing: domain types, page parser and the orchestrating service.

pub mod domain;
pub mod errors;
pub mod parser;
pub mod service;

pub use service::ListingService;
