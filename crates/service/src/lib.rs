//! Service layer of the cashbox listing gateway.
//! - `console`: HTTP client side of the point-of-sale console (login, listing download).
//! - `listing`: domain types, page parsing and the request-scoped orchestration.

pub mod console;
pub mod listing;
