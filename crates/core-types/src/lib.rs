//! # GBCE Core Types
//!
//! Leaf data for the exchange: the reference data of a listed `Stock` with its
//! pricing formulas, and the immutable `Trade` record. This crate knows nothing
//! about the trade log or about concurrency.

pub mod enums;
pub mod error;
pub mod precision;
pub mod stock;
pub mod symbol;
pub mod trade;

// Re-export the core types to provide a clean public API.
pub use enums::{StockType, TradeSide};
pub use error::CoreError;
pub use precision::{round_price, PRICE_DP};
pub use stock::Stock;
pub use symbol::Symbol;
pub use trade::Trade;
