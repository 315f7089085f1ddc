//! # GBCE Exchange
//!
//! This crate owns the live state of the exchange: the stock catalog and the
//! append-only trade log. It derives the windowed metrics (VWSP and the
//! all-share index) from that state.
//!
//! ## Architectural Principles
//!
//! - **Owned Aggregate:** `Exchange` is the only holder of the catalog and the log.
//!   Every accessor hands out clones, so no caller can alias internal state.
//! - **Short Critical Sections:** Writers hold a guard only for a single insert or
//!   push. Readers copy what they need under a read guard and compute outside it.
//! - **Decimal Everywhere:** Money stays in `rust_decimal::Decimal`. The only float
//!   arithmetic is the log/exp step of the geometric mean, isolated in `index`.
//!
//! ## Public API
//!
//! - `Exchange`: the thread-safe catalog and trade log.
//! - `ExchangeSettings`: runtime knobs, deserializable from configuration.
//! - `StockMetrics`: per-stock summary priced at the VWSP.
//! - `ExchangeError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod exchange;
pub mod index;
pub mod metrics;
pub mod settings;

// Re-export the key components to provide a clean, public-facing API.
pub use error::ExchangeError;
pub use exchange::Exchange;
pub use index::geometric_mean;
pub use metrics::StockMetrics;
pub use settings::ExchangeSettings;
