//! Business logic services
//!
//! Wraps upstream data fetching and aggregation.

pub mod quote_service; // spot price fetching
