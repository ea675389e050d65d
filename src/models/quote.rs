//! Quote data models
//!
//! Defines the structures rendered by the dashboard:
//! - single spot price observations
//! - per-metal render results
//! - the aggregated board for one render cycle

use serde::{Deserialize, Serialize};

/// A single spot price observation for one ticker.
///
/// A quote exists only for the duration of one render cycle; nothing is
/// persisted between refreshes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quote {
    /// Ticker symbol (XAU, XAG)
    pub symbol: String,
    /// Display name (Gold, Silver)
    pub name: String,
    /// Spot price in USD per troy ounce
    pub price: f64,
    /// Quote currency, always "USD"
    pub currency: String,
    /// Provider bid price, when reported
    pub bid: Option<f64>,
    /// Provider ask price, when reported
    pub ask: Option<f64>,
    /// Retrieval timestamp (RFC 3339, UTC)
    pub retrieved_at: String,
}

/// Per-metal outcome of one render pass.
///
/// A failed fetch for one metal is carried here as an inline message and
/// never suppresses the other metal's entry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuoteEntry {
    /// Ticker symbol
    pub symbol: String,
    /// Display name
    pub name: String,
    /// The quote, when the fetch succeeded
    pub quote: Option<Quote>,
    /// Inline error message, when it did not
    pub error: Option<String>,
}

/// Aggregated dashboard state for one render cycle.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DashboardBoard {
    /// Whether a provider API key is configured
    pub configured: bool,
    /// Setup instructions, present only when not configured
    pub instructions: Option<String>,
    /// One entry per tracked metal (empty when not configured)
    pub quotes: Vec<QuoteEntry>,
    /// Gold price divided by silver price, when both are available
    pub gold_silver_ratio: Option<f64>,
}
