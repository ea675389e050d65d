//! Spot price quote service
//!
//! Fetches gold and silver spot prices from the provider's
//! currency-exchange-rate endpoint:
//!
//! GET <base>/query?function=CURRENCY_EXCHANGE_RATE&from_currency=XAU&to_currency=USD&apikey=<KEY>
//!
//! The response nests a string-encoded numeric rate:
//!
//! {"Realtime Currency Exchange Rate": {"5. Exchange Rate": "2400.5000", ...}}
//!
//! One request per tracked metal per refresh. No retry, no caching, no
//! rate-limit handling.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::config::ProviderConfig;
use crate::models::{DashboardBoard, Quote, QuoteEntry};

/// Tracked metals: (ticker, display name). Prices are quoted in USD per
/// troy ounce.
pub const TRACKED_METALS: [(&str, &str); 2] = [("XAU", "Gold"), ("XAG", "Silver")];

/// Name of the environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// Errors produced by the quote fetcher.
///
/// `NotConfigured` is not a failure: it selects the setup-instructions
/// rendering path and is returned before any request is built. The
/// remaining variants are fetch failures carrying their underlying cause.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// No provider API key is set; no network call was attempted.
    #[error("quote provider API key is not configured")]
    NotConfigured,

    /// The requested ticker is not one of the tracked metals.
    #[error("unknown ticker symbol: {0}")]
    UnknownSymbol(String),

    /// Invalid provider base URL in the configuration.
    #[error("invalid provider URL: {0}")]
    BadUrl(#[from] url::ParseError),

    /// Network-level failure (connect, timeout, body read).
    #[error("quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx HTTP status from the provider.
    #[error("quote provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The provider answered 200 but with a throttle note or an error
    /// message instead of a rate.
    #[error("quote provider rejected the request: {0}")]
    Provider(String),

    /// The body could not be interpreted as a quote.
    #[error("malformed quote response: {0}")]
    Malformed(String),
}

impl QuoteError {
    /// True for the instructions path (missing key), false for real failures.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, QuoteError::NotConfigured)
    }
}

/// Resolve a ticker to its canonical (symbol, name) pair, case-insensitively.
pub fn lookup_metal(symbol: &str) -> Option<(&'static str, &'static str)> {
    TRACKED_METALS
        .iter()
        .copied()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
}

/// Setup text shown when no API key is present.
pub fn setup_instructions() -> String {
    format!(
        "No quote provider API key is configured. Get a free key at \
         https://www.alphavantage.co/support/#api-key and export it as {} \
         before starting the server. Avoid rapid refreshes: the free tier \
         is rate limited.",
        API_KEY_ENV
    )
}

/// Quote fetching service
///
/// Holds the shared HTTP client, the provider base URL and the optional
/// API key resolved at startup.
pub struct QuoteService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl QuoteService {
    /// Build the service from the provider configuration and the resolved
    /// API key (`None` means "not configured").
    pub fn new(provider: &ProviderConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(provider.timeout_secs))
            .connect_timeout(Duration::from_secs(provider.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Whether a provider API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the current spot price for one tracked metal.
    ///
    /// Returns `NotConfigured` without building a request when no key is
    /// set; the checks run in order unknown-symbol, missing-key, network.
    pub async fn fetch_spot(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let (symbol, name) =
            lookup_metal(symbol).ok_or_else(|| QuoteError::UnknownSymbol(symbol.to_string()))?;

        let api_key = self.api_key.as_deref().ok_or(QuoteError::NotConfigured)?;

        let url = Url::parse_with_params(
            &format!("{}/query", self.base_url),
            &[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", symbol),
                ("to_currency", "USD"),
                ("apikey", api_key),
            ],
        )?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_exchange_rate(symbol, name, &body)
    }

    /// Fetch all tracked metals and fold the results into one board.
    ///
    /// Metals are fetched independently: a failure for one is logged and
    /// rendered inline, the other still gets its price.
    pub async fn fetch_board(&self) -> DashboardBoard {
        if !self.is_configured() {
            return DashboardBoard {
                configured: false,
                instructions: Some(setup_instructions()),
                quotes: Vec::new(),
                gold_silver_ratio: None,
            };
        }

        let mut results = Vec::new();
        for (symbol, name) in TRACKED_METALS {
            let result = self.fetch_spot(symbol).await;
            if let Err(ref e) = result {
                log::warn!("fetching {} failed: {}", symbol, e);
            }
            results.push((symbol, name, result));
        }

        board_from_results(results)
    }
}

/// Parse the provider's exchange-rate body into a `Quote`.
///
/// Never panics on bad input; every defect in the body maps to a
/// `QuoteError` variant. Throttle notes and error messages arrive as
/// HTTP 200 with a different top-level key.
pub fn parse_exchange_rate(symbol: &str, name: &str, body: &str) -> Result<Quote, QuoteError> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| QuoteError::Malformed(format!("invalid JSON: {}", e)))?;

    for key in ["Note", "Information", "Error Message"] {
        if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
            return Err(QuoteError::Provider(msg.to_string()));
        }
    }

    let rate = json.get("Realtime Currency Exchange Rate").ok_or_else(|| {
        QuoteError::Malformed("missing \"Realtime Currency Exchange Rate\" object".to_string())
    })?;

    let price = rate
        .get("5. Exchange Rate")
        .and_then(|v| v.as_str())
        .ok_or_else(|| QuoteError::Malformed("missing \"5. Exchange Rate\" field".to_string()))?
        .trim()
        .parse::<f64>()
        .map_err(|e| QuoteError::Malformed(format!("non-numeric exchange rate: {}", e)))?;

    // Price is non-negative when present
    if !price.is_finite() || price < 0.0 {
        return Err(QuoteError::Malformed(format!(
            "exchange rate out of range: {}",
            price
        )));
    }

    let bid = parse_optional_price(rate, "8. Bid Price");
    let ask = parse_optional_price(rate, "9. Ask Price");

    Ok(Quote {
        symbol: symbol.to_uppercase(),
        name: name.to_string(),
        price,
        currency: "USD".to_string(),
        bid,
        ask,
        retrieved_at: Utc::now().to_rfc3339(),
    })
}

fn parse_optional_price(rate: &serde_json::Value, key: &str) -> Option<f64> {
    rate.get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Fold per-metal fetch results into a board.
///
/// Pure aggregation: computes the gold/silver ratio when both sides
/// produced a price and silver is non-zero.
pub fn board_from_results(
    results: Vec<(&str, &str, Result<Quote, QuoteError>)>,
) -> DashboardBoard {
    let quotes: Vec<QuoteEntry> = results
        .into_iter()
        .map(|(symbol, name, result)| match result {
            Ok(quote) => QuoteEntry {
                symbol: symbol.to_string(),
                name: name.to_string(),
                quote: Some(quote),
                error: None,
            },
            Err(e) => QuoteEntry {
                symbol: symbol.to_string(),
                name: name.to_string(),
                quote: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let price_of = |symbol: &str| {
        quotes
            .iter()
            .find(|entry| entry.symbol == symbol)
            .and_then(|entry| entry.quote.as_ref())
            .map(|quote| quote.price)
    };

    let gold_silver_ratio = match (price_of("XAU"), price_of("XAG")) {
        (Some(gold), Some(silver)) if silver > 0.0 => Some(gold / silver),
        _ => None,
    };

    DashboardBoard {
        configured: true,
        instructions: None,
        quotes,
        gold_silver_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_body(rate: &str) -> String {
        format!(
            r#"{{
                "Realtime Currency Exchange Rate": {{
                    "1. From_Currency Code": "XAU",
                    "2. From_Currency Name": "Gold Ounce",
                    "3. To_Currency Code": "USD",
                    "4. To_Currency Name": "United States Dollar",
                    "5. Exchange Rate": "{}",
                    "6. Last Refreshed": "2026-08-28 14:30:01",
                    "7. Time Zone": "UTC",
                    "8. Bid Price": "2400.3000",
                    "9. Ask Price": "2400.7000"
                }}
            }}"#,
            rate
        )
    }

    fn test_provider() -> ProviderConfig {
        // Port 9 (discard) so any accidental request fails fast instead of
        // hitting the real provider.
        ProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: String::new(),
            timeout_secs: 1,
            connect_timeout_secs: 1,
        }
    }

    #[test]
    fn test_parse_success() {
        let quote = parse_exchange_rate("XAU", "Gold", &rate_body("2400.5000")).unwrap();

        assert_eq!(quote.symbol, "XAU");
        assert_eq!(quote.name, "Gold");
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.price, 2400.50);
        assert_eq!(format!("{:.2}", quote.price), "2400.50");
        assert_eq!(quote.bid, Some(2400.30));
        assert_eq!(quote.ask, Some(2400.70));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let body = rate_body("2400.5000");
        let first = parse_exchange_rate("XAU", "Gold", &body).unwrap();
        let second = parse_exchange_rate("XAU", "Gold", &body).unwrap();

        assert_eq!(first.price, second.price);
        assert_eq!(first.bid, second.bid);
        assert_eq!(first.ask, second.ask);
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_exchange_rate("XAU", "Gold", "<html>not json</html>");
        assert!(matches!(result, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_parse_missing_rate_object() {
        let result = parse_exchange_rate("XAU", "Gold", r#"{"unexpected": {}}"#);
        assert!(matches!(result, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_parse_missing_rate_field() {
        let body = r#"{"Realtime Currency Exchange Rate": {"1. From_Currency Code": "XAU"}}"#;
        let result = parse_exchange_rate("XAU", "Gold", body);
        assert!(matches!(result, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_parse_non_numeric_rate() {
        let result = parse_exchange_rate("XAU", "Gold", &rate_body("n/a"));
        assert!(matches!(result, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_parse_negative_rate() {
        let result = parse_exchange_rate("XAU", "Gold", &rate_body("-1.0"));
        assert!(matches!(result, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_parse_throttle_note() {
        let body = r#"{"Note": "Thank you for using our API. Our standard API rate limit is 25 requests per day."}"#;
        let result = parse_exchange_rate("XAU", "Gold", body);
        assert!(matches!(result, Err(QuoteError::Provider(_))));
    }

    #[test]
    fn test_parse_bad_bid_keeps_price() {
        // Optional fields degrade to None instead of failing the quote
        let body = r#"{"Realtime Currency Exchange Rate": {"5. Exchange Rate": "30.1200", "8. Bid Price": "??"}}"#;
        let quote = parse_exchange_rate("XAG", "Silver", body).unwrap();
        assert_eq!(quote.price, 30.12);
        assert_eq!(quote.bid, None);
        assert_eq!(quote.ask, None);
    }

    #[test]
    fn test_lookup_metal() {
        assert_eq!(lookup_metal("XAU"), Some(("XAU", "Gold")));
        assert_eq!(lookup_metal("xag"), Some(("XAG", "Silver")));
        assert_eq!(lookup_metal("HG"), None);
    }

    #[test]
    fn test_board_one_failure_does_not_block_the_other() {
        let gold = parse_exchange_rate("XAU", "Gold", &rate_body("2400.5000")).unwrap();
        let board = board_from_results(vec![
            ("XAU", "Gold", Ok(gold)),
            ("XAG", "Silver", Err(QuoteError::Status(reqwest::StatusCode::BAD_GATEWAY))),
        ]);

        assert!(board.configured);
        assert_eq!(board.quotes.len(), 2);

        let gold_entry = &board.quotes[0];
        assert_eq!(gold_entry.quote.as_ref().unwrap().price, 2400.50);
        assert!(gold_entry.error.is_none());

        let silver_entry = &board.quotes[1];
        assert!(silver_entry.quote.is_none());
        assert!(silver_entry.error.as_ref().unwrap().contains("502"));

        assert!(board.gold_silver_ratio.is_none());
    }

    #[test]
    fn test_board_ratio() {
        let gold = parse_exchange_rate("XAU", "Gold", &rate_body("2400.0000")).unwrap();
        let silver = parse_exchange_rate("XAG", "Silver", &rate_body("30.0000")).unwrap();
        let board = board_from_results(vec![
            ("XAU", "Gold", Ok(gold)),
            ("XAG", "Silver", Ok(silver)),
        ]);

        assert_eq!(board.gold_silver_ratio, Some(80.0));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits_before_any_request() {
        // base_url points at the discard port: if the service attempted a
        // request we would see Request(_) here, not NotConfigured.
        let service = QuoteService::new(&test_provider(), None).unwrap();

        let result = service.fetch_spot("XAU").await;
        let err = result.unwrap_err();
        assert!(matches!(err, QuoteError::NotConfigured));
        assert!(err.is_not_configured());

        let board = service.fetch_board().await;
        assert!(!board.configured);
        assert!(board.quotes.is_empty());
        assert!(board.instructions.unwrap().contains(API_KEY_ENV));
    }

    #[tokio::test]
    async fn test_unknown_symbol_rejected_before_config_check() {
        let service = QuoteService::new(&test_provider(), None).unwrap();
        let result = service.fetch_spot("HG").await;
        assert!(matches!(result, Err(QuoteError::UnknownSymbol(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_a_fetch_failure() {
        let service =
            QuoteService::new(&test_provider(), Some("demo".to_string())).unwrap();
        let result = service.fetch_spot("XAU").await;
        assert!(matches!(result, Err(QuoteError::Request(_))));
    }
}
