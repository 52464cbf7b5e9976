use serde::{Deserialize, Serialize};

/// A synthesized price for a stock symbol, valid until its cache TTL lapses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    /// Price in INR.
    pub price: f64,
}
