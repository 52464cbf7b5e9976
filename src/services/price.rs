//! Synthetic price quotes with a shared TTL cache.
//!
//! There is no market-data upstream: a quote is drawn uniformly from
//! [1000, 4000] INR on cache miss and stays fixed for the TTL window, so
//! every caller sees the same price for a symbol until it expires.

use crate::error::{AppError, Result};
use crate::services::kv::TtlStore;
use crate::types::PriceQuote;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

const PRICE_PREFIX: &str = "stocky:price:";

/// Bounds for synthetic prices, in INR.
pub const MIN_PRICE_INR: f64 = 1000.0;
pub const MAX_PRICE_INR: f64 = 4000.0;

/// Serves stock price quotes from the shared cache, synthesizing on miss.
pub struct PriceService {
    store: Arc<dyn TtlStore>,
    ttl: Duration,
    rng: Mutex<StdRng>,
}

impl PriceService {
    /// Create a price service over the given store with the given TTL.
    pub fn new(store: Arc<dyn TtlStore>, ttl: Duration) -> Self {
        Self::with_rng(store, ttl, StdRng::from_entropy())
    }

    /// Create a price service with a seeded generator (deterministic tests).
    pub fn with_rng(store: Arc<dyn TtlStore>, ttl: Duration, rng: StdRng) -> Self {
        Self {
            store,
            ttl,
            rng: Mutex::new(rng),
        }
    }

    /// Get the current quote for a symbol.
    ///
    /// A live cached quote is returned verbatim. On miss or expiry a new
    /// price is synthesized, cached with the TTL, and returned. The cache
    /// write is best-effort: a store failure is logged and the quote is
    /// still returned, at the cost of a missed future hit. Store read
    /// failures are treated as a miss.
    pub async fn get_quote(&self, symbol: &str) -> Result<PriceQuote> {
        let key = format!("{}{}", PRICE_PREFIX, symbol);

        match self.store.get(&key).await {
            Ok(Some(raw)) => {
                if let Ok(quote) = serde_json::from_str::<PriceQuote>(&raw) {
                    return Ok(quote);
                }
                debug!("Discarding unreadable cached quote for {}", symbol);
            }
            Ok(None) => {}
            Err(e) => warn!("Price cache read failed for {}: {}", symbol, e),
        }

        let price = {
            let mut rng = self.rng.lock().unwrap();
            rng.gen_range(MIN_PRICE_INR..MAX_PRICE_INR)
        };
        let quote = PriceQuote {
            symbol: symbol.to_string(),
            price,
        };

        let raw = serde_json::to_string(&quote)
            .map_err(|e| AppError::Pricing(format!("failed to encode quote: {}", e)))?;
        if let Err(e) = self.store.set(&key, &raw, self.ttl).await {
            warn!("Price cache write failed for {}: {}", symbol, e);
        }

        Ok(quote)
    }
}
