//! Periodic re-priming of cached prices for all held symbols.

use crate::services::ledger::LedgerStore;
use crate::services::price::PriceService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Spawn the recurring refresh task. Runs until process shutdown.
///
/// Each tick re-primes every symbol currently referenced by a reward,
/// going through the same `get_quote` path as request handlers.
pub fn spawn_price_refresher(
    prices: Arc<PriceService>,
    ledger: Arc<LedgerStore>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first interval tick fires immediately; skip it so the first
        // refresh happens one full interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            refresh_held_symbols(&prices, &ledger).await;
        }
    })
}

/// One refresh cycle: enumerate distinct rewarded symbols and price each.
///
/// A ledger error aborts this cycle only; a single symbol's pricing
/// failure is logged and skipped.
pub async fn refresh_held_symbols(prices: &PriceService, ledger: &LedgerStore) {
    info!("Starting stock price refresh");

    let symbols = match ledger.distinct_symbols() {
        Ok(symbols) => symbols,
        Err(e) => {
            error!("Failed to enumerate held symbols, aborting cycle: {}", e);
            return;
        }
    };

    let mut refreshed = 0usize;
    for symbol in &symbols {
        match prices.get_quote(symbol).await {
            Ok(quote) => {
                refreshed += 1;
                tracing::debug!("Refreshed {} -> {:.2} INR", symbol, quote.price);
            }
            Err(e) => warn!("Failed to refresh price for {}: {}", symbol, e),
        }
    }

    info!("Price refresh completed: {}/{} symbols", refreshed, symbols.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::kv::{MemoryKv, TtlStore};
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn test_refresh_primes_all_held_symbols() {
        let kv = Arc::new(MemoryKv::new());
        let prices = PriceService::with_rng(
            kv.clone(),
            Duration::from_secs(600),
            StdRng::seed_from_u64(3),
        );
        let ledger = LedgerStore::new_in_memory().unwrap();
        ledger.insert_reward(1, "TCS", 1.0, Utc::now()).unwrap();
        ledger.insert_reward(2, "INFY", 2.0, Utc::now()).unwrap();

        refresh_held_symbols(&prices, &ledger).await;

        assert!(kv.get("stocky:price:TCS").await.unwrap().is_some());
        assert!(kv.get("stocky:price:INFY").await.unwrap().is_some());
        assert!(kv.get("stocky:price:HDFC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_with_empty_ledger_is_a_no_op() {
        let kv = Arc::new(MemoryKv::new());
        let prices =
            PriceService::with_rng(kv, Duration::from_secs(600), StdRng::seed_from_u64(4));
        let ledger = LedgerStore::new_in_memory().unwrap();

        // Must not panic or prime anything.
        refresh_held_symbols(&prices, &ledger).await;
    }

    #[tokio::test]
    async fn test_primed_quotes_lapse_after_ttl() {
        let kv = Arc::new(MemoryKv::new());
        let prices = PriceService::with_rng(
            kv.clone(),
            Duration::from_millis(10),
            StdRng::seed_from_u64(6),
        );
        let ledger = LedgerStore::new_in_memory().unwrap();
        ledger.insert_reward(1, "ICICIBANK", 1.0, Utc::now()).unwrap();

        refresh_held_symbols(&prices, &ledger).await;
        assert!(kv.get("stocky:price:ICICIBANK").await.unwrap().is_some());

        // A refresher-primed quote is never served past its TTL, so with a
        // 1-hour refresh interval and 10-minute TTL every cycle regenerates.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(kv.get("stocky:price:ICICIBANK").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresher_reaffirms_live_quotes() {
        let kv = Arc::new(MemoryKv::new());
        let prices = Arc::new(PriceService::with_rng(
            kv,
            Duration::from_secs(600),
            StdRng::seed_from_u64(5),
        ));
        let ledger = LedgerStore::new_in_memory().unwrap();
        ledger.insert_reward(1, "HDFC", 1.0, Utc::now()).unwrap();

        let before = prices.get_quote("HDFC").await.unwrap();
        refresh_held_symbols(&prices, &ledger).await;
        let after = prices.get_quote("HDFC").await.unwrap();

        // Within the TTL the refresher goes through the same cache path,
        // so the price is unchanged.
        assert_eq!(before, after);
    }
}
