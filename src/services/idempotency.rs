//! Duplicate detection for reward-creation requests.
//!
//! Callers run a two-phase pattern: `check_or_set(key, None)` before the
//! side effect to detect a repeat, then `check_or_set(key, Some(reward))`
//! after success to record the outcome for later duplicates. A concurrent
//! duplicate arriving between the two calls is not detected; closing that
//! window would need an atomic reserve (Redis SET NX) instead of the
//! separate get/set used here.

use crate::services::kv::TtlStore;
use crate::types::Reward;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const IDEMPOTENCY_PREFIX: &str = "stocky:idem:";
const IDEMPOTENCY_TTL: Duration = Duration::from_secs(3600);

/// Maps client-supplied idempotency keys to recorded reward responses.
pub struct IdempotencyService {
    store: Arc<dyn TtlStore>,
}

impl IdempotencyService {
    pub fn new(store: Arc<dyn TtlStore>) -> Self {
        Self { store }
    }

    /// Returns `true` if `key` was already recorded (the caller must not
    /// re-execute the operation). Otherwise records `response`, when given,
    /// under the key with a 1-hour expiry and returns `false`.
    ///
    /// Store errors fail open: a broken cache never blocks a new attempt,
    /// trading strict deduplication for availability.
    pub async fn check_or_set(&self, key: &str, response: Option<&Reward>) -> bool {
        let full_key = format!("{}{}", IDEMPOTENCY_PREFIX, key);

        match self.store.get(&full_key).await {
            Ok(Some(value)) if !value.is_empty() => return true,
            Ok(_) => {}
            Err(e) => warn!("Idempotency check failed for {}: {}; allowing request", key, e),
        }

        if let Some(reward) = response {
            match serde_json::to_string(reward) {
                Ok(raw) => {
                    if let Err(e) = self.store.set(&full_key, &raw, IDEMPOTENCY_TTL).await {
                        warn!("Failed to record idempotency key {}: {}", key, e);
                    }
                }
                Err(e) => warn!("Failed to encode reward for idempotency key {}: {}", key, e),
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::kv::{MemoryKv, TtlStore};
    use chrono::Utc;

    fn reward(id: i64) -> Reward {
        Reward {
            id,
            user_id: 1,
            stock_symbol: "TCS".to_string(),
            quantity: 1.0,
            rewarded_at: Utc::now(),
        }
    }

    fn service() -> IdempotencyService {
        IdempotencyService::new(Arc::new(MemoryKv::new()))
    }

    #[tokio::test]
    async fn test_reservation_only_does_not_block_retries() {
        let service = service();

        // A check with no response stores nothing, so a retry is not a duplicate.
        assert!(!service.check_or_set("key-1", None).await);
        assert!(!service.check_or_set("key-1", None).await);
    }

    #[tokio::test]
    async fn test_recorded_response_flags_duplicate() {
        let service = service();

        assert!(!service.check_or_set("key-2", Some(&reward(10))).await);
        assert!(service.check_or_set("key-2", Some(&reward(11))).await);
    }

    #[tokio::test]
    async fn test_duplicate_does_not_overwrite() {
        let kv = Arc::new(MemoryKv::new());
        let service = IdempotencyService::new(kv.clone());

        service.check_or_set("key-3", Some(&reward(10))).await;
        service.check_or_set("key-3", Some(&reward(99))).await;

        let raw = kv.get("stocky:idem:key-3").await.unwrap().unwrap();
        let stored: Reward = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.id, 10);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let service = service();

        assert!(!service.check_or_set("key-4", Some(&reward(1))).await);
        assert!(!service.check_or_set("key-5", Some(&reward(2))).await);
        assert!(service.check_or_set("key-4", None).await);
    }
}
