//! Reward issuance and ledger read paths.
//!
//! Valuation is always done against the current cached price, never the
//! price at reward time; issuance only checks that a symbol is priceable
//! and does not persist the quote.

use crate::error::{AppError, Result};
use crate::services::ledger::LedgerStore;
use crate::services::price::PriceService;
use crate::types::{DailyValue, Reward, RewardRequest};
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Symbols eligible for randomly-assigned rewards.
pub const REWARDABLE_SYMBOLS: [&str; 5] = ["RELIANCE", "TCS", "INFY", "HDFC", "ICICIBANK"];

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Reference time zone for calendar-day windows (Indian Standard Time).
fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap()
}

/// Start of the IST calendar day containing `now`, as a UTC instant.
fn ist_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now
        .with_timezone(&ist())
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_local_timezone(ist())
        .unwrap();
    midnight.with_timezone(&Utc)
}

/// Value of a holding in INR, rounded half-up at the cent.
///
/// The multiplication runs through `Decimal` so that e.g. 3 x 1000.005
/// lands on 3000.02 rather than picking up binary float error.
fn rupee_value(quantity: f64, price: f64) -> f64 {
    match (Decimal::from_f64(quantity), Decimal::from_f64(price)) {
        (Some(q), Some(p)) => (q * p)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(quantity * price),
        _ => ((quantity * price) * 100.0).round() / 100.0,
    }
}

/// Issues rewards and serves the aggregate views over the ledger.
pub struct RewardService {
    ledger: Arc<LedgerStore>,
    prices: Arc<PriceService>,
    rng: Mutex<StdRng>,
}

impl RewardService {
    pub fn new(ledger: Arc<LedgerStore>, prices: Arc<PriceService>) -> Self {
        Self::with_rng(ledger, prices, StdRng::from_entropy())
    }

    /// Construct with a seeded generator for deterministic symbol selection.
    pub fn with_rng(ledger: Arc<LedgerStore>, prices: Arc<PriceService>, rng: StdRng) -> Self {
        Self {
            ledger,
            prices,
            rng: Mutex::new(rng),
        }
    }

    /// Create and persist a reward.
    ///
    /// An empty/absent symbol is replaced by a uniform pick from
    /// [`REWARDABLE_SYMBOLS`]. The symbol must be priceable before the
    /// insert; the quote itself is discarded.
    pub async fn create_reward(&self, req: RewardRequest) -> Result<Reward> {
        if req.quantity <= 0.0 {
            return Err(AppError::Validation("quantity must be positive".to_string()));
        }

        let symbol = match req.symbol.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                let mut rng = self.rng.lock().unwrap();
                REWARDABLE_SYMBOLS[rng.gen_range(0..REWARDABLE_SYMBOLS.len())].to_string()
            }
        };

        self.prices.get_quote(&symbol).await?;

        let rewarded_at = Utc::now();
        let id = self
            .ledger
            .insert_reward(req.user_id, &symbol, req.quantity, rewarded_at)?;

        Ok(Reward {
            id,
            user_id: req.user_id,
            stock_symbol: symbol,
            quantity: req.quantity,
            rewarded_at,
        })
    }

    /// Rewards granted today (IST), most recent first.
    pub fn today_rewards(&self, user_id: i64) -> Result<Vec<Reward>> {
        let start = ist_day_start(Utc::now());
        let end = start + ChronoDuration::days(1);
        let rewards =
            self.ledger
                .rewards_between(user_id, start.timestamp_millis(), end.timestamp_millis())?;
        Ok(rewards)
    }

    /// INR value per past IST calendar day, valued at current prices and
    /// sorted by date ascending. A symbol whose price lookup fails is
    /// skipped; its day still appears with the remaining contributions.
    pub async fn historical_inr(&self, user_id: i64) -> Result<Vec<DailyValue>> {
        let today_start = ist_day_start(Utc::now());
        let rewards = self
            .ledger
            .rewards_before(user_id, today_start.timestamp_millis())?;

        let mut prices: HashMap<String, Option<f64>> = HashMap::new();
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for reward in &rewards {
            let date = reward.rewarded_at.with_timezone(&ist()).date_naive();
            let entry = totals.entry(date).or_insert(0.0);

            let price = match prices.get(&reward.stock_symbol) {
                Some(cached) => *cached,
                None => {
                    let fetched = match self.prices.get_quote(&reward.stock_symbol).await {
                        Ok(quote) => Some(quote.price),
                        Err(e) => {
                            warn!(
                                "Skipping {} in historical valuation: {}",
                                reward.stock_symbol, e
                            );
                            None
                        }
                    };
                    prices.insert(reward.stock_symbol.clone(), fetched);
                    fetched
                }
            };

            if let Some(price) = price {
                *entry += reward.quantity * price;
            }
        }

        Ok(totals
            .into_iter()
            .map(|(date, total_inr)| DailyValue { date, total_inr })
            .collect())
    }

    /// Today's per-symbol quantity sums plus the all-time portfolio value.
    /// Each symbol's contribution is rounded to the cent before summation.
    pub async fn user_stats(&self, user_id: i64) -> Result<(BTreeMap<String, f64>, f64)> {
        let start = ist_day_start(Utc::now());
        let end = start + ChronoDuration::days(1);

        let today_summary: BTreeMap<String, f64> = self
            .ledger
            .symbol_totals_between(user_id, start.timestamp_millis(), end.timestamp_millis())?
            .into_iter()
            .collect();

        let mut portfolio_value = 0.0;
        for (symbol, quantity) in self.ledger.symbol_totals_all(user_id)? {
            match self.prices.get_quote(&symbol).await {
                Ok(quote) => portfolio_value += rupee_value(quantity, quote.price),
                Err(e) => warn!("Skipping {} in portfolio valuation: {}", symbol, e),
            }
        }

        Ok((today_summary, portfolio_value))
    }

    /// Per-symbol held quantities, without valuation.
    pub fn portfolio(&self, user_id: i64) -> Result<BTreeMap<String, f64>> {
        let holdings = self
            .ledger
            .symbol_totals_all(user_id)?
            .into_iter()
            .collect();
        Ok(holdings)
    }
}
