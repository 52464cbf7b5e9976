pub mod idempotency;
pub mod kv;
pub mod ledger;
pub mod price;
pub mod referrals;
pub mod refresher;
pub mod rewards;
pub mod users;

pub use idempotency::IdempotencyService;
pub use kv::{KvError, MemoryKv, RedisKv, TtlStore};
pub use ledger::LedgerStore;
pub use price::PriceService;
pub use referrals::ReferralService;
pub use refresher::{refresh_held_symbols, spawn_price_refresher};
pub use rewards::{RewardService, REWARDABLE_SYMBOLS};
pub use users::UserService;
