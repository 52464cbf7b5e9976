pub mod price;
pub mod referral;
pub mod reward;
pub mod user;

pub use price::PriceQuote;
pub use referral::{ReferRequest, ReferResponse, Referral};
pub use reward::{
    DailyValue, HistoricalInrResponse, PortfolioResponse, Reward, RewardRequest,
    TodayRewardsResponse, UserStatsResponse,
};
pub use user::{RegisterRequest, RegisterResponse, User};
