pub mod dashboard;
pub mod ticker;

pub use dashboard::{Dashboard, Toast};
pub use ticker::{MarketTicker, TickerHandle};
