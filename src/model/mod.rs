pub mod candle;
pub mod horizon;
pub mod window;

pub use candle::Candle;
pub use horizon::{Granularity, Horizon};
pub use window::{MarketSnapshot, PriceWindow, DEFAULT_LOOKBACK};
