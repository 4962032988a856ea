// Market data domain
pub mod bar;

pub use bar::{Bar, BarSeries, normalize_ticker};
