//! Domain types: dates, tenors and compounding.

mod compounding;
mod date;
mod period;

pub use compounding::Compounding;
pub use date::Date;
pub use period::{Period, TimeUnit};
