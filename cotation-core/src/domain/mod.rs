//! Domain types for the indicator engine.

pub mod interval;
pub mod quote;
pub mod series;

pub use interval::{Horizon, Interval, IntervalError};
pub use quote::Quote;
pub use series::{Column, Series};

/// Symbol type alias
pub type Symbol = String;
