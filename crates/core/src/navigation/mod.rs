//! Navigation side effects

pub mod ports;

pub use ports::{Navigator, NoopNavigator};
