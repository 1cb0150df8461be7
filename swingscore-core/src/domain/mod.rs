//! Domain types for the scoring engine.

pub mod bar;

pub use bar::PriceBar;
