//! Analysis modules.
//!
//! Pure aggregation over a round's submissions.

pub mod aggregator;

pub use aggregator::*;
