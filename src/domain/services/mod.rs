//! Domain Services
//!
//! Pure functions over fetched data and recorded results.

mod overlap;
mod summary;

pub use overlap::{principal_overlap, Overlap};
pub use summary::{CategoryCounts, RunSummary};
