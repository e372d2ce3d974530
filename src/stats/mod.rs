//! Bootstrap confidence intervals over grouped table columns.
//!
//! ```text
//!   Table ──group by──► Vec<f64> per group
//!                          │
//!                          ▼
//!                   ┌────────────┐
//!                   │ bootstrap  │  resample, statistic, percentiles
//!                   └────────────┘
//!                          │
//!                          ▼
//!                   Vec<CiRow>  (group, stat, low, high)
//! ```

pub mod bootstrap;
pub mod summary;

pub use bootstrap::{bootstrap_ci, mean, percentile, Interval};
pub use summary::{quick_ci, quick_ci_with, CiOptions, CiRow, StatsError};

/// Default significance level: a 95% interval.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default number of bootstrap resamples per group.
pub const DEFAULT_RESAMPLES: usize = 200;
