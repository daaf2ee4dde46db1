//! Statistical summaries for evolution telemetry.
//!
//! Currently a single module:
//!
//! - [`descriptive`]: min/max/mean/median/standard-deviation summaries,
//!   used for per-generation fitness reporting.
//!
//! # Example
//!
//! ```
//! use evotrack_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```

pub mod descriptive;
