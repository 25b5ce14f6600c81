//! Core data types for fetch results, versions, and scan reports.
//!
//! This module contains the fundamental types used throughout wpscout:
//!
//! - [`FetchResult`] - Headers, status and body of one HTTP fetch
//! - [`VersionInfo`] - Installed and latest upstream WordPress versions
//! - [`DetectionOutcome`] - Counters behind a fingerprint decision
//! - [`ScanReport`] - Complete result of scanning one target
//!
//! # Example
//!
//! ```
//! use wpscout::VersionInfo;
//!
//! let info = VersionInfo::new("4.7.3", "4.8.0");
//! assert!(info.is_outdated());
//! ```

mod fetch;
mod report;
mod version;

pub use fetch::*;
pub use report::*;
pub use version::*;
