pub mod config;
pub mod detector;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod output;
pub mod report;
pub mod scan;
pub mod similarity;
pub mod version;
pub mod vulndb;
pub mod wordlist;

pub use config::Config;
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use model::{DetectionOutcome, FetchResult, ScanReport, VersionInfo};
pub use scan::SiteScanner;
pub use vulndb::{CveDatabase, VulnerabilityDatabase};
