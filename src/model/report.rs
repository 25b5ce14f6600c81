use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::VersionInfo;

/// Counters behind one fingerprint decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub total_probed: usize,
    pub matched_as_distinct: usize,
    /// Whether the `/wp-admin/` corroboration probe was issued.
    pub tie_break_used: bool,
    pub is_wordpress: bool,
}

impl DetectionOutcome {
    /// Fraction of probes that returned distinguishable content.
    ///
    /// Zero when nothing was probed.
    pub fn hit_rate(&self) -> f64 {
        if self.total_probed == 0 {
            return 0.0;
        }
        self.matched_as_distinct as f64 / self.total_probed as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub scan_time: DateTime<Utc>,
    pub is_wordpress: bool,
    pub detection: DetectionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionInfo>,
    pub outdated: bool,
    pub advisories: Vec<String>,
}

impl ScanReport {
    pub fn new(target: impl Into<String>, detection: DetectionOutcome) -> Self {
        Self {
            target: target.into(),
            scan_time: Utc::now(),
            is_wordpress: detection.is_wordpress,
            detection,
            version: None,
            outdated: false,
            advisories: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: VersionInfo) -> Self {
        self.outdated = version.is_outdated();
        self.version = Some(version);
        self
    }

    pub fn with_advisories(mut self, advisories: Vec<String>) -> Self {
        self.advisories = advisories;
        self
    }
}
