//! Advisory lookup by WordPress version.
//!
//! The database is a JSON object mapping a WordPress version to the
//! advisory identifiers affecting it, most relevant first:
//!
//! ```json
//! {
//!   "4.7.1": ["CVE-2017-1001000", "CVE-2017-5610"],
//!   "4.7.0": ["CVE-2017-1001000", "CVE-2017-5487"]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Read-only source of advisories keyed by version.
pub trait VulnerabilityDatabase: Send + Sync {
    fn name(&self) -> &'static str;

    /// False once the owner has closed the handle; a closed handle must not
    /// be queried.
    fn is_open(&self) -> bool;

    /// Advisory identifiers for `version`, in the order they were stored.
    fn query_by_version(&self, version: &str) -> Vec<String>;
}

/// In-memory advisory table loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct CveDatabase {
    entries: HashMap<String, Vec<String>>,
    open: bool,
}

impl CveDatabase {
    pub fn from_entries(entries: HashMap<String, Vec<String>>) -> Self {
        Self {
            entries,
            open: true,
        }
    }

    /// Loads a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object
    /// of string arrays.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), versions = entries.len(), "loaded advisory database");
        Ok(Self::from_entries(entries))
    }

    pub fn close(&mut self) {
        self.open = false;
        self.entries.clear();
    }

    /// Number of versions with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VulnerabilityDatabase for CveDatabase {
    fn name(&self) -> &'static str {
        "CVE database"
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn query_by_version(&self, version: &str) -> Vec<String> {
        self.entries.get(version).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cves.json");
        fs::write(
            &path,
            r#"{"4.7.3": ["CVE-2017-0002", "CVE-2017-0001"], "4.8": []}"#,
        )
        .unwrap();

        let db = CveDatabase::open(&path).unwrap();
        assert!(db.is_open());
        assert_eq!(db.len(), 2);
        assert!(!db.is_empty());
        assert_eq!(
            db.query_by_version("4.7.3"),
            vec!["CVE-2017-0002", "CVE-2017-0001"]
        );
        assert!(db.query_by_version("4.8").is_empty());
        assert!(db.query_by_version("5.0").is_empty());
    }

    #[test]
    fn test_open_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cves.json");
        fs::write(&path, r#"["CVE-2017-0001"]"#).unwrap();

        assert!(CveDatabase::open(&path).is_err());
        assert!(CveDatabase::open(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_close() {
        let mut db = CveDatabase::from_entries(HashMap::from([(
            "4.7.3".to_string(),
            vec!["CVE-2017-0001".to_string()],
        )]));
        db.close();
        assert!(!db.is_open());
        assert!(db.query_by_version("4.7.3").is_empty());
    }

    #[test]
    fn test_default_is_closed() {
        assert!(!CveDatabase::default().is_open());
    }
}
