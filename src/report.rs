//! Advisory report rendering.

use colored::Colorize;

use crate::error::{Error, Result};
use crate::model::VersionInfo;
use crate::vulndb::VulnerabilityDatabase;

const CVE_REFERENCE_URL: &str = "http://cve.mitre.org/cgi-bin/cvename.cgi?name=";

/// Renders the advisories affecting `info.current_version`.
///
/// Returns an empty string when the version is unresolved or the database
/// has nothing for it. Otherwise the text starts with a blank line and a
/// `|_CVE list:` header, followed by one line per advisory in database
/// order. With `colorize` set, only the leading identifier is painted.
///
/// # Errors
///
/// Returns [`Error::ContractViolation`] before touching the database if
/// `info` holds something that is not a version or `db` is closed.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use wpscout::report::report;
/// use wpscout::vulndb::CveDatabase;
/// use wpscout::VersionInfo;
///
/// let db = CveDatabase::from_entries(HashMap::from([(
///     "4.7.1".to_string(),
///     vec!["CVE-2017-1001000".to_string()],
/// )]));
/// let text = report(&VersionInfo::new("4.7.1", "4.8"), &db, false)?;
/// assert!(text.contains("|__CVE-2017-1001000: (http://cve.mitre.org/"));
/// # Ok::<(), wpscout::Error>(())
/// ```
pub fn report(
    info: &VersionInfo,
    db: &dyn VulnerabilityDatabase,
    colorize: bool,
) -> Result<String> {
    let found = advisories(info, db)?;
    Ok(render(&found, colorize))
}

/// Advisory identifiers for `info.current_version`, validated the same way
/// as [`report`]. Unresolved versions yield an empty list without a query.
pub fn advisories(info: &VersionInfo, db: &dyn VulnerabilityDatabase) -> Result<Vec<String>> {
    info.validate()?;
    if !db.is_open() {
        return Err(Error::ContractViolation(format!(
            "{} handle is closed",
            db.name()
        )));
    }

    if !info.has_current() {
        return Ok(Vec::new());
    }

    Ok(db.query_by_version(&info.current_version))
}

/// Formats a list of advisory identifiers; empty input renders as `""`.
pub fn render(advisories: &[String], colorize: bool) -> String {
    if advisories.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(advisories.len() + 2);
    lines.push(String::new());
    lines.push("    |_CVE list:".to_string());

    for id in advisories {
        let token = if colorize {
            id.red().to_string()
        } else {
            id.clone()
        };
        lines.push(format!("    |__{}: ({}{})", token, CVE_REFERENCE_URL, id));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts queries so tests can prove the database was not touched.
    struct CountingDb {
        open: bool,
        advisories: Vec<String>,
        queries: AtomicUsize,
    }

    impl CountingDb {
        fn new(open: bool, advisories: &[&str]) -> Self {
            Self {
                open,
                advisories: advisories.iter().map(|s| s.to_string()).collect(),
                queries: AtomicUsize::new(0),
            }
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl VulnerabilityDatabase for CountingDb {
        fn name(&self) -> &'static str {
            "counting db"
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn query_by_version(&self, _version: &str) -> Vec<String> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.advisories.clone()
        }
    }

    #[test]
    fn test_unknown_version_skips_query() {
        let db = CountingDb::new(true, &["CVE-2017-0001"]);
        let text = report(&VersionInfo::new("unknown", "4.8"), &db, false).unwrap();
        assert_eq!(text, "");
        assert_eq!(db.queries(), 0);

        let text = report(&VersionInfo::new("", "4.8"), &db, false).unwrap();
        assert_eq!(text, "");
        assert_eq!(db.queries(), 0);
    }

    #[test]
    fn test_lists_advisories_in_order() {
        let db = CountingDb::new(true, &["CVE-2017-0001", "CVE-2017-0002"]);
        let text = report(&VersionInfo::new("4.7.3", "4.8"), &db, false).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "    |_CVE list:",
                "    |__CVE-2017-0001: (http://cve.mitre.org/cgi-bin/cvename.cgi?name=CVE-2017-0001)",
                "    |__CVE-2017-0002: (http://cve.mitre.org/cgi-bin/cvename.cgi?name=CVE-2017-0002)",
            ]
        );
        assert_eq!(db.queries(), 1);
    }

    #[test]
    fn test_no_advisories_is_empty() {
        let db = CountingDb::new(true, &[]);
        assert_eq!(report(&VersionInfo::new("4.8", "4.8"), &db, false).unwrap(), "");
        assert_eq!(db.queries(), 1);
    }

    #[test]
    fn test_closed_db_is_contract_violation() {
        let db = CountingDb::new(false, &["CVE-2017-0001"]);
        let err = report(&VersionInfo::new("4.7.3", "4.8"), &db, false).unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
        assert_eq!(db.queries(), 0);
    }

    #[test]
    fn test_malformed_version_is_contract_violation() {
        let db = CountingDb::new(true, &["CVE-2017-0001"]);
        let err = report(&VersionInfo::new("4.7.3'; --", "4.8"), &db, false).unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
        assert_eq!(db.queries(), 0);
    }

    #[test]
    fn test_colorize_keeps_url_plain() {
        colored::control::set_override(true);
        let text = render(&["CVE-2017-0001".to_string()], true);
        assert!(text.contains("\x1b["));
        assert!(text.ends_with("name=CVE-2017-0001)"));
    }
}
