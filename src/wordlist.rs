//! Probe wordlists.
//!
//! Wordlists are plain text files with one path per line. Blank lines and
//! lines starting with `#` are skipped. A copy of the detection wordlist is
//! compiled into the binary; a file with the same name in the configured
//! wordlist directory takes precedence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Name of the wordlist used for WordPress fingerprinting.
pub const DETECTION_WORDLIST: &str = "wordpress_detection.txt";

const EMBEDDED: &[(&str, &str)] = &[(
    DETECTION_WORDLIST,
    include_str!("../wordlists/wordpress_detection.txt"),
)];

/// Resolves wordlists by name.
#[derive(Debug, Clone, Default)]
pub struct WordlistLoader {
    dir: Option<PathBuf>,
}

impl WordlistLoader {
    /// A loader that only knows the embedded wordlists.
    pub fn embedded() -> Self {
        Self { dir: None }
    }

    /// A loader that looks in `dir` before falling back to embedded copies.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Returns the paths of wordlist `name`, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WordlistNotFound`] if neither the wordlist directory
    /// nor the embedded set has `name`, or an I/O error if the file exists
    /// but cannot be read.
    pub fn get_wordlist(&self, name: &str) -> Result<Vec<String>> {
        if let Some(path) = self.dir.as_deref().map(|d| d.join(name)) {
            if path.is_file() {
                debug!(path = %path.display(), "loading wordlist from disk");
                return read_wordlist(&path);
            }
        }

        EMBEDDED
            .iter()
            .find(|(embedded, _)| *embedded == name)
            .map(|(_, content)| parse_wordlist(content))
            .ok_or_else(|| Error::WordlistNotFound {
                name: name.to_string(),
            })
    }
}

pub fn read_wordlist(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_wordlist(&content))
}

fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wordlist_skips_comments_and_blanks() {
        let paths = parse_wordlist("# header\n\n/license.txt\n  /readme.html  \n#/skipped\n");
        assert_eq!(paths, vec!["/license.txt", "/readme.html"]);
    }

    #[test]
    fn test_embedded_detection_wordlist() {
        let paths = WordlistLoader::embedded()
            .get_wordlist(DETECTION_WORDLIST)
            .unwrap();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| !p.starts_with('#')));
        assert!(paths.iter().any(|p| p.contains("wp-includes")));
    }

    #[test]
    fn test_unknown_wordlist() {
        let err = WordlistLoader::embedded()
            .get_wordlist("plugins.txt")
            .unwrap_err();
        assert!(matches!(err, Error::WordlistNotFound { .. }));
    }

    #[test]
    fn test_directory_overrides_embedded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DETECTION_WORDLIST), "/only-this.js\n").unwrap();

        let paths = WordlistLoader::with_dir(dir.path())
            .get_wordlist(DETECTION_WORDLIST)
            .unwrap();
        assert_eq!(paths, vec!["/only-this.js"]);
    }

    #[test]
    fn test_directory_without_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let paths = WordlistLoader::with_dir(dir.path())
            .get_wordlist(DETECTION_WORDLIST)
            .unwrap();
        assert!(paths.len() > 1);
    }
}
