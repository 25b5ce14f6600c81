//! Page similarity scoring.
//!
//! Used to tell a site's generic "not found" page apart from real content:
//! many servers answer 200 for every path, so status alone proves nothing.

use similar::{Algorithm, TextDiff};

/// Characters of each page that take part in the diff.
pub const MAX_COMPARED_CHARS: usize = 4096;

/// Returns how similar two texts are, from 0.0 (unrelated) to 1.0 (identical).
///
/// The ratio is `2 * matching / (len(a) + len(b))` over characters. An empty
/// input on either side scores 0.0. Only the first [`MAX_COMPARED_CHARS`]
/// characters of each text are compared.
///
/// # Example
///
/// ```
/// use wpscout::similarity::ratio;
///
/// assert_eq!(ratio("404 Not Found", "404 Not Found"), 1.0);
/// assert!(ratio("Page not found", &"0123456789".repeat(10)) < 0.35);
/// ```
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(head(a), head(b));

    f64::from(diff.ratio()).clamp(0.0, 1.0)
}

fn head(text: &str) -> &str {
    match text.char_indices().nth(MAX_COMPARED_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// [`ratio`] for a body that may be missing; a missing body scores 0.0.
pub fn ratio_opt(a: Option<&str>, b: &str) -> f64 {
    a.map_or(0.0, |a| ratio(a, b))
}
