use std::collections::HashMap;

/// Status reported for a fetch that never produced an HTTP response.
pub const FAILED_STATUS: u16 = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// Response headers keyed by lowercase name.
    pub headers: HashMap<String, String>,
    pub status: u16,
    /// Absent when the transport failed or the body could not be decoded.
    pub body: Option<String>,
}

impl FetchResult {
    pub fn new(status: u16, body: Option<String>) -> Self {
        Self {
            headers: HashMap::new(),
            status,
            body,
        }
    }

    /// The sentinel result for timeouts, DNS errors and refused connections.
    pub fn failed() -> Self {
        Self::new(FAILED_STATUS, None)
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, Some(body.into()))
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self::new(status, Some(String::new())).with_header("Location", location)
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The redirect target, or an empty string when there is none.
    pub fn location(&self) -> &str {
        self.header("location").unwrap_or("")
    }

    pub fn is_failure(&self) -> bool {
        self.status == FAILED_STATUS && self.body.is_none()
    }
}
