use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentError {
    pub code: &'static str,
    pub message: String,
}

impl ContentError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn empty_href() -> Self {
        Self::new("empty_href", "Empty href")
    }

    pub fn invalid_href(href: &str) -> Self {
        Self::new("invalid_href", format!("cannot resolve href: {href}"))
    }

    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::new("cache_unavailable", message)
    }

    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::new("invalid_snapshot", message)
    }

    /// True for failures raised while resolving a link target.
    pub fn is_link_failure(&self) -> bool {
        self.code == "empty_href" || self.code == "invalid_href"
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ContentError {}
