use std::env;

/// What to do when a link node's href cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkFailurePolicy {
    /// Abandon the whole classification; nothing is emitted.
    #[default]
    Abort,
    /// Treat the node as a non-link and keep walking.
    Skip,
}

impl LinkFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Some(Self::Abort),
            "skip" | "continue" => Some(Self::Skip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandlerConfig {
    pub link_failure: LinkFailurePolicy,
}

impl HandlerConfig {
    pub fn from_env() -> Self {
        let link_failure = match env::var("CTXMENUD_LINK_FAILURE") {
            Ok(value) if !value.trim().is_empty() => {
                LinkFailurePolicy::parse(&value).unwrap_or_else(|| {
                    log::warn!("unknown CTXMENUD_LINK_FAILURE value {value:?}, using abort");
                    LinkFailurePolicy::Abort
                })
            }
            _ => LinkFailurePolicy::Abort,
        };
        Self { link_failure }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_link_failure_policy() {
        assert_eq!(LinkFailurePolicy::parse(" Abort "), Some(LinkFailurePolicy::Abort));
        assert_eq!(LinkFailurePolicy::parse("skip"), Some(LinkFailurePolicy::Skip));
        assert_eq!(LinkFailurePolicy::parse("continue"), Some(LinkFailurePolicy::Skip));
        assert_eq!(LinkFailurePolicy::parse("ignore"), None);
        assert_eq!(HandlerConfig::default().link_failure, LinkFailurePolicy::Abort);
    }
}
