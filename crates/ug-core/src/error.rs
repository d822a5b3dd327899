//! Error types for URL groups

/// Error returned when a pattern is rejected by a group.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("Malformed regexp pattern {pattern}: {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl GroupError {
    /// The rejected pattern text.
    pub fn pattern(&self) -> &str {
        match self {
            Self::MalformedPattern { pattern, .. } => pattern,
        }
    }
}
