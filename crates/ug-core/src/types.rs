//! Core type definitions for URL groups
//!
//! The access type is the single tag that selects both the matching
//! strategy and the action produced for a matched URL.

use std::fmt;
use std::str::FromStr;

// =============================================================================
// Access Types
// =============================================================================

/// Access type of a URL group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Whitelisted networks - matched by domain suffix
    Allow,
    /// Blacklisted networks - matched by domain suffix
    Deny,
    /// Regular expressions, membership only
    Regexp,
    /// Regular expressions rewritten to a fixed destination (301)
    Replace,
    /// Regular expressions redirected to the configured redirect address
    Redir,
}

impl AccessType {
    /// Every access type.
    pub const ALL: [AccessType; 5] = [
        Self::Allow,
        Self::Deny,
        Self::Regexp,
        Self::Replace,
        Self::Redir,
    ];

    /// Whether patterns of this type are compiled as regular expressions.
    #[inline]
    pub fn is_regex(self) -> bool {
        match self {
            Self::Regexp | Self::Replace | Self::Redir => true,
            Self::Allow | Self::Deny => false,
        }
    }

    /// Lowercase name used in rule lists and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Regexp => "regexp",
            Self::Replace => "replace",
            Self::Redir => "redir",
        }
    }
}

/// Error returned when an access type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown access type: {0}")]
pub struct UnknownAccessType(pub String);

impl FromStr for AccessType {
    type Err = UnknownAccessType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            "regexp" => Ok(Self::Regexp),
            "replace" => Ok(Self::Replace),
            "redir" | "redirect" => Ok(Self::Redir),
            _ => Err(UnknownAccessType(s.to_string())),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("allow".parse::<AccessType>(), Ok(AccessType::Allow));
        assert_eq!("DENY".parse::<AccessType>(), Ok(AccessType::Deny));
        assert_eq!("Regexp".parse::<AccessType>(), Ok(AccessType::Regexp));
        assert_eq!("replace".parse::<AccessType>(), Ok(AccessType::Replace));
        assert_eq!("redir".parse::<AccessType>(), Ok(AccessType::Redir));
        assert_eq!("redirect".parse::<AccessType>(), Ok(AccessType::Redir));
        assert_eq!(
            "block".parse::<AccessType>(),
            Err(UnknownAccessType("block".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for access in AccessType::ALL {
            assert_eq!(access.to_string().parse::<AccessType>(), Ok(access));
        }
    }

    #[test]
    fn test_is_regex() {
        assert!(!AccessType::Allow.is_regex());
        assert!(!AccessType::Deny.is_regex());
        assert!(AccessType::Regexp.is_regex());
        assert!(AccessType::Replace.is_regex());
        assert!(AccessType::Redir.is_regex());
    }
}
