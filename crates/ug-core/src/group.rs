//! URL Groups
//!
//! A group is an append-only, typed list of URL patterns. The access type
//! picks one of two matching strategies:
//!
//! - `Allow` / `Deny`: patterns are network specifiers compared against the
//!   trailing bytes of the request host.
//! - `Regexp` / `Replace` / `Redir`: patterns are regular expressions that
//!   must match the whole request URL.
//!
//! Malformed regular expressions are dropped with a warning so that one bad
//! line never prevents the rest of a rule list from loading.

use std::fmt;

use regex::Regex;

use crate::error::GroupError;
use crate::redirect::{ProcessRedirect, RedirectTarget};
use crate::types::AccessType;
use crate::url::extract_domain;

/// Prefix of the action string produced by `Replace` groups.
pub const REPLACE_STATUS_PREFIX: &str = "301:";

// =============================================================================
// Compiled Pattern
// =============================================================================

/// A regular expression together with the source it was compiled from.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile `source` for whole-string matching.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        // Validate the pattern as written so that an unbalanced ')' is not
        // absorbed by the anchoring group below.
        Regex::new(source)?;
        let regex = match Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => regex,
            // A trailing `(?x)` comment swallowed the closing wrapper; the
            // newline ends the comment and is itself ignored in that mode.
            Err(_) => Regex::new(&format!("^(?:{source}\n)$"))?,
        };
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as supplied by the caller.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the pattern matches the entire candidate.
    #[inline]
    pub fn full_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

// =============================================================================
// Pattern Storage
// =============================================================================

/// Per-type pattern storage. Each variant carries only what its access
/// type needs.
#[derive(Debug, Clone)]
enum Patterns {
    Allow(Vec<String>),
    Deny(Vec<String>),
    Regexp(Vec<CompiledPattern>),
    Replace {
        patterns: Vec<CompiledPattern>,
        destination: String,
    },
    Redir(Vec<CompiledPattern>),
}

impl Patterns {
    fn new(access: AccessType) -> Self {
        match access {
            AccessType::Allow => Self::Allow(Vec::new()),
            AccessType::Deny => Self::Deny(Vec::new()),
            AccessType::Regexp => Self::Regexp(Vec::new()),
            AccessType::Replace => Self::Replace {
                patterns: Vec::new(),
                destination: String::new(),
            },
            AccessType::Redir => Self::Redir(Vec::new()),
        }
    }

    fn access_type(&self) -> AccessType {
        match self {
            Self::Allow(_) => AccessType::Allow,
            Self::Deny(_) => AccessType::Deny,
            Self::Regexp(_) => AccessType::Regexp,
            Self::Replace { .. } => AccessType::Replace,
            Self::Redir(_) => AccessType::Redir,
        }
    }
}

// =============================================================================
// Insert Report
// =============================================================================

/// Outcome of a batch insertion.
#[derive(Debug, Default)]
pub struct InsertReport {
    /// Patterns stored in the group
    pub added: usize,
    /// Patterns dropped, with the compiler diagnostic
    pub rejected: Vec<GroupError>,
}

impl InsertReport {
    /// True when every pattern was stored.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

// =============================================================================
// UrlGroup
// =============================================================================

/// A typed collection of URL patterns.
#[derive(Debug, Clone)]
pub struct UrlGroup {
    id: i64,
    patterns: Patterns,
}

impl UrlGroup {
    /// Create an empty group.
    pub fn new(id: i64, access: AccessType) -> Self {
        log::trace!("[group {id}] new({access})");
        Self {
            id,
            patterns: Patterns::new(access),
        }
    }

    /// Identifier assigned at construction.
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Access type fixed at construction.
    #[inline]
    pub fn access_type(&self) -> AccessType {
        self.patterns.access_type()
    }

    /// Number of stored patterns.
    pub fn len(&self) -> usize {
        match &self.patterns {
            Patterns::Allow(nets) | Patterns::Deny(nets) => nets.len(),
            Patterns::Regexp(list) | Patterns::Redir(list) | Patterns::Replace { patterns: list, .. } => {
                list.len()
            }
        }
    }

    /// True when no pattern has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of compiled matchers. Always zero for suffix groups and equal
    /// to [`len`](Self::len) otherwise.
    pub fn compiled_len(&self) -> usize {
        match &self.patterns {
            Patterns::Allow(_) | Patterns::Deny(_) => 0,
            Patterns::Regexp(list) | Patterns::Redir(list) | Patterns::Replace { patterns: list, .. } => {
                list.len()
            }
        }
    }

    /// Raw patterns in insertion order.
    pub fn patterns(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match &self.patterns {
            Patterns::Allow(nets) | Patterns::Deny(nets) => Box::new(nets.iter().map(String::as_str)),
            Patterns::Regexp(list) | Patterns::Redir(list) | Patterns::Replace { patterns: list, .. } => {
                Box::new(list.iter().map(CompiledPattern::source))
            }
        }
    }

    /// Rewrite destination of a `Replace` group.
    pub fn destination(&self) -> Option<&str> {
        match &self.patterns {
            Patterns::Replace { destination, .. } => Some(destination),
            _ => None,
        }
    }

    /// Set the rewrite destination. Only `Replace` groups have one; on any
    /// other group the call is logged and ignored.
    pub fn set_replacement(&mut self, dest: &str) {
        log::trace!("[group {}] set_replacement({dest})", self.id);
        match &mut self.patterns {
            Patterns::Replace { destination, .. } => *destination = dest.to_string(),
            other => log::warn!(
                "Replacement {} ignored for {} group {}",
                dest,
                other.access_type(),
                self.id
            ),
        }
    }

    /// Append a pattern.
    ///
    /// Regex groups compile the pattern first. A pattern that does not
    /// compile is logged as a warning and not stored; the returned error
    /// lets batch loaders account for it without aborting.
    pub fn add_url(&mut self, url: &str) -> Result<(), GroupError> {
        log::trace!("[group {}] add_url({url})", self.id);

        match &mut self.patterns {
            Patterns::Allow(nets) | Patterns::Deny(nets) => {
                nets.push(url.to_string());
                Ok(())
            }
            Patterns::Regexp(list) | Patterns::Redir(list) | Patterns::Replace { patterns: list, .. } => {
                match CompiledPattern::new(url) {
                    Ok(pattern) => {
                        list.push(pattern);
                        Ok(())
                    }
                    Err(source) => {
                        log::warn!("Malformed regexp pattern {url} {source}");
                        Err(GroupError::MalformedPattern {
                            pattern: url.to_string(),
                            source,
                        })
                    }
                }
            }
        }
    }

    /// Append patterns in order, collecting rejections instead of stopping.
    pub fn add_urls<I, S>(&mut self, urls: I) -> InsertReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = InsertReport::default();
        for url in urls {
            match self.add_url(url.as_ref()) {
                Ok(()) => report.added += 1,
                Err(e) => report.rejected.push(e),
            }
        }
        report
    }

    /// Whether this group claims `url`.
    pub fn has_url(&self, url: &str) -> bool {
        match &self.patterns {
            Patterns::Allow(nets) | Patterns::Deny(nets) => self.match_networks(nets, url),
            Patterns::Regexp(list) | Patterns::Redir(list) | Patterns::Replace { patterns: list, .. } => {
                self.match_patterns(list, url)
            }
        }
    }

    fn match_patterns(&self, patterns: &[CompiledPattern], url: &str) -> bool {
        match patterns.iter().find(|p| p.full_match(url)) {
            Some(pattern) => {
                log::debug!("[group {}] Found rule {} for {}", self.id, pattern.source(), url);
                true
            }
            None => false,
        }
    }

    fn match_networks(&self, nets: &[String], url: &str) -> bool {
        let domain = extract_domain(url);
        match nets.iter().find(|net| is_domain_suffix(domain, net)) {
            Some(net) => {
                log::debug!("[group {}] Host {} is part of net {}", self.id, domain, net);
                true
            }
            None => false,
        }
    }

    /// Action for `url` using the process-wide redirect address.
    ///
    /// Returns an empty string when the group does not claim the URL, and
    /// for `Allow`, `Deny` and `Regexp` groups, where membership alone is
    /// the answer.
    pub fn modify_url(&self, url: &str) -> String {
        self.modify_url_with(url, &ProcessRedirect)
    }

    /// Action for `url` using the given redirect target.
    pub fn modify_url_with<R>(&self, url: &str, target: &R) -> String
    where
        R: RedirectTarget + ?Sized,
    {
        log::trace!("[group {}] modify_url({url})", self.id);
        self.resolve_with(url, target).unwrap_or_default()
    }

    /// Membership and action in one pass: `None` when the group does not
    /// claim `url`, otherwise the action string (possibly empty).
    pub fn resolve_with<R>(&self, url: &str, target: &R) -> Option<String>
    where
        R: RedirectTarget + ?Sized,
    {
        if !self.has_url(url) {
            return None;
        }

        let action = match &self.patterns {
            Patterns::Allow(_) | Patterns::Deny(_) | Patterns::Regexp(_) => String::new(),
            Patterns::Redir(_) => target.redirect_addr(),
            Patterns::Replace { destination, .. } => format!("{REPLACE_STATUS_PREFIX}{destination}"),
        };
        Some(action)
    }

    /// Raw patterns joined by single spaces.
    pub fn as_string(&self) -> String {
        self.patterns().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for UrlGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pattern) in self.patterns().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(pattern)?;
        }
        Ok(())
    }
}

/// True when `net` equals the trailing `net.len()` bytes of `domain`.
///
/// A network defined as `www.mail.ru` is longer than the host `mail.ru`
/// and therefore never contains it.
#[inline]
pub fn is_domain_suffix(domain: &str, net: &str) -> bool {
    if net.len() > domain.len() {
        return false;
    }
    domain.as_bytes()[domain.len() - net.len()..] == *net.as_bytes()
}
