use std::collections::HashSet;

use ug_core::redirect::set_redirect_addr;
use ug_core::types::{AccessType, UnknownAccessType};
use ug_core::UrlGroup;

/// Directive that sets the proxy-wide redirect address.
const REDIRECT_DIRECTIVE: &str = "redirect_addr";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: malformed group header '{text}'")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: {source}")]
    UnknownAccessType {
        line: usize,
        #[source]
        source: UnknownAccessType,
    },
    #[error("line {line}: duplicate group id {id}")]
    DuplicateId { line: usize, id: i64 },
    #[error("line {line}: replace group {id} has no destination")]
    MissingDestination { line: usize, id: i64 },
    #[error("line {line}: unexpected argument '{text}' for {access} group {id}")]
    UnexpectedArgument {
        line: usize,
        id: i64,
        access: AccessType,
        text: String,
    },
    #[error("line {line}: pattern outside of any group")]
    PatternOutsideGroup { line: usize },
    #[error("line {line}: empty redirect address")]
    EmptyRedirect { line: usize },
}

/// A pattern the group refused to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPattern {
    pub group_id: i64,
    pub line: usize,
    pub pattern: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub lines: usize,
    pub groups: usize,
    pub patterns: usize,
    pub rejected: Vec<RejectedPattern>,
}

/// Groups loaded from a rule list, in file order.
#[derive(Debug, Clone, Default)]
pub struct RuleList {
    pub redirect_addr: Option<String>,
    pub groups: Vec<UrlGroup>,
    pub stats: LoadStats,
}

impl RuleList {
    pub fn group(&self, id: i64) -> Option<&UrlGroup> {
        self.groups.iter().find(|g| g.id() == id)
    }

    /// Publish the list's redirect address as the process-wide one.
    /// Returns false when the list does not define one.
    pub fn apply_redirect(&self) -> bool {
        match &self.redirect_addr {
            Some(addr) => {
                set_redirect_addr(addr.as_str());
                true
            }
            None => false,
        }
    }
}

/// Parse a rule list.
///
/// ```text
/// # comment
/// redirect_addr = http://proxy.local/blocked.html
///
/// [10 deny]
/// doubleclick.net
///
/// [20 replace http://safe.example.com/]
/// http://ads\..*
/// ```
///
/// Structural problems are errors. Regular expressions that fail to compile
/// are not: they are skipped and listed in [`LoadStats::rejected`].
pub fn parse_rule_list(text: &str) -> Result<RuleList, ParseError> {
    let mut list = RuleList::default();
    let mut seen_ids: HashSet<i64> = HashSet::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        list.stats.lines += 1;

        let line = raw_line.trim();
        if line.is_empty() || is_comment_line(line) {
            continue;
        }

        if let Some(addr) = parse_redirect_directive(line) {
            if addr.is_empty() {
                return Err(ParseError::EmptyRedirect { line: line_no });
            }
            list.redirect_addr = Some(addr.to_string());
            continue;
        }

        if let Some((id, rest)) = split_group_header(line) {
            let group = parse_group_header(id, rest, line, line_no)?;
            if !seen_ids.insert(group.id()) {
                return Err(ParseError::DuplicateId {
                    line: line_no,
                    id: group.id(),
                });
            }
            log::debug!("line {line_no}: group {} ({})", group.id(), group.access_type());
            list.groups.push(group);
            list.stats.groups += 1;
            continue;
        }

        let group = list
            .groups
            .last_mut()
            .ok_or(ParseError::PatternOutsideGroup { line: line_no })?;

        match group.add_url(line) {
            Ok(()) => list.stats.patterns += 1,
            Err(e) => list.stats.rejected.push(RejectedPattern {
                group_id: group.id(),
                line: line_no,
                pattern: e.pattern().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(list)
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('!')
}

fn parse_redirect_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(REDIRECT_DIRECTIVE)?;
    let value = rest.trim_start().strip_prefix('=')?;
    Some(value.trim())
}

/// A header is `[`, an integer id, the rest, `]`. Anything else opening
/// with `[` (`[a-z]+\.ads\.com`, `[^/]*\.net/.*`) is a pattern.
fn split_group_header(line: &str) -> Option<(i64, &str)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let inner = inner.trim_start();
    let id_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let id = inner[..id_end].parse().ok()?;
    Some((id, &inner[id_end..]))
}

fn parse_group_header(id: i64, rest: &str, line: &str, line_no: usize) -> Result<UrlGroup, ParseError> {
    let mut parts = rest.split_whitespace();
    let access_text = parts.next().ok_or_else(|| ParseError::MalformedHeader {
        line: line_no,
        text: line.to_string(),
    })?;

    let access: AccessType = access_text
        .parse()
        .map_err(|source| ParseError::UnknownAccessType {
            line: line_no,
            source,
        })?;

    let argument = parts.next();
    if let Some(extra) = parts.next() {
        return Err(ParseError::UnexpectedArgument {
            line: line_no,
            id,
            access,
            text: extra.to_string(),
        });
    }

    let mut group = UrlGroup::new(id, access);
    match (access, argument) {
        (AccessType::Replace, Some(dest)) => group.set_replacement(dest),
        (AccessType::Replace, None) => {
            return Err(ParseError::MissingDestination { line: line_no, id });
        }
        (_, Some(extra)) => {
            return Err(ParseError::UnexpectedArgument {
                line: line_no,
                id,
                access,
                text: extra.to_string(),
            });
        }
        (_, None) => {}
    }

    Ok(group)
}
