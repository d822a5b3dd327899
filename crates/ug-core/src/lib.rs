//! URL Group Core Library
//!
//! This crate decides whether a request URL belongs to a typed group of
//! patterns and what a filtering proxy should do with it: block, allow,
//! redirect to the configured address, or rewrite to a fixed destination.
//!
//! # Architecture
//!
//! A [`UrlGroup`] is built once while the configuration loads (sequential
//! [`UrlGroup::add_url`] calls) and queried read-only afterwards. Two
//! matching strategies exist, selected by [`AccessType`]:
//! right-anchored domain suffix comparison for `Allow`/`Deny`, and
//! whole-string regular expression matching for `Regexp`/`Replace`/`Redir`.
//!
//! # Modules
//!
//! - `group`: the URL group and its matching / action logic
//! - `types`: access type tag
//! - `url`: fast URL host extraction without allocations
//! - `redirect`: redirect address providers
//! - `error`: error types

pub mod error;
pub mod group;
pub mod redirect;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use error::GroupError;
pub use group::{CompiledPattern, InsertReport, UrlGroup, REPLACE_STATUS_PREFIX};
pub use redirect::{redirect_addr, set_redirect_addr, FixedRedirect, ProcessRedirect, RedirectTarget, SharedRedirect};
pub use types::{AccessType, UnknownAccessType};
pub use url::{extract_domain, extract_host};
