//! URL Group Rule List Compiler
//!
//! This crate loads rule-list files into ordered URL groups.

pub mod parser;

pub use parser::{parse_rule_list, LoadStats, ParseError, RejectedPattern, RuleList};
