//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-defined identifier of a post.
///
/// Stored verbatim as a watermark, so it must survive a JSON round-trip in either shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Numeric(id) => write!(f, "{id}"),
            PostId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        PostId::Numeric(id)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        PostId::Text(id.to_string())
    }
}

/// A search result returned by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    /// Author handle, without the leading `@`.
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    Search,
}

/// A configured trigger plus the candidate replies for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Behavior {
    pub kind: BehaviorKind,
    pub term: String,
    pub responses: Vec<String>,
}

impl Behavior {
    pub fn search(term: impl Into<String>, responses: Vec<String>) -> Self {
        Self {
            kind: BehaviorKind::Search,
            term: term.into(),
            responses,
        }
    }
}

/// Outcome of one behavior within a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermReport {
    pub term: String,
    pub found: usize,
    pub replied: usize,
    pub failed: usize,
    pub search_failed: bool,
}

/// Outcome of a whole `run_once` cycle, in behavior order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub terms: Vec<TermReport>,
}

impl CycleReport {
    pub fn replied(&self) -> usize {
        self.terms.iter().map(|t| t.replied).sum()
    }
}
