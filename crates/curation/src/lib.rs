//! # OSSID Curation
//!
//! User-declared BOM rules and the curator that applies them to match
//! results returned by the knowledge base.
//!
//! ## Rules
//!
//! - **remove**: drop a whole result when its path and/or package identifier
//!   matches, optionally only when its matched lines overlap a line range.
//! - **replace**: rewrite every detail's package identifiers to a single
//!   replacement. When several rules match, the most specific one wins
//!   (path+purl, then purl, then path).
//! - **include**: parsed and carried for callers that build scan requests;
//!   the curator does not apply it.
//!
//! ## Example Usage
//!
//! ```
//! use curation::{curate, parse_results, RuleSet};
//!
//! let results = parse_results(r#"{
//!     "web/index.js": [ { "id": "file", "purl": ["pkg:npm/mip-bootstrap"] } ],
//!     "src/main.c":   [ { "id": "snippet", "purl": ["pkg:github/org/lib"], "lines": "1-20" } ]
//! }"#).unwrap();
//! let rules = RuleSet::from_json(r#"{ "bom": { "remove": [ { "purl": "pkg:npm/mip-bootstrap" } ] } }"#).unwrap();
//!
//! let curated = curate(Some(results.as_slice()), Some(&rules)).unwrap();
//! assert_eq!(curated.len(), 1);
//! assert_eq!(curated[0].file_path, "src/main.c");
//! ```
//!
pub mod engine;
pub mod error;
pub mod results;
pub mod rules;

pub use crate::engine::{curate, CurationSummary, Curator};
pub use crate::error::CurationError;
pub use crate::results::{parse_results, results_to_value, LineRange, MatchDetail, MatchResult};
pub use crate::rules::{
    compare_priority, sort_by_priority, RemoveRule, ReplaceRule, Rule, RuleSet, RuleTarget,
};
