//! BOM rule model and priority ordering.
//!
//! Every rule kind shares one predicate, [`RuleTarget`] (`path` and/or
//! `purl`), and adds its own payload: line bounds for remove rules, the
//! replacement identifier for replace rules. Priority is a function of the
//! shared target only.
//!
//! The JSON shape, as written by users:
//!
//! ```json
//! { "bom": {
//!     "include": [ { "path": "src/", "purl": "pkg:github/org/lib" } ],
//!     "remove":  [ { "purl": "pkg:npm/mip-bootstrap", "start_line": 1, "end_line": 40 } ],
//!     "replace": [ { "purl": "pkg:npm/old", "replace_with": "pkg:npm/new", "license": "MIT" } ]
//! } }
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CurationError;
use crate::results::{LineRange, MatchResult};

/// Path and package-identifier predicate shared by every rule kind.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
}

impl RuleTarget {
    pub fn new(path: Option<&str>, purl: Option<&str>) -> Self {
        Self {
            path: path.map(str::to_string),
            purl: purl.map(str::to_string),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    pub fn purl(&self) -> Option<&str> {
        self.purl.as_deref().filter(|p| !p.is_empty())
    }

    /// 4 for path and purl, 2 for purl only, 1 for path only, 0 otherwise.
    pub fn priority(&self) -> u8 {
        match (self.path(), self.purl()) {
            (Some(_), Some(_)) => 4,
            (None, Some(_)) => 2,
            (Some(_), None) => 1,
            (None, None) => 0,
        }
    }

    /// Whether the path/purl predicate holds for `result`.
    ///
    /// A target with neither field set matches nothing.
    pub fn matches(&self, result: &MatchResult) -> bool {
        match (self.path(), self.purl()) {
            (Some(path), Some(purl)) => path == result.file_path && result.has_purl(purl),
            (None, Some(purl)) => result.has_purl(purl),
            (Some(path), None) => path == result.file_path,
            (None, None) => false,
        }
    }
}

impl AsRef<RuleTarget> for RuleTarget {
    fn as_ref(&self) -> &RuleTarget {
        self
    }
}

/// Drops a whole result, optionally only when its lines overlap a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveRule {
    #[serde(flatten)]
    pub target: RuleTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

impl RemoveRule {
    pub fn new(path: Option<&str>, purl: Option<&str>) -> Self {
        Self {
            target: RuleTarget::new(path, purl),
            ..Self::default()
        }
    }

    pub fn with_lines(mut self, start_line: Option<u32>, end_line: Option<u32>) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    /// The rule's line constraint. A missing bound is open on that side.
    pub fn line_range(&self) -> Option<LineRange> {
        if self.start_line.is_none() && self.end_line.is_none() {
            return None;
        }
        Some(LineRange {
            start: self.start_line.unwrap_or(0),
            end: self.end_line.unwrap_or(u32::MAX),
        })
    }

    pub fn matches(&self, result: &MatchResult) -> bool {
        if !self.target.matches(result) {
            return false;
        }
        match self.line_range() {
            None => true,
            Some(range) => result.line_ranges().iter().any(|r| range.overlaps(r)),
        }
    }
}

impl AsRef<RuleTarget> for RemoveRule {
    fn as_ref(&self) -> &RuleTarget {
        &self.target
    }
}

/// Rewrites the package identifiers of a matching result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    #[serde(flatten)]
    pub target: RuleTarget,
    #[serde(default)]
    pub replace_with: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl ReplaceRule {
    pub fn new(path: Option<&str>, purl: Option<&str>, replace_with: &str) -> Self {
        Self {
            target: RuleTarget::new(path, purl),
            replace_with: replace_with.to_string(),
            license: None,
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Replacement identifier, or `None` when the rule is a no-op.
    pub fn replacement(&self) -> Option<&str> {
        Some(self.replace_with.as_str()).filter(|r| !r.is_empty())
    }

    pub fn matches(&self, result: &MatchResult) -> bool {
        self.target.matches(result)
    }
}

impl AsRef<RuleTarget> for ReplaceRule {
    fn as_ref(&self) -> &RuleTarget {
        &self.target
    }
}

/// Any BOM rule: the shared predicate plus its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Include(RuleTarget),
    Remove(RemoveRule),
    Replace(ReplaceRule),
}

impl Rule {
    pub fn target(&self) -> &RuleTarget {
        match self {
            Rule::Include(target) => target,
            Rule::Remove(rule) => &rule.target,
            Rule::Replace(rule) => &rule.target,
        }
    }

    pub fn priority(&self) -> u8 {
        self.target().priority()
    }
}

impl AsRef<RuleTarget> for Rule {
    fn as_ref(&self) -> &RuleTarget {
        self.target()
    }
}

impl From<RuleTarget> for Rule {
    fn from(target: RuleTarget) -> Self {
        Rule::Include(target)
    }
}

impl From<RemoveRule> for Rule {
    fn from(rule: RemoveRule) -> Self {
        Rule::Remove(rule)
    }
}

impl From<ReplaceRule> for Rule {
    fn from(rule: ReplaceRule) -> Self {
        Rule::Replace(rule)
    }
}

/// Descending priority; equal priorities with paths on both sides put the
/// longer path first. Everything else compares equal.
pub fn compare_priority(a: &RuleTarget, b: &RuleTarget) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| match (a.path(), b.path()) {
            (Some(pa), Some(pb)) => pb.len().cmp(&pa.len()),
            _ => Ordering::Equal,
        })
}

/// Stable sort by [`compare_priority`]; equal rules keep their input order.
pub fn sort_by_priority<R: AsRef<RuleTarget>>(rules: &mut [R]) {
    rules.sort_by(|a, b| compare_priority(a.as_ref(), b.as_ref()));
}

/// User-declared BOM rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Accepted and carried, not applied by the curator.
    #[serde(default)]
    pub include: Vec<RuleTarget>,
    #[serde(default)]
    pub remove: Vec<RemoveRule>,
    #[serde(default)]
    pub replace: Vec<ReplaceRule>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BomDocument {
    #[serde(default)]
    bom: RuleSet,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `rule` under its kind, keeping declaration order.
    pub fn push(&mut self, rule: impl Into<Rule>) {
        match rule.into() {
            Rule::Include(target) => self.include.push(target),
            Rule::Remove(rule) => self.remove.push(rule),
            Rule::Replace(rule) => self.replace.push(rule),
        }
    }

    pub fn with_remove(mut self, rule: RemoveRule) -> Self {
        self.push(rule);
        self
    }

    pub fn with_replace(mut self, rule: ReplaceRule) -> Self {
        self.push(rule);
        self
    }

    pub fn with_include(mut self, rule: RuleTarget) -> Self {
        self.push(rule);
        self
    }

    /// Every rule, include first, then remove, then replace.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        let include = self.include.iter().cloned().map(Rule::Include);
        let remove = self.remove.iter().cloned().map(Rule::Remove);
        let replace = self.replace.iter().cloned().map(Rule::Replace);
        include.chain(remove).chain(replace)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.remove.is_empty() && self.replace.is_empty()
    }

    /// Replace rules in application order.
    pub fn prioritized_replace(&self) -> Vec<&ReplaceRule> {
        let mut rules: Vec<&ReplaceRule> = self.replace.iter().collect();
        rules.sort_by(|a, b| compare_priority(&a.target, &b.target));
        rules
    }

    /// Parse a `{ "bom": { ... } }` document. Missing sections are empty.
    pub fn from_json(json: &str) -> Result<Self, CurationError> {
        let document: BomDocument = serde_json::from_str(json)?;
        Ok(document.bom)
    }

    /// Render as a `{ "bom": { ... } }` document.
    pub fn to_json(&self) -> Result<String, CurationError> {
        let document = BomDocument { bom: self.clone() };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for rule in iter {
            rules.push(rule);
        }
        rules
    }
}
