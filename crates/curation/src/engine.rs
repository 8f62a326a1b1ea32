//! Applies remove and replace rules to knowledge-base match results.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::CurationError;
use crate::results::MatchResult;
use crate::rules::{ReplaceRule, RuleSet};


/// Applies a [`RuleSet`] to match results.
///
/// Replace rules are put in priority order once at construction, so one
/// curator can process many batches against the same rules.
pub struct Curator<'a> {
    rules: &'a RuleSet,
    replace: Vec<&'a ReplaceRule>,
}

/// Counts describing one curation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurationSummary {
    pub input: usize,
    pub removed: usize,
    pub replaced: usize,
    pub output: usize,
}

impl<'a> Curator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            replace: rules.prioritized_replace(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        self.rules
    }

    /// Curate `results`, returning a freshly built collection.
    pub fn curate(&self, results: &[MatchResult]) -> Vec<MatchResult> {
        self.curate_with_summary(results).0
    }

    /// Like [`Self::curate`], also reporting what changed.
    pub fn curate_with_summary(&self, results: &[MatchResult]) -> (Vec<MatchResult>, CurationSummary) {
        let start = Instant::now();
        let mut summary = CurationSummary {
            input: results.len(),
            ..CurationSummary::default()
        };

        let mut curated = Vec::with_capacity(results.len());
        for result in results {
            if self.is_removed(result) {
                summary.removed += 1;
                continue;
            }
            match self.replacement_for(result) {
                Some(replacement) => {
                    summary.replaced += 1;
                    curated.push(collapse_purls(result, replacement));
                }
                None => curated.push(result.clone()),
            }
        }
        summary.output = curated.len();

        info!(
            input = summary.input,
            removed = summary.removed,
            replaced = summary.replaced,
            output = summary.output,
            elapsed_micros = start.elapsed().as_micros(),
            "curate_complete"
        );
        (curated, summary)
    }

    fn is_removed(&self, result: &MatchResult) -> bool {
        match self.rules.remove.iter().find(|rule| rule.matches(result)) {
            Some(rule) => {
                debug!(
                    file_path = %result.file_path,
                    rule_path = ?rule.target.path(),
                    rule_purl = ?rule.target.purl(),
                    "result_removed"
                );
                true
            }
            None => false,
        }
    }

    /// Replacement from the highest-priority matching rule, if it has one.
    fn replacement_for(&self, result: &MatchResult) -> Option<&'a str> {
        let rule: &'a ReplaceRule = self
            .replace
            .iter()
            .copied()
            .find(|rule| rule.matches(result))?;
        let replacement = rule.replacement();
        debug!(
            file_path = %result.file_path,
            replace_with = ?replacement,
            "replace_rule_applied"
        );
        replacement
    }
}

/// Copy of `result` whose every detail carries only `purl`.
fn collapse_purls(result: &MatchResult, purl: &str) -> MatchResult {
    let mut replaced = result.clone();
    for detail in &mut replaced.details {
        detail.purl = vec![purl.to_string()];
    }
    replaced
}

/// Curate `results` with `rules`.
///
/// Both inputs are required; an absent one is reported as
/// [`CurationError::InvalidInput`].
pub fn curate(
    results: Option<&[MatchResult]>,
    rules: Option<&RuleSet>,
) -> Result<Vec<MatchResult>, CurationError> {
    let results =
        results.ok_or_else(|| CurationError::InvalidInput("results are required".into()))?;
    let rules = rules.ok_or_else(|| CurationError::InvalidInput("rules are required".into()))?;
    Ok(Curator::new(rules).curate(results))
}
