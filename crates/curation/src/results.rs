//! Match results returned by the knowledge-base lookup.
//!
//! The service answers with a JSON object keyed by scanned path, each value an
//! ordered array of detail objects:
//!
//! ```json
//! { "src/spdx.c": [ { "id": "snippet", "purl": ["pkg:github/scanoss/engine"], "lines": "11-52,81-123" } ] }
//! ```
//!
//! Only `purl` and `lines` are interpreted here. All other detail fields are
//! carried through untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CurationError;

/// Closed interval of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Range covering `start..=end`; the bounds are swapped if reversed.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Closed-interval overlap; ranges that share an endpoint overlap.
    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Parse a `lines` string such as `"11-52,81-123"`.
    ///
    /// Single numbers become one-line ranges. Segments that do not parse, and
    /// the `all` marker used for whole-file matches, are skipped.
    pub fn parse_list(lines: &str) -> Vec<LineRange> {
        lines
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| match segment.parse::<LineRange>() {
                Ok(range) => Some(range),
                Err(err) => {
                    debug!(segment, error = %err, "line_range_skipped");
                    None
                }
            })
            .collect()
    }
}

impl FromStr for LineRange {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bound = |text: &str| {
            text.trim().parse::<u32>().map_err(|_| {
                CurationError::MalformedDocument(format!("invalid line range '{s}'"))
            })
        };
        match s.split_once('-') {
            Some((start, end)) => Ok(LineRange::new(bound(start)?, bound(end)?)),
            None => {
                let line = bound(s)?;
                Ok(LineRange::new(line, line))
            }
        }
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One detail entry of a match result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    /// Package identifiers attributed to this match.
    #[serde(default)]
    pub purl: Vec<String>,
    /// Matched local line ranges, e.g. `"11-52,81-123"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<String>,
    /// Every other field reported by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchDetail {
    pub fn new<I, S>(purls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            purl: purls.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_lines(mut self, lines: impl Into<String>) -> Self {
        self.lines = Some(lines.into());
        self
    }

    pub fn line_ranges(&self) -> Vec<LineRange> {
        self.lines
            .as_deref()
            .map(LineRange::parse_list)
            .unwrap_or_default()
    }
}

/// All details reported for one scanned path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub file_path: String,
    pub details: Vec<MatchDetail>,
}

impl MatchResult {
    pub fn new(file_path: impl Into<String>, details: Vec<MatchDetail>) -> Self {
        Self {
            file_path: file_path.into(),
            details,
        }
    }

    /// Package identifiers across every detail, in report order.
    pub fn purls(&self) -> impl Iterator<Item = &str> {
        self.details
            .iter()
            .flat_map(|d| d.purl.iter().map(String::as_str))
    }

    pub fn has_purl(&self, purl: &str) -> bool {
        self.purls().any(|p| p == purl)
    }

    /// Line ranges across every detail.
    pub fn line_ranges(&self) -> Vec<LineRange> {
        self.details.iter().flat_map(|d| d.line_ranges()).collect()
    }
}

/// Parse the service's JSON result document, keeping path order.
pub fn parse_results(json: &str) -> Result<Vec<MatchResult>, CurationError> {
    let document: Map<String, Value> = serde_json::from_str(json)?;
    document
        .into_iter()
        .map(|(file_path, details)| {
            let details: Vec<MatchDetail> = serde_json::from_value(details).map_err(|err| {
                CurationError::MalformedDocument(format!("{file_path}: {err}"))
            })?;
            Ok(MatchResult { file_path, details })
        })
        .collect()
}

/// Render results back into the service's JSON shape.
pub fn results_to_value(results: &[MatchResult]) -> Result<Value, CurationError> {
    let mut document = Map::with_capacity(results.len());
    for result in results {
        document.insert(
            result.file_path.clone(),
            serde_json::to_value(&result.details)?,
        );
    }
    Ok(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlap_is_closed_interval() {
        let a = LineRange::new(1, 5);
        assert!(a.overlaps(&LineRange::new(5, 10)));
        assert!(LineRange::new(5, 10).overlaps(&a));
        assert!(a.overlaps(&LineRange::new(2, 3)));
        assert!(!a.overlaps(&LineRange::new(6, 10)));
        assert!(!LineRange::new(6, 10).overlaps(&a));
    }

    #[test]
    fn new_orders_bounds() {
        assert_eq!(LineRange::new(9, 3), LineRange { start: 3, end: 9 });
    }

    #[test]
    fn parse_list_handles_ranges_and_singletons() {
        let ranges = LineRange::parse_list("11-52, 81-123,7");
        assert_eq!(
            ranges,
            vec![
                LineRange::new(11, 52),
                LineRange::new(81, 123),
                LineRange::new(7, 7)
            ]
        );
    }

    #[test]
    fn parse_list_skips_garbage_and_all() {
        assert!(LineRange::parse_list("all").is_empty());
        assert!(LineRange::parse_list("").is_empty());
        assert_eq!(
            LineRange::parse_list("x-3,4-5,-"),
            vec![LineRange::new(4, 5)]
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let range = LineRange::new(40, 60);
        assert_eq!(range.to_string().parse::<LineRange>().unwrap(), range);
    }

    #[test]
    fn result_collects_purls_and_ranges_from_all_details() {
        let result = MatchResult::new(
            "src/a.c",
            vec![
                MatchDetail::new(["pkg:a"]).with_lines("1-10"),
                MatchDetail::new(["pkg:b", "pkg:c"]).with_lines("20-30"),
            ],
        );
        assert_eq!(result.purls().collect::<Vec<_>>(), vec!["pkg:a", "pkg:b", "pkg:c"]);
        assert!(result.has_purl("pkg:c"));
        assert!(!result.has_purl("pkg:d"));
        assert_eq!(
            result.line_ranges(),
            vec![LineRange::new(1, 10), LineRange::new(20, 30)]
        );
    }

    #[test]
    fn parse_results_keeps_order_and_extra_fields() {
        let json = json!({
            "z/last.c": [{ "id": "file", "purl": ["pkg:z"], "version": "1.0" }],
            "a/first.c": [{ "id": "snippet", "purl": ["pkg:a"], "lines": "3-9" }],
            "m/none.c": [{ "id": "none" }]
        })
        .to_string();

        let results = parse_results(&json).unwrap();
        let paths: Vec<&str> = results.iter().map(|r| r.file_path.as_str()).collect();
        assert_eq!(paths, vec!["z/last.c", "a/first.c", "m/none.c"]);
        assert_eq!(results[0].details[0].extra.get("version"), Some(&json!("1.0")));
        assert_eq!(results[1].details[0].line_ranges(), vec![LineRange::new(3, 9)]);
        assert!(results[2].details[0].purl.is_empty());
    }

    #[test]
    fn results_render_back_to_json() {
        let json = json!({
            "src/a.c": [{ "id": "snippet", "purl": ["pkg:a"], "lines": "1-2" }]
        });
        let results = parse_results(&json.to_string()).unwrap();
        assert_eq!(results_to_value(&results).unwrap(), json);
    }

    #[test]
    fn parse_results_rejects_wrong_shape() {
        let err = parse_results(r#"{"a.c": {"purl": []}}"#).unwrap_err();
        match err {
            CurationError::MalformedDocument(msg) => assert!(msg.contains("a.c")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_results("[1, 2]").is_err());
    }
}
