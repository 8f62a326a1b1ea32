use std::fs;

use ossid::{
    CurationSummary, Curator, RuleSet, ScanConfig, curate_document, parse_results,
    results_to_value,
};
use serde_json::{Value, json};

const BOM: &str = r#"{
  "bom": {
    "include": [
      { "path": "src/", "purl": "pkg:github/acme/core" }
    ],
    "remove": [
      { "purl": "pkg:npm/mip-bootstrap" },
      { "path": "src/spdx.c", "start_line": 40, "end_line": 60 },
      { "path": "src/untouched.c", "start_line": 1, "end_line": 10 }
    ],
    "replace": [
      { "purl": "pkg:github/madler/zlib", "replace_with": "pkg:github/acme/zlib-fork", "license": "Zlib" },
      { "path": "lib/inflate.c", "purl": "pkg:github/madler/zlib", "replace_with": "pkg:github/acme/inflate" },
      { "path": "lib/noop.c", "replace_with": "" }
    ]
  }
}"#;

fn results_document() -> Value {
    json!({
        "web/index.js": [
            { "id": "file", "purl": ["pkg:npm/mip-bootstrap"], "matched": "100%" }
        ],
        "src/spdx.c": [
            { "id": "snippet", "purl": ["pkg:github/scanoss/engine"], "lines": "11-52,81-123" }
        ],
        "src/untouched.c": [
            { "id": "snippet", "purl": ["pkg:github/acme/core"], "lines": "20-30" }
        ],
        "lib/inflate.c": [
            { "id": "snippet", "purl": ["pkg:github/madler/zlib"], "lines": "1-80" }
        ],
        "lib/deflate.c": [
            { "id": "file", "purl": ["pkg:github/other/thing"] },
            { "id": "snippet", "purl": ["pkg:github/madler/zlib"], "lines": "5-15" }
        ],
        "lib/noop.c": [
            { "id": "file", "purl": ["pkg:github/some/lib"] }
        ]
    })
}

#[test]
fn bom_document_curates_results_end_to_end() {
    let rules = RuleSet::from_json(BOM).unwrap();
    assert_eq!(rules.include.len(), 1);

    let curated = curate_document(&results_document().to_string(), &rules).unwrap();
    let expected = json!({
        "src/untouched.c": [
            { "id": "snippet", "purl": ["pkg:github/acme/core"], "lines": "20-30" }
        ],
        "lib/inflate.c": [
            { "id": "snippet", "purl": ["pkg:github/acme/inflate"], "lines": "1-80" }
        ],
        "lib/deflate.c": [
            { "id": "file", "purl": ["pkg:github/acme/zlib-fork"] },
            { "id": "snippet", "purl": ["pkg:github/acme/zlib-fork"], "lines": "5-15" }
        ],
        "lib/noop.c": [
            { "id": "file", "purl": ["pkg:github/some/lib"] }
        ]
    });
    assert_eq!(curated, expected);
}

#[test]
fn summary_counts_each_decision() {
    let rules = RuleSet::from_json(BOM).unwrap();
    let results = parse_results(&results_document().to_string()).unwrap();
    let (curated, summary) = Curator::new(&rules).curate_with_summary(&results);

    assert_eq!(
        summary,
        CurationSummary {
            input: 6,
            removed: 2,
            replaced: 2,
            output: 4,
        }
    );
    // Path order is kept.
    let order: Vec<&str> = curated.iter().map(|r| r.file_path.as_str()).collect();
    assert_eq!(
        order,
        vec!["src/untouched.c", "lib/inflate.c", "lib/deflate.c", "lib/noop.c"]
    );
}

#[test]
fn rules_without_matches_leave_document_intact() {
    let rules = RuleSet::from_json(r#"{"bom": {"remove": [ {"purl": "pkg:none/none"} ]}}"#).unwrap();
    let document = results_document();
    let curated = curate_document(&document.to_string(), &rules).unwrap();
    assert_eq!(curated, document);

    let results = parse_results(&document.to_string()).unwrap();
    assert_eq!(results_to_value(&results).unwrap(), document);
}

#[test]
fn scan_config_points_at_bom_file() {
    let dir = tempfile::tempdir().unwrap();
    let bom_path = dir.path().join("sbom.json");
    fs::write(&bom_path, BOM).unwrap();
    let config_path = dir.path().join("scan.yaml");
    fs::write(
        &config_path,
        format!("version: \"1\"\nbom_path: \"{}\"\n", bom_path.display()),
    )
    .unwrap();

    let config = ScanConfig::from_file(&config_path).unwrap();
    let rules = config.load_rule_set().unwrap();
    assert_eq!(rules, RuleSet::from_json(BOM).unwrap());

    let round_trip = RuleSet::from_json(&rules.to_json().unwrap()).unwrap();
    assert_eq!(round_trip, rules);
}
