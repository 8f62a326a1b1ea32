//! Skip policy deciding which text files get no snippet fingerprints.
//!
//! Skipped files still get a `file=` header so they can be matched as whole
//! files; only the snippet lines are omitted.

/// Files at or below this many bytes are never snippet-fingerprinted.
pub const MIN_FILE_SIZE: usize = 256;

/// Extensions (matched against the lowercased path suffix) whose contents are
/// archives, object code, documents, markup or key material.
pub const SKIP_SNIPPET_EXT: &[&str] = &[
    ".exe", ".zip", ".tar", ".tgz", ".gz", ".7z", ".rar", ".jar", ".war", ".ear", ".class",
    ".pyc", ".o", ".a", ".so", ".obj", ".dll", ".lib", ".out", ".app", ".bin", ".lst", ".dat",
    ".json", ".htm", ".html", ".xml", ".md", ".txt", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
    ".pptx", ".odt", ".ods", ".odp", ".pages", ".key", ".numbers", ".pdf", ".min.js", ".mf",
    ".sum", ".woff", ".woff2", ".xsd", ".pem", ".crt", ".cer", ".der", ".p12", ".p7b", ".p7c",
    ".p7s", ".p8", ".pub", ".pfx", ".crl", ".csr", ".gpg", ".asc", ".sig", ".sst",
];

/// Whether the lowercased `path` ends with a denylisted extension.
pub fn has_skipped_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    SKIP_SNIPPET_EXT.iter().any(|ext| lower.ends_with(ext))
}

/// Apply the extension, size and leading-byte heuristics.
///
/// A leading `{` or `<` marks JSON, XML or HTML content.
pub fn should_skip_snippets(path: &str, contents: &[u8]) -> bool {
    if has_skipped_extension(path) {
        return true;
    }
    if contents.len() <= MIN_FILE_SIZE {
        return true;
    }
    matches!(contents.first(), Some(b'{') | Some(b'<'))
}
