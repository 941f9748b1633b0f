use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::schema;

/// UTF-8 byte-order mark; disallowed at the start of a manifest.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// One structural violation, tagged with the offending location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("BOM present in file")]
    BomPresent,
    #[error("File is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No data in file")]
    NoData,
    #[error("Errors validating schema")]
    Schema(Vec<Violation>),
}

/// A schema-valid statement list. Entries stay raw JSON; interpretation
/// happens per entry in [`crate::entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<Value>,
}

impl Manifest {
    /// Wrap pre-validated entries without running schema validation.
    /// Interpretation re-checks each entry defensively, so a bad entry
    /// here degrades to an entry-level skip rather than a panic.
    pub fn from_entries(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validate raw manifest bytes: UTF-8 with no leading BOM, valid JSON,
/// a non-empty document, and schema-conformant statements. All schema
/// violations are collected, not just the first.
pub fn validate(bytes: &[u8]) -> Result<Manifest, ValidateError> {
    if bytes.starts_with(UTF8_BOM) {
        // serde_json would report a generic "expected value" at byte 0;
        // the BOM case must stay distinguishable
        return Err(ValidateError::BomPresent);
    }

    let text = std::str::from_utf8(bytes)?;
    let document: Value = serde_json::from_str(text)?;

    // empty document is its own failure, before any schema shape check
    let no_data = match &document {
        Value::Array(entries) => entries.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if no_data {
        return Err(ValidateError::NoData);
    }

    let violations = schema::check(&document);
    if !violations.is_empty() {
        return Err(ValidateError::Schema(violations));
    }

    match document {
        Value::Array(entries) => {
            tracing::debug!("validated {} statement(s)", entries.len());
            Ok(Manifest { entries })
        }
        other => Err(ValidateError::Schema(vec![Violation {
            path: "instance".to_string(),
            message: format!("{other} is not a statement list"),
        }])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"[
        {
            "relation": ["delegate_permission/common.handle_all_urls"],
            "target": { "namespace": "web", "site": "https://example.com" }
        },
        {
            "relation": ["delegate_permission/common.get_login_creds"],
            "target": {
                "namespace": "android_app",
                "package_name": "com.example.app",
                "sha256_cert_fingerprints": ["AA:BB:CC:DD"]
            }
        }
    ]"#;

    #[test]
    fn validate_accepts_well_formed_manifest() {
        let manifest = validate(WELL_FORMED.as_bytes()).expect("well-formed manifest");
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());
    }

    #[test]
    fn validate_rejects_bom_with_specific_error() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(WELL_FORMED.as_bytes());

        let err = validate(&bytes).expect_err("BOM must be rejected");
        assert!(matches!(err, ValidateError::BomPresent), "got: {err}");
        assert_eq!(err.to_string(), "BOM present in file");
    }

    #[test]
    fn validate_reports_generic_parse_error_without_bom() {
        let err = validate(b"[{").expect_err("truncated JSON must fail");
        let msg = err.to_string();
        assert!(matches!(err, ValidateError::Parse(_)), "got: {msg}");
        assert!(msg.starts_with("Failed to parse JSON:"), "got: {msg}");
    }

    #[test]
    fn validate_rejects_empty_array_before_schema() {
        let err = validate(b"[]").expect_err("empty list must fail");
        assert!(matches!(err, ValidateError::NoData));
        assert_eq!(err.to_string(), "No data in file");
    }

    #[test]
    fn validate_rejects_empty_object_before_schema() {
        let err = validate(b"{}").expect_err("empty object must fail");
        assert!(matches!(err, ValidateError::NoData));
    }

    #[test]
    fn validate_collects_all_schema_violations() {
        let bad = br#"[
            { "relation": [], "target": { "namespace": "web", "site": "x" } },
            { "relation": ["r"] },
            { "relation": ["r"], "target": { "namespace": "bogus" } }
        ]"#;
        let err = validate(bad).expect_err("schema violations must fail");
        let ValidateError::Schema(violations) = err else {
            panic!("expected schema error, got: {err}");
        };
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["instance[0].relation", "instance[1]", "instance[2].target"]);
    }

    #[test]
    fn exclusive_target_rule_yields_one_error_at_target_path() {
        let bad = br#"[
            {
                "relation": ["delegate_permission/common.get_login_creds"],
                "target": { "namespace": "web" }
            }
        ]"#;
        let err = validate(bad).expect_err("incomplete target must fail");
        let ValidateError::Schema(violations) = err else {
            panic!("expected schema error, got: {err}");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "instance[0].target");
    }

    #[test]
    fn violations_render_as_path_colon_message() {
        let violation = Violation {
            path: "instance[1].target".to_string(),
            message: "is not valid".to_string(),
        };
        assert_eq!(violation.to_string(), "instance[1].target: is not valid");
    }

    #[test]
    fn schema_failure_displays_summary_line() {
        let err = validate(br#"[{"relation": []}]"#).expect_err("must fail");
        assert_eq!(err.to_string(), "Errors validating schema");
    }

    #[test]
    fn non_array_document_fails_schema_not_parse() {
        let err = validate(br#"{"relation": ["r"]}"#).expect_err("object root must fail");
        let ValidateError::Schema(violations) = err else {
            panic!("expected schema error, got: {err}");
        };
        assert_eq!(violations[0].path, "instance");
    }
}
