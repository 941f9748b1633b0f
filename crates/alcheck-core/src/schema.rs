use jsonschema::paths::{JSONPointer, PathChunk};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::validate::Violation;

/// The statement-list schema: an array of statements, each pairing a
/// relation (capability tokens) with exactly one target variant.
static SCHEMA_JSON: Lazy<Value> = Lazy::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "statement_list",
        "type": "array",
        "items": { "$ref": "#/definitions/statement" },
        "definitions": {
            "statement": {
                "type": "object",
                "required": ["relation", "target"],
                "properties": {
                    "relation": { "$ref": "#/definitions/relation" },
                    "target": {
                        // exclusive: a target matching both or neither
                        // variant is invalid
                        "oneOf": [
                            { "$ref": "#/definitions/web_target" },
                            { "$ref": "#/definitions/android_target" }
                        ]
                    }
                }
            },
            "relation": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1
            },
            "web_target": {
                "type": "object",
                "properties": {
                    "namespace": { "const": "web" },
                    "site": { "type": "string" }
                },
                "required": ["namespace", "site"],
                "additionalProperties": false
            },
            "android_target": {
                "type": "object",
                "properties": {
                    "namespace": { "const": "android_app" },
                    "package_name": { "type": "string" },
                    "sha256_cert_fingerprints": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1
                    }
                },
                "required": ["namespace", "package_name", "sha256_cert_fingerprints"],
                "additionalProperties": false
            }
        }
    })
});

static COMPILED: Lazy<JSONSchema> = Lazy::new(|| {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&SCHEMA_JSON)
        .expect("embedded statement-list schema compiles")
});

/// The schema document itself, for display or embedding.
pub fn schema_json() -> &'static Value {
    &SCHEMA_JSON
}

/// Evaluate `document` against the statement-list schema, collecting
/// every violation in evaluation order.
pub fn check(document: &Value) -> Vec<Violation> {
    match COMPILED.validate(document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| Violation {
                path: format_instance_path(&error.instance_path),
                message: error.to_string(),
            })
            .collect(),
    }
}

/// Render a JSON pointer as a dotted/bracketed path rooted at
/// `instance`, e.g. `instance[1].target`.
fn format_instance_path(pointer: &JSONPointer) -> String {
    use std::fmt::Write;

    let mut out = String::from("instance");
    for chunk in pointer.iter() {
        match chunk {
            PathChunk::Property(name) => {
                out.push('.');
                out.push_str(name);
            }
            PathChunk::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
            PathChunk::Keyword(_) => {}
        }
    }
    out
}
