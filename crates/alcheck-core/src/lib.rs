#![forbid(unsafe_code)]

//! Validation pipeline for digital-asset-links manifests
//! (`assetlinks.json`): schema definitions, document validation with
//! path-tagged errors, and interpretation of validated statements into
//! website↔app associations.

pub mod entry;
pub mod report;
pub mod schema;
pub mod validate;

pub use entry::{Entry, EntryError, Relation, Target};
pub use report::{Associations, Buckets, Pairing, Summary};
pub use validate::{validate, Manifest, ValidateError, Violation};
