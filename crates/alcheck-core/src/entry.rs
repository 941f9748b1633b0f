use serde_json::Value;
use thiserror::Error;

/// Capability token granting login-credential sharing ("Smart Lock").
pub const LOGIN_CREDS: &str = "delegate_permission/common.get_login_creds";
/// Capability token granting URL-handling delegation ("App Links").
pub const HANDLE_ALL_URLS: &str = "delegate_permission/common.handle_all_urls";

pub const NAMESPACE_WEB: &str = "web";
pub const NAMESPACE_ANDROID: &str = "android_app";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Missing relation from entry")]
    MissingRelation,
    #[error("Missing target from entry")]
    MissingTarget,
    #[error("Missing namespace from target")]
    MissingNamespace,
    #[error("Missing site from target")]
    MissingSite,
    #[error("Missing package name from target")]
    MissingPackageName,
    #[error("Missing android fingerprint from target")]
    MissingFingerprint,
    #[error("unrecognized namespace {0:?} in target")]
    UnknownNamespace(String),
}

/// The capability tokens of one entry. Unrecognized tokens are kept but
/// carry no meaning; only the membership tests below are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    tokens: Vec<String>,
}

impl Relation {
    /// Extract the relation list from a raw entry. Re-checks presence
    /// even for schema-validated input, so a bypassed or relaxed schema
    /// degrades to an entry-level failure.
    pub fn from_value(entry: &Value) -> Result<Self, EntryError> {
        let tokens: Vec<String> = entry
            .get("relation")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        if tokens.is_empty() {
            return Err(EntryError::MissingRelation);
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn has_login_creds(&self) -> bool {
        self.tokens.iter().any(|token| token == LOGIN_CREDS)
    }

    pub fn has_handle_all_urls(&self) -> bool {
        self.tokens.iter().any(|token| token == HANDLE_ALL_URLS)
    }
}

/// The subject of one entry: a website origin or an android app.
/// Required fields are non-optional inside each variant; absence is
/// only expressible as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Web {
        site: String,
    },
    Android {
        package_name: String,
        fingerprints: Vec<String>,
    },
}

impl Target {
    pub fn from_value(entry: &Value) -> Result<Self, EntryError> {
        let target = entry.get("target").ok_or(EntryError::MissingTarget)?;
        let namespace = target
            .get("namespace")
            .and_then(Value::as_str)
            .ok_or(EntryError::MissingNamespace)?;

        match namespace {
            NAMESPACE_WEB => {
                let site = target
                    .get("site")
                    .and_then(Value::as_str)
                    .filter(|site| !site.is_empty())
                    .ok_or(EntryError::MissingSite)?;
                Ok(Target::Web {
                    site: site.to_owned(),
                })
            }
            NAMESPACE_ANDROID => {
                let package_name = target
                    .get("package_name")
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                    .ok_or(EntryError::MissingPackageName)?;
                let fingerprints: Vec<String> = target
                    .get("sha256_cert_fingerprints")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();
                if fingerprints.is_empty() {
                    return Err(EntryError::MissingFingerprint);
                }
                Ok(Target::Android {
                    package_name: package_name.to_owned(),
                    fingerprints,
                })
            }
            other => Err(EntryError::UnknownNamespace(other.to_owned())),
        }
    }

    pub fn is_web(&self) -> bool {
        matches!(self, Target::Web { .. })
    }

    pub fn is_android(&self) -> bool {
        matches!(self, Target::Android { .. })
    }

    /// The site origin, for web targets.
    pub fn site(&self) -> Option<&str> {
        match self {
            Target::Web { site } => Some(site),
            Target::Android { .. } => None,
        }
    }

    /// The (fingerprints, package name) pair, for android targets.
    pub fn android_data(&self) -> Option<(&[String], &str)> {
        match self {
            Target::Android {
                package_name,
                fingerprints,
            } => Some((fingerprints, package_name)),
            Target::Web { .. } => None,
        }
    }
}

/// One interpreted entry: relation plus classified target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub relation: Relation,
    pub target: Target,
}

impl Entry {
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        Ok(Self {
            relation: Relation::from_value(value)?,
            target: Target::from_value(value)?,
        })
    }
}
