use serde::Serialize;

use crate::entry::{Entry, Target};
use crate::validate::Manifest;

/// Label shown for the android-only App Links case when no hostname is
/// tracked for the checked document.
pub const CURRENT_SITE_LABEL: &str = "the current website";

/// Per-platform bucket of association subjects: site origins on the
/// web side, package names on the android side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub web: Vec<String>,
    pub android: Vec<String>,
}

impl Buckets {
    fn push(&mut self, target: &Target) {
        match target {
            Target::Web { site } => self.web.push(site.clone()),
            Target::Android { package_name, .. } => self.android.push(package_name.clone()),
        }
    }
}

/// Aggregated associations over a whole manifest, one bucket pair per
/// capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Associations {
    pub credentials: Buckets,
    pub links: Buckets,
}

impl Associations {
    /// Interpret every entry and bucket it by capability and platform.
    /// A failing entry is logged and skipped; its siblings still count.
    pub fn collect(manifest: &Manifest) -> Self {
        let mut associations = Self::default();
        for raw in manifest.entries() {
            let entry = match Entry::from_value(raw) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("[entry] {err}, skipping");
                    continue;
                }
            };
            if entry.relation.has_login_creds() {
                associations.credentials.push(&entry.target);
            }
            if entry.relation.has_handle_all_urls() {
                associations.links.push(&entry.target);
            }
        }
        tracing::debug!(
            "credentials: {} web / {} android, links: {} web / {} android",
            associations.credentials.web.len(),
            associations.credentials.android.len(),
            associations.links.web.len(),
            associations.links.android.len(),
        );
        associations
    }

    /// The presentation decision, as a pure function over bucket
    /// emptiness. Smart Lock and App Links are independent checks; both
    /// may fire. An android-only links bucket still yields an App Links
    /// pairing, listing the checked hostname when one is tracked and
    /// the generic label otherwise.
    pub fn summarize(&self, hostname: Option<&str>) -> Summary {
        let smart_lock = if !self.credentials.web.is_empty() && !self.credentials.android.is_empty()
        {
            Some(Pairing {
                websites: self.credentials.web.clone(),
                apps: self.credentials.android.clone(),
            })
        } else {
            None
        };

        let app_links = if !self.links.web.is_empty() && !self.links.android.is_empty() {
            Some(Pairing {
                websites: self.links.web.clone(),
                apps: self.links.android.clone(),
            })
        } else if !self.links.android.is_empty() {
            Some(Pairing {
                websites: vec![hostname.unwrap_or(CURRENT_SITE_LABEL).to_owned()],
                apps: self.links.android.clone(),
            })
        } else {
            None
        };

        Summary {
            smart_lock,
            app_links,
        }
    }
}

/// One reported association: the linked websites and the apps they
/// connect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub websites: Vec<String>,
    pub apps: Vec<String>,
}

/// What the run has to report. Empty means "No relations to display".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub smart_lock: Option<Pairing>,
    pub app_links: Option<Pairing>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.smart_lock.is_none() && self.app_links.is_none()
    }
}
