use anyhow::{bail, Result};
use std::path::Path;

use alcheck_core::{validate, Associations, Pairing, Summary, ValidateError};

use crate::fetch::{self, DEFAULT_USER_AGENT};

/// Options for the `alcheck check` subcommand
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Local file path, hostname, or URL
    pub source: String,
    /// User-Agent override for remote fetches
    pub user_agent: Option<String>,
}

/// Fetch, validate and report one manifest end-to-end. Transport,
/// decoding and schema failures are fatal; entry-level failures are
/// contained inside the aggregation.
pub fn check(opts: CheckOptions) -> Result<()> {
    let (bytes, hostname) = load_document(&opts)?;

    let manifest = match validate(&bytes) {
        Ok(manifest) => manifest,
        Err(ValidateError::Schema(violations)) => {
            for violation in &violations {
                eprintln!("{violation}");
            }
            bail!("Errors validating schema");
        }
        Err(err) => return Err(err.into()),
    };

    let associations = Associations::collect(&manifest);
    let summary = associations.summarize(hostname.as_deref());
    render(&summary);
    Ok(())
}

/// Pick the document source: an existing path means a local file, any
/// other reference is normalized and fetched over HTTPS. Only remote
/// runs track a hostname for the report.
fn load_document(opts: &CheckOptions) -> Result<(Vec<u8>, Option<String>)> {
    let path = Path::new(&opts.source);
    if path.exists() {
        tracing::debug!("treating {:?} as a local file", opts.source);
        return Ok((fetch::read_local(path)?, None));
    }

    let url = fetch::normalize_reference(&opts.source)?;
    tracing::debug!("normalized {:?} to {url}", opts.source);
    let hostname = url.host_str().map(str::to_owned);
    let user_agent = opts.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    let bytes = fetch::fetch_remote(&url, user_agent)?;
    Ok((bytes, hostname))
}

fn render(summary: &Summary) {
    println!("== Asset Links Report ==");

    if let Some(pairing) = &summary.smart_lock {
        println!("\nSmart Lock (login credential sharing):");
        print_pairing(pairing);
    }
    if let Some(pairing) = &summary.app_links {
        println!("\nApp Links (URL handling):");
        print_pairing(pairing);
    }
    if summary.is_empty() {
        println!("\nNo relations to display");
    }
}

fn print_pairing(pairing: &Pairing) {
    println!("  Websites:");
    for site in &pairing.websites {
        println!("    - {site}");
    }
    println!("  Apps:");
    for app in &pairing.apps {
        println!("    - {app}");
    }
}
