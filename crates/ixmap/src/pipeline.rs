//! One fetch → parse → write cycle.
//!
//! ```text
//! Start → Fetch ──fail──→ Err(Fetch | Decode)
//!           ↓
//!         Parse ──empty─→ Err(NoRecords)
//!           ↓
//!         Write ──fail──→ Err(Write)
//!           ↓
//!          Ok(RunSummary)
//! ```
//!
//! Each failure is logged here, at the point it happens, and then returned
//! unchanged. Nothing is retried and nothing is written unless at least one
//! record was extracted.

use crate::config::Config;
use crate::error::{IxMapError, Result};
use crate::extract::{extract_records, RecordPatterns};
use crate::fetch::HttpClient;
use crate::output::write_records;
use crate::record::AddressFamily;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Page that was fetched.
    pub url: String,
    /// HTTP status of the response.
    pub status: u16,
    /// Total records written.
    pub records: usize,
    pub ipv4: usize,
    pub ipv6: usize,
    /// File the records were written to.
    pub output: PathBuf,
}

/// Run one cycle with the built-in PeeringDB patterns.
pub async fn run(config: &Config) -> Result<RunSummary> {
    run_with_patterns(config, &RecordPatterns::peeringdb()).await
}

/// Run one cycle with caller-supplied patterns.
pub async fn run_with_patterns(config: &Config, patterns: &RecordPatterns) -> Result<RunSummary> {
    info!("starting run, fetching {}", config.url);

    let client = HttpClient::new(&config.user_agent, config.timeout)
        .inspect_err(|e| error!("{e}"))?;

    let response = client
        .get(&config.url)
        .await
        .inspect_err(|e| error!("HTTP request failed: {e}"))?;
    info!("HTTP request succeeded, status {}", response.status);
    if response.final_url != response.url {
        info!("redirected to {}", response.final_url);
    }

    info!("parsing HTML ({} bytes)", response.body.len());
    let records = extract_records(&response.body, patterns);
    if records.is_empty() {
        warn!("no records extracted, check the page structure or the response content");
        return Err(IxMapError::NoRecords {
            url: config.url.clone(),
        });
    }

    write_records(&config.output, &records)
        .inspect_err(|e| error!("failed to write output: {e}"))?;

    let ipv4 = records
        .iter()
        .filter(|r| r.family == AddressFamily::Ipv4)
        .count();
    let ipv6 = records.len() - ipv4;

    info!(
        "parsing complete, extracted {} records ({ipv4} IPv4, {ipv6} IPv6)",
        records.len()
    );
    info!("results saved to {}", config.output.display());

    Ok(RunSummary {
        url: config.url.clone(),
        status: response.status,
        records: records.len(),
        ipv4,
        ipv6,
        output: config.output.clone(),
    })
}
