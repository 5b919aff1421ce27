//! Regex-based record extractor for PeeringDB exchange listings.
//!
//! The page is not parsed as a DOM. It is cut into segments at every
//! occurrence of the boundary pattern (the opening tag of one listing row)
//! and each segment is searched independently for three fields:
//!
//! - the exchange name, the text of the first link after the `exchange`
//!   cell,
//! - the IPv4 peering address, the text of the `ip4` cell,
//! - the IPv6 peering address, the text of the `ip6` cell.
//!
//! All four expressions live in [`RecordPatterns`], so a markup change on
//! the site only touches this one value. Custom patterns must put the
//! wanted text in capture group 1 (the boundary pattern needs no group).
//!
//! Patterns are compiled case-insensitive and with `.` matching newlines,
//! because cell contents are routinely split across lines.

use crate::entities::decode_entities;
use crate::error::Result;
use crate::record::{AddressFamily, IxRecord};
use regex::{Regex, RegexBuilder};

// ── Default PeeringDB patterns ───────────────────────────────────────────────

/// Opening of one row in the exchange-points table.
pub const PEERINGDB_BOUNDARY: &str = r#"<div class=["']row item"#;

/// Exchange name: first anchor after the `exchange` cell.
pub const PEERINGDB_LABEL: &str = r#"class=["']exchange.*?<a[^>]*>(.*?)</a>"#;

/// IPv4 cell contents.
pub const PEERINGDB_IPV4: &str = r#"class=["']ip4["'][^>]*>\s*(.*?)\s*</div>"#;

/// IPv6 cell contents.
pub const PEERINGDB_IPV6: &str = r#"class=["']ip6["'][^>]*>\s*(.*?)\s*</div>"#;

// ── Public types ─────────────────────────────────────────────────────────────

/// The compiled boundary and field patterns used to pull records from a page.
#[derive(Debug, Clone)]
pub struct RecordPatterns {
    boundary: Regex,
    label: Regex,
    ipv4: Regex,
    ipv6: Regex,
}

impl RecordPatterns {
    /// Compile a custom set of patterns.
    ///
    /// Returns [`IxMapError::Pattern`](crate::IxMapError::Pattern) if any
    /// expression is invalid.
    pub fn new(boundary: &str, label: &str, ipv4: &str, ipv6: &str) -> Result<Self> {
        Ok(Self {
            boundary: compile(boundary)?,
            label: compile(label)?,
            ipv4: compile(ipv4)?,
            ipv6: compile(ipv6)?,
        })
    }

    /// Patterns matching the current PeeringDB network page layout.
    pub fn peeringdb() -> Self {
        Self::new(
            PEERINGDB_BOUNDARY,
            PEERINGDB_LABEL,
            PEERINGDB_IPV4,
            PEERINGDB_IPV6,
        )
        .expect("built-in PeeringDB patterns are valid")
    }

    /// Split `document` into candidate segments.
    ///
    /// Everything before the first boundary (page header, navigation, other
    /// tables) is dropped. A document with no boundary yields nothing.
    pub fn segments<'a>(&'a self, document: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.boundary.split(document).skip(1)
    }

    /// Extract the records of one segment, IPv4 first.
    ///
    /// A segment without an exchange name yields no records, whatever
    /// address cells it has. An address cell that is missing or blank is
    /// skipped on its own.
    pub fn extract_segment(&self, segment: &str) -> Vec<IxRecord> {
        let Some(raw_label) = first_group(&self.label, segment) else {
            return Vec::new();
        };

        let label = decode_entities(raw_label.trim()).trim().to_string();
        if label.is_empty() {
            return Vec::new();
        }

        let mut records = Vec::with_capacity(2);
        for (re, family) in [
            (&self.ipv4, AddressFamily::Ipv4),
            (&self.ipv6, AddressFamily::Ipv6),
        ] {
            if let Some(address) = first_group(re, segment).map(str::trim) {
                if !address.is_empty() {
                    records.push(IxRecord::new(address, label.clone(), family));
                }
            }
        }
        records
    }
}

impl Default for RecordPatterns {
    fn default() -> Self {
        Self::peeringdb()
    }
}

// ── Main entry point ─────────────────────────────────────────────────────────

/// Extract every record from `document`, in document order.
pub fn extract_records(document: &str, patterns: &RecordPatterns) -> Vec<IxRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for segment in patterns.segments(document) {
        let found = patterns.extract_segment(segment);
        if found.is_empty() {
            skipped += 1;
        }
        records.extend(found);
    }

    if skipped > 0 {
        tracing::debug!("{skipped} segment(s) produced no records");
    }

    records
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()?)
}

fn first_group<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ── Tests ────────────────────────────────────────────────────────────────────
