// Copyright 2026 ixmap Contributors
// SPDX-License-Identifier: MIT

//! ixmap: fetch a network's PeeringDB page and turn its exchange table into
//! an `"<address> <label>"` text map.
//!
//! The run is a single linear cycle: [`fetch`] downloads the page,
//! [`extract`] pulls [`IxRecord`]s out of it, [`output`] writes them. The
//! [`pipeline`] module drives that cycle and does all of the logging.

pub mod config;
pub mod entities;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod record;

pub use config::Config;
pub use error::{IxMapError, Result};
pub use extract::{extract_records, RecordPatterns};
pub use fetch::{HttpClient, HttpResponse};
pub use output::write_records;
pub use pipeline::{run, run_with_patterns, RunSummary};
pub use record::{AddressFamily, IxRecord};
