//! Writes the record map to disk.

use crate::error::{IxMapError, Result};
use crate::record::IxRecord;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `records` to `path`, one `"<address> <label>"` line each.
///
/// The lines go to a temporary file in the destination directory which is
/// then renamed over `path`, so the previous map stays intact if anything
/// fails. The destination directory must already exist.
pub fn write_records(path: &Path, records: &[IxRecord]) -> Result<()> {
    let write_err = |source: std::io::Error| IxMapError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        for record in records {
            writeln!(out, "{record}").map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
