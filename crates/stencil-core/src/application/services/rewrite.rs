//! Multi-pattern replacement engine.
//!
//! One read/scan/write cycle per file: the whole content is read once,
//! every table entry whose search key occurs is substituted everywhere in
//! the buffer (in table order, so a later pattern can match text introduced
//! by an earlier replacement), and the file is written back only when the
//! final buffer differs from the original.

use std::path::Path;

use tracing::{debug, warn};

use crate::application::ports::Filesystem;
use crate::domain::ReplacementTable;
use crate::error::StencilResult;

/// Apply a replacement table to one file. Returns whether content changed.
///
/// Best-effort per file: a missing or non-regular path warns and no-ops,
/// since not every template ships every well-known file. Read and write
/// failures (encoding, permissions) are fatal and propagate.
pub fn apply_replacements(
    fs: &dyn Filesystem,
    path: &Path,
    table: &ReplacementTable,
) -> StencilResult<bool> {
    if !fs.exists(path) {
        warn!(path = %path.display(), "File not found, skipping");
        return Ok(false);
    }
    if !fs.is_file(path) {
        warn!(path = %path.display(), "Path is not a file, skipping");
        return Ok(false);
    }

    let content = fs.read_to_string(path)?;
    let mut updated = content.clone();

    for (search, replacement) in table.entries() {
        if updated.contains(search) {
            updated = updated.replace(search, replacement);
        }
    }

    // Only write if content changed - keeps modification timestamps honest.
    if updated != content {
        fs.write(path, &updated)?;
        debug!(path = %path.display(), "File rewritten");
        return Ok(true);
    }

    Ok(false)
}

// ── tests ─────────────────────────────────────────────────────────────────────
