//! Coverage profile merging
//!
//! Every per-package profile starts with its own `mode:` line. The merged
//! profile keeps a single header and the data lines of every profile that
//! exists, in job order.

use crate::result::{AccError, AccResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Merged profile text and how many per-package profiles went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedProfile {
    /// Full profile text, header included
    pub payload: String,
    /// Number of per-package profiles that existed
    pub merged: usize,
}

/// Append the data lines of the profile at `path` to `payload`.
///
/// Returns `false` when the file does not exist; a package without
/// coverable statements leaves no profile behind.
pub fn append_profile(payload: &mut String, path: &Path) -> AccResult<bool> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(profile = %path.display(), "no profile written, skipping");
            return Ok(false);
        }
        Err(e) => return Err(AccError::profile(path, e)),
    };

    for line in content.lines().skip(1) {
        payload.push_str(line);
        payload.push('\n');
    }
    Ok(true)
}

/// Merge the profiles at `paths` under one `mode: <covermode>` header
pub fn merge_profiles<P: AsRef<Path>>(covermode: &str, paths: &[P]) -> AccResult<MergedProfile> {
    let mut payload = format!("mode: {covermode}\n");
    let mut merged = 0;

    for path in paths {
        if append_profile(&mut payload, path.as_ref())? {
            merged += 1;
        }
    }

    Ok(MergedProfile { payload, merged })
}

/// Write `payload` to `path`, replacing any existing file (mode 0644 on unix)
pub fn write_profile(path: &Path, payload: &str) -> AccResult<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path).map_err(|e| AccError::profile(path, e))?;
    file.write_all(payload.as_bytes())
        .map_err(|e| AccError::profile(path, e))?;
    tracing::info!(output = %path.display(), bytes = payload.len(), "wrote merged profile");
    Ok(())
}
