//! JSON persistence helpers.

use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

/// Serialize `value` as pretty-printed JSON (2-space indent, non-ASCII
/// unescaped) and write it to `path`, creating parent directories as
/// needed. Existing files are overwritten unconditionally.
///
/// Returns `true` on success. Serialization and I/O failures are logged
/// and reported as `false`; they never propagate past this boundary.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(path = %parent.display(), error = %e, "failed to create output directory");
                return false;
            }
        }
    }

    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to serialize document");
            return false;
        }
    };

    match std::fs::write(path, json) {
        Ok(()) => {
            info!(path = %path.display(), "wrote JSON document");
            true
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to write JSON document");
            false
        }
    }
}
