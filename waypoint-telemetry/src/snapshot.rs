//! Failure diagnostics: viewport capture to a deterministic path.

use std::path::PathBuf;

use tokio::fs;
use tracing::{info, warn};
use waypoint_driver::Browser;

/// Writes at most one snapshot per failed test, overwriting on rerun.
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Capture the current viewport and persist it under the test's name.
    ///
    /// Best-effort: capture or IO failures are logged and yield `None`;
    /// they must not disturb the already-determined verdict.
    pub async fn capture<B: Browser>(&self, browser: &B, test_name: &str) -> Option<PathBuf> {
        let bytes = match browser.screenshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(test_name, error = %e, "screenshot capture failed");
                return None;
            }
        };

        let path = self.path_for(test_name);
        if let Err(e) = fs::create_dir_all(&self.dir).await {
            warn!(dir = %self.dir.display(), error = %e, "could not create snapshot directory");
            return None;
        }
        if let Err(e) = fs::write(&path, &bytes).await {
            warn!(path = %path.display(), error = %e, "could not write snapshot");
            return None;
        }

        info!(path = %path.display(), "failure snapshot written");
        Some(path)
    }

    pub fn path_for(&self, test_name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", sanitize(test_name)))
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
