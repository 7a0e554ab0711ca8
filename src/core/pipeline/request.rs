//! Request-Scoped Workspace
//!
//! Each request owns a ULID-named temporary directory holding its
//! per-section audio files. Nothing is shared across concurrent requests;
//! the directory is removed when the request completes or fails.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::RequestId;

/// Temporary workspace for one narration request
#[derive(Debug)]
pub struct RequestContext {
    id: RequestId,
    dir: PathBuf,
}

impl RequestContext {
    /// Creates a fresh workspace under the system temp directory
    pub fn create() -> std::io::Result<Self> {
        let id = ulid::Ulid::new().to_string();
        let dir = std::env::temp_dir().join(format!("narracap-{}", id));
        std::fs::create_dir_all(&dir)?;
        debug!(request = %id, dir = %dir.display(), "Created request workspace");
        Ok(Self { id, dir })
    }

    /// Request identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Directory holding the request's temporary files
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    request = %self.id,
                    error = %e,
                    "Failed to remove request workspace"
                );
            }
        } else {
            debug!(request = %self.id, "Removed request workspace");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_created_and_removed() {
        let dir;
        {
            let ctx = RequestContext::create().unwrap();
            dir = ctx.dir().to_path_buf();
            assert!(dir.exists());
            assert!(!ctx.id().is_empty());
        }
        assert!(!dir.exists());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = RequestContext::create().unwrap();
        let b = RequestContext::create().unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.dir(), b.dir());
    }
}
