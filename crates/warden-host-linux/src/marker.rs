//! Maintenance marker probe

use std::io::ErrorKind;
use std::path::Path;
use warden_host_api::{HostResult, MAINTENANCE_MARKER};

/// Checks for the marker file directly under a server directory
#[derive(Debug, Clone, Default)]
pub struct FsMarker;

impl FsMarker {
    pub async fn present(&self, server_dir: &Path) -> HostResult<bool> {
        match tokio::fs::metadata(server_dir.join(MAINTENANCE_MARKER)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn marker_presence() {
        let dir = tempfile::tempdir().unwrap();
        let marker = FsMarker;

        assert!(!marker.present(dir.path()).await.unwrap());
        std::fs::write(dir.path().join(MAINTENANCE_MARKER), "").unwrap();
        assert!(marker.present(dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn missing_server_dir_is_not_locked() {
        let marker = FsMarker;
        assert!(!marker
            .present(Path::new("/nonexistent/warden/survival"))
            .await
            .unwrap());
    }
}
