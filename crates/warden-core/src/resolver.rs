//! Alias resolution

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use warden_config::ServerConfig;
use warden_host_api::{CommandRunner, HostAdapter, HostError};

use crate::{ResolutionFailed, ServerHandle};

/// Maps the configured alias to the server directory it currently points at
pub struct Resolver {
    host: Arc<dyn HostAdapter>,
    base: PathBuf,
    alias: String,
    address: String,
}

impl Resolver {
    pub fn new(
        host: Arc<dyn HostAdapter>,
        base: impl Into<PathBuf>,
        alias: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            host,
            base: base.into(),
            alias: alias.into(),
            address: address.into(),
        }
    }

    pub fn from_config(host: Arc<dyn HostAdapter>, config: &ServerConfig) -> Self {
        Self::new(host, &config.base_dir, &config.alias, &config.address)
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub async fn resolve(&self) -> Result<ServerHandle, ResolutionFailed> {
        resolve(self.host.as_ref(), &self.base, &self.alias, &self.address).await
    }
}

/// Canonicalize `base/alias` and build a handle from the final path component
///
/// Issues exactly one read-only command. Nothing is cached: every call sees
/// the alias as it is right now.
pub async fn resolve<R: CommandRunner + ?Sized>(
    runner: &R,
    base: &Path,
    alias: &str,
    address: &str,
) -> Result<ServerHandle, ResolutionFailed> {
    let link = base.join(alias);
    let fail = |source: HostError| ResolutionFailed {
        alias: alias.to_string(),
        source,
    };

    let output = runner
        .run_capture(
            "realpath",
            &["-e".to_string(), "--".to_string(), link.display().to_string()],
        )
        .await
        .map_err(fail)?;

    let target = output.trim();
    if target.is_empty() {
        return Err(fail(HostError::Parse("realpath printed nothing".into())));
    }

    let name = Path::new(target)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| fail(HostError::Parse(format!("no server name in '{target}'"))))?;

    debug!(alias, server = %name, "Resolved server alias");
    Ok(ServerHandle::new(base, name, address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_host_api::{MockCall, MockHost};

    #[tokio::test]
    async fn resolves_alias_to_final_component() {
        let host = MockHost::new();
        host.point("/opt/paper/current", "/opt/paper/survival");

        let handle = resolve(&host, Path::new("/opt/paper"), "current", "mc.example.org")
            .await
            .unwrap();

        assert_eq!(
            handle,
            ServerHandle::new("/opt/paper", "survival", "mc.example.org")
        );
        assert_eq!(
            host.calls(),
            vec![MockCall::Capture {
                program: "realpath".into(),
                args: vec!["-e".into(), "--".into(), "/opt/paper/current".into()],
            }]
        );
    }

    #[tokio::test]
    async fn dangling_alias_fails() {
        let host = MockHost::new();
        let err = resolve(&host, Path::new("/opt/paper"), "current", "mc.example.org")
            .await
            .unwrap_err();
        assert_eq!(err.alias, "current");
        assert!(matches!(err.source, HostError::NonZeroExit { .. }));
    }

    #[tokio::test]
    async fn root_target_has_no_name() {
        let host = MockHost::new();
        host.point("/opt/paper/current", "/");
        let err = resolve(&host, Path::new("/opt/paper"), "current", "mc.example.org")
            .await
            .unwrap_err();
        assert!(matches!(err.source, HostError::Parse(_)));
    }

    #[tokio::test]
    async fn every_resolution_hits_the_filesystem() {
        let host = Arc::new(MockHost::new());
        host.point("/opt/paper/current", "/opt/paper/survival");
        let resolver = Resolver::new(host.clone(), "/opt/paper", "current", "mc.example.org");

        assert_eq!(resolver.resolve().await.unwrap().name, "survival");
        host.point("/opt/paper/current", "/opt/paper/creative");
        assert_eq!(resolver.resolve().await.unwrap().name, "creative");
        assert_eq!(host.calls().len(), 2);
    }
}
