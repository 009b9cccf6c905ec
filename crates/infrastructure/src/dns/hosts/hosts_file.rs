use arc_swap::ArcSwap;
use async_trait::async_trait;
use dnsproxy_application::ports::{HostsLookup, HostsReloadPort, ReloadOutcome};
use dnsproxy_domain::config::HostsConfig;
use dnsproxy_domain::{DomainError, HostTable};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileFingerprint {
    modified: SystemTime,
    size: u64,
}

/// Host table backed by a file on disk.
///
/// Lookups read the current snapshot without locking. A reload parses the
/// new table completely before swapping it in.
pub struct HostsFile {
    path: Option<PathBuf>,
    table: ArcSwap<HostTable>,
    fingerprint: Mutex<Option<FileFingerprint>>,
}

impl HostsFile {
    /// Empty table that never reloads.
    pub fn empty() -> Self {
        Self {
            path: None,
            table: ArcSwap::from_pointee(HostTable::default()),
            fingerprint: Mutex::new(None),
        }
    }

    /// Reads and parses `path`. Any failure is returned.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let fingerprint = stat(&path).await?;
        let table = read_table(&path).await?;

        info!(
            path = %path.display(),
            entries = table.len(),
            "Hosts file loaded"
        );

        Ok(Self {
            path: Some(path),
            table: ArcSwap::from_pointee(table),
            fingerprint: Mutex::new(Some(fingerprint)),
        })
    }

    pub async fn from_config(config: &HostsConfig) -> Result<Self, DomainError> {
        match config.path.as_deref() {
            Some(path) => Self::open(path).await,
            None => Ok(Self::empty()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> Arc<HostTable> {
        self.table.load_full()
    }
}

async fn stat(path: &Path) -> Result<FileFingerprint, DomainError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| DomainError::IoError(format!("stat {}: {}", path.display(), e)))?;
    let modified = metadata
        .modified()
        .map_err(|e| DomainError::IoError(format!("mtime of {}: {}", path.display(), e)))?;

    Ok(FileFingerprint {
        modified,
        size: metadata.len(),
    })
}

async fn read_table(path: &Path) -> Result<HostTable, DomainError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::IoError(format!("read {}: {}", path.display(), e)))?;
    HostTable::parse(&text)
}

impl HostsLookup for HostsFile {
    fn find_hosts(&self, name: &str) -> Vec<IpAddr> {
        self.table.load().find_hosts(name)
    }

    fn find_reverse(&self, name: &str) -> Option<String> {
        self.table.load().find_reverse(name)
    }
}

#[async_trait]
impl HostsReloadPort for HostsFile {
    async fn reload_if_changed(&self) -> Result<ReloadOutcome, DomainError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(ReloadOutcome::Unchanged);
        };

        let mut recorded = self.fingerprint.lock().await;
        let current = stat(path).await?;
        if *recorded == Some(current) {
            return Ok(ReloadOutcome::Unchanged);
        }

        debug!(path = %path.display(), "Hosts file changed, reloading");
        *recorded = Some(current);

        match read_table(path).await {
            Ok(table) => {
                let entries = table.len();
                self.table.store(Arc::new(table));
                info!(path = %path.display(), entries, "Hosts file reloaded");
                Ok(ReloadOutcome::Reloaded { entries })
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "Hosts file reload failed, keeping previous table"
                );
                Err(e)
            }
        }
    }
}
