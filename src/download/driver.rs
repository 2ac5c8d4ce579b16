use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Browser-side actions the download orchestrator drives.
///
/// Implementations wrap whatever automation stack is in use; the
/// orchestrator only sequences them. Errors returned here are treated as
/// hard failures and are not retried; only an attempt that times out
/// without an artifact goes through the recovery cycle.
#[async_trait]
pub trait DownloadDriver: Send {
    /// Open the export dialog and start the download.
    async fn trigger(&mut self) -> Result<()>;

    /// Resolve with the artifact path once the download completes.
    async fn wait_for_artifact(&mut self) -> Result<PathBuf>;

    /// Put the page back into a state where `trigger` can run again:
    /// reload, reapply the customer filter, reopen the export dialog.
    async fn recover(&mut self) -> Result<()>;

    /// Reapply any list filter lost by the recovery reload. No-op for
    /// drivers whose `recover` already restores it.
    async fn restore_filter(&mut self) -> Result<()> {
        Ok(())
    }
}
