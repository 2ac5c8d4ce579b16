mod driver;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

pub use driver::DownloadDriver;

use crate::error::{MaskCheckError, Result};

/// Timing and retry policy for one export download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConfig {
    /// How long a single attempt may wait for the artifact.
    pub timeout: Duration,
    /// Recovery cycles after the first attempt times out.
    pub max_retries: u32,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

/// Observable phases of a download run, recorded in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    AttemptStarted(u32),
    AttemptTimedOut(u32),
    Recovering(u32),
    Succeeded(u32),
}

/// A finished download with its artifact and the run's retry history.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub artifact: PathBuf,
    pub attempts: u32,
    pub recovery_cycles: u32,
    pub transitions: Vec<DownloadState>,
}

/// Sequences trigger, bounded wait, and recovery over a driver.
///
/// Export generation on a loaded backend can stall past any reasonable
/// wait; a timed-out attempt is recovered (reload, refilter, reopen) and
/// retried up to the configured limit. Driver failures abort immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Downloader {
    config: DownloadConfig,
}

impl Downloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    pub async fn download(&self, driver: &mut dyn DownloadDriver) -> Result<DownloadOutcome> {
        let total_attempts = self.config.max_retries + 1;
        let mut transitions = Vec::new();
        let mut recovery_cycles = 0;

        for attempt in 1..=total_attempts {
            transitions.push(DownloadState::AttemptStarted(attempt));
            driver.trigger().await?;

            match tokio::time::timeout(self.config.timeout, driver.wait_for_artifact()).await {
                Ok(Ok(artifact)) => {
                    transitions.push(DownloadState::Succeeded(attempt));
                    info!(attempt, artifact = %artifact.display(), "export artifact received");
                    return Ok(DownloadOutcome {
                        artifact,
                        attempts: attempt,
                        recovery_cycles,
                        transitions,
                    });
                }
                Ok(Err(err)) => return Err(err),
                Err(_) => {
                    transitions.push(DownloadState::AttemptTimedOut(attempt));
                    warn!(
                        attempt,
                        timeout_secs = self.config.timeout.as_secs(),
                        "no artifact before timeout"
                    );
                    if attempt < total_attempts {
                        transitions.push(DownloadState::Recovering(attempt));
                        driver.recover().await?;
                        driver.restore_filter().await?;
                        recovery_cycles += 1;
                    }
                }
            }
        }

        Err(MaskCheckError::DownloadTimeout {
            attempts: total_attempts,
            timeout: self.config.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    enum Step {
        Ready(&'static str),
        Stall,
        Fail(&'static str),
    }

    struct ScriptedDriver {
        steps: Vec<Step>,
        triggers: u32,
        recoveries: u32,
    }

    impl ScriptedDriver {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps,
                triggers: 0,
                recoveries: 0,
            }
        }
    }

    #[async_trait]
    impl DownloadDriver for ScriptedDriver {
        async fn trigger(&mut self) -> Result<()> {
            self.triggers += 1;
            Ok(())
        }

        async fn wait_for_artifact(&mut self) -> Result<PathBuf> {
            let step = self.steps.remove(0);
            match step {
                Step::Ready(path) => Ok(PathBuf::from(path)),
                Step::Stall => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("stalled attempt must be cut off by the timeout")
                }
                Step::Fail(msg) => Err(MaskCheckError::Driver(msg.to_string())),
            }
        }

        async fn recover(&mut self) -> Result<()> {
            self.recoveries += 1;
            Ok(())
        }
    }

    fn downloader() -> Downloader {
        Downloader::new(DownloadConfig {
            timeout: Duration::from_secs(60),
            max_retries: 2,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success() {
        let mut driver = ScriptedDriver::new(vec![Step::Ready("export.zip")]);
        let outcome = downloader().download(&mut driver).await.unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.recovery_cycles, 0);
        assert_eq!(driver.triggers, 1);
        assert_eq!(
            outcome.transitions,
            vec![DownloadState::AttemptStarted(1), DownloadState::Succeeded(1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_timeouts_then_success() {
        let mut driver =
            ScriptedDriver::new(vec![Step::Stall, Step::Stall, Step::Ready("export.zip")]);
        let outcome = downloader().download(&mut driver).await.unwrap();
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.recovery_cycles, 2);
        assert_eq!(driver.triggers, 3);
        assert_eq!(driver.recoveries, 2);
        assert_eq!(
            outcome.transitions,
            vec![
                DownloadState::AttemptStarted(1),
                DownloadState::AttemptTimedOut(1),
                DownloadState::Recovering(1),
                DownloadState::AttemptStarted(2),
                DownloadState::AttemptTimedOut(2),
                DownloadState::Recovering(2),
                DownloadState::AttemptStarted(3),
                DownloadState::Succeeded(3),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_is_timeout_error() {
        let mut driver = ScriptedDriver::new(vec![Step::Stall, Step::Stall, Step::Stall]);
        let err = downloader().download(&mut driver).await.unwrap_err();
        match err {
            MaskCheckError::DownloadTimeout { attempts, timeout } => {
                assert_eq!(attempts, 3);
                assert_eq!(timeout, Duration::from_secs(60));
            }
            other => panic!("unexpected error: {}", other),
        }
        // The last timeout is terminal; no recovery follows it.
        assert_eq!(driver.recoveries, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_error_is_not_retried() {
        let mut driver = ScriptedDriver::new(vec![Step::Fail("dialog never opened")]);
        let err = downloader().download(&mut driver).await.unwrap_err();
        assert!(matches!(err, MaskCheckError::Driver(_)));
        assert_eq!(driver.triggers, 1);
        assert_eq!(driver.recoveries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_fails_after_one_attempt() {
        let mut driver = ScriptedDriver::new(vec![Step::Stall]);
        let downloader = Downloader::new(DownloadConfig {
            timeout: Duration::from_secs(10),
            max_retries: 0,
        });
        let err = downloader.download(&mut driver).await.unwrap_err();
        assert!(matches!(err, MaskCheckError::DownloadTimeout { attempts: 1, .. }));
    }
}
