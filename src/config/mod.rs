use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::download::DownloadConfig;
use crate::error::{MaskCheckError, Result};

/// Environment-specific verification settings, loaded from a YAML
/// profile. Every field has a default matching the staging environment,
/// so an empty profile is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VerifyProfile {
    /// File-name prefix of export artifacts, e.g. `vespistiid-customer`
    /// producing `vespistiid-customer_export_2024-01-15.zip`.
    pub product_prefix: String,
    /// Workbook passphrase for the encrypted export.
    pub passphrase: String,
    pub download: DownloadSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DownloadSettings {
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for VerifyProfile {
    fn default() -> Self {
        Self {
            product_prefix: "vespistiid-customer".to_string(),
            passphrase: "TEST".to_string(),
            download: DownloadSettings::default(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

impl VerifyProfile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|_| MaskCheckError::ProfileNotFound(path.display().to_string()))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            timeout: Duration::from_secs(self.download.timeout_secs),
            max_retries: self.download.max_retries,
        }
    }
}
