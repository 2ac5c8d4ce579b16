mod decode;

use std::time::Duration;
use thiserror::Error;

pub use decode::DecodeError;

use crate::policy::MaskMode;
use crate::record::Channel;
use crate::verify::ConsistencyError;

#[derive(Error, Debug)]
pub enum MaskCheckError {
    #[error("format error under {mode:?}: {reason} (value: {value:?})")]
    Format {
        mode: MaskMode,
        value: String,
        reason: String,
    },

    #[error("extraction error: {channel} channel is missing {key}")]
    Extraction { channel: Channel, key: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("download timed out: no artifact-ready signal after {attempts} attempts ({timeout:?} each)")]
    DownloadTimeout { attempts: u32, timeout: Duration },

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error("download driver error: {0}")]
    Driver(String),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaskCheckError {
    pub fn missing(channel: Channel, key: impl Into<String>) -> Self {
        Self::Extraction {
            channel,
            key: key.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MaskCheckError>;
