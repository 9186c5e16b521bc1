use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 單一檔案轉換過程中可能發生的錯誤
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("automation host failed during {step}: {message}")]
    Automation { step: &'static str, message: String },

    #[error("{host} host is not available: {reason}")]
    HostUnavailable { host: &'static str, reason: String },

    #[error("converted file not found at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConvertError {
    pub fn automation(step: &'static str, message: impl Into<String>) -> Self {
        ConvertError::Automation { step, message: message.into() }
    }
}
