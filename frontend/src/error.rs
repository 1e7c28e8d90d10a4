use thiserror::Error;

use crate::api::ApiError;

pub const SESSION_EXPIRED_MESSAGE: &str = "Sesi Anda telah berakhir. Silakan login kembali.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Koneksi bermasalah. Periksa koneksi internet Anda dan coba lagi.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Device(String),
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Message suitable for a toast, with transport failures collapsed into
    /// one friendly sentence.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(api) if api.is_network() => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Api(api) if api.is_unauthorized() => SESSION_EXPIRED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
