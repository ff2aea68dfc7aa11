/// Error types shared by every launcher component
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong inside the launcher.
///
/// `UnknownScreen` and `DuplicateName` are configuration mistakes caught while the
/// screen table is built; the rest are runtime conditions that are logged and
/// shown to the user without stopping the app.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// An audio or camera device could not be opened
    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: &'static str, reason: String },

    #[error("unknown screen: {0}")]
    UnknownScreen(String),

    #[error("screen already registered: {0}")]
    DuplicateName(String),

    /// Screens are only reachable from home, and only lead back to it
    #[error("cannot switch from {from} to {to} without going home")]
    InvalidTransition { from: &'static str, to: &'static str },

    /// The calculator buffer is not a valid expression, or divides by zero
    #[error("cannot evaluate expression: {0}")]
    Evaluation(String),

    /// The camera returned no frame for this read
    #[error("no frame available from capture device")]
    FrameUnavailable,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl LauncherError {
    pub fn audio(reason: impl ToString) -> Self {
        LauncherError::DeviceUnavailable {
            device: "audio",
            reason: reason.to_string(),
        }
    }

    pub fn camera(reason: impl ToString) -> Self {
        LauncherError::DeviceUnavailable {
            device: "camera",
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
