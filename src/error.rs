//! Error types for the installer coordinator

use std::fmt;

/// Error type for installer operations
#[derive(Debug, Clone)]
pub struct InstallerError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of installer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing argument in a request bag
    InvalidArgument,
    /// File system error (missing file, permission denied, etc.)
    FileSystem,
    /// APK install failed to start or run
    Install,
    /// Download failed to start or run
    Download,
    /// App market could not be opened
    Market,
    /// Event or result channel closed unexpectedly
    Channel,
    /// Unknown error
    Unknown,
}

impl InstallerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn file_system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileSystem, message)
    }

    pub fn install(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Install, message)
    }

    pub fn download(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Download, message)
    }

    pub fn market(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Market, message)
    }

    pub fn channel(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Channel, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }
}

impl fmt::Display for InstallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for InstallerError {}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        Self::file_system(err.to_string())
    }
}

/// Result type for installer operations
pub type Result<T> = std::result::Result<T, InstallerError>;
