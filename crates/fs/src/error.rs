use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Step of an inspection that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading metadata or the link target.
    Stat,
    /// Reading file content for digests.
    Read,
    /// Writing a persisted record.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Stat => "stat",
            Stage::Read => "read",
            Stage::Write => "write",
        })
    }
}

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("stat {}: path not found: {source}", .path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{stage} {}: permission denied: {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: io::Error,
    },

    #[error("{stage} {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: io::Error,
    },

    #[error("stat {}: unsupported path kind", .path.display())]
    UnsupportedPath { path: PathBuf },

    #[error("read {}: not a file record: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl InspectError {
    /// Classify an I/O failure at `stage`, keeping the OS error as the source.
    pub(crate) fn from_io(path: impl Into<PathBuf>, stage: Stage, source: io::Error) -> Self {
        let path = path.into();
        match (stage, source.kind()) {
            (_, io::ErrorKind::PermissionDenied) => Self::PermissionDenied {
                path,
                stage,
                source,
            },
            (Stage::Stat, _) => Self::PathNotFound { path, source },
            _ => Self::Io {
                path,
                stage,
                source,
            },
        }
    }

    /// Stage the error was raised at. `Decode` counts as a read failure.
    pub fn stage(&self) -> Stage {
        match self {
            Self::PathNotFound { .. } | Self::UnsupportedPath { .. } => Stage::Stat,
            Self::PermissionDenied { stage, .. } | Self::Io { stage, .. } => *stage,
            Self::Decode { .. } => Stage::Read,
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;
