//! Error types raised locally by the resolver, the registry loader and the docs table.

use std::path::PathBuf;

use thiserror::Error;

/// Validation and lookup failures raised before anything reaches the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoBoundariesError {
  /// Country code was not three upper-case characters.
  #[error("<iso> must be a String of length 3 that is upper case, got {0:?}")]
  InvalidCountryCode(String),
  /// Administrative level was not one of `ADM0`..`ADM4`.
  #[error("<level> must look like 'ADM0', 'ADM1', ..., 'ADM4', got {0:?}")]
  InvalidLevel(String),
  /// Documentation was requested for a function that does not exist.
  #[error("function <{0}> does not have documentation")]
  UnknownFunction(String),
}

/// Errors that can occur while loading a known-assets registry file.
#[derive(Debug, Error)]
pub enum KnownAssetsError {
  /// Failed to read the registry file from disk.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse a JSON registry file.
  #[error("failed to parse {}: {source}", path.display())]
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// Failed to parse a YAML registry file.
  #[error("failed to parse {}: {source}", path.display())]
  Yaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_yaml::Error,
  },
}

/// Result alias for operations that only fail local validation.
pub type Result<T> = std::result::Result<T, GeoBoundariesError>;
