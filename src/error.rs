use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Analysis root not found: {0}")]
  RootNotFound(PathBuf),

  #[error("Parse error: {0}")]
  Parse(String),

  #[error("Module resolution error: {0}")]
  ModuleResolution(String),

  #[error("{0}")]
  Other(String),
}

impl AnalyzerError {
  /// Stable kind tag used in the machine-readable error record
  pub fn kind(&self) -> &'static str {
    match self {
      AnalyzerError::Io(_) => "io",
      AnalyzerError::InvalidConfig(_) => "config",
      AnalyzerError::RootNotFound(_) => "root-not-found",
      AnalyzerError::Parse(_) => "parse",
      AnalyzerError::ModuleResolution(_) => "resolution",
      AnalyzerError::Other(_) => "internal",
    }
  }

  /// Path associated with the error, when there is one
  pub fn path(&self) -> Option<&PathBuf> {
    match self {
      AnalyzerError::RootNotFound(path) => Some(path),
      _ => None,
    }
  }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
