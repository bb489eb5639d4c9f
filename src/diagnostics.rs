//! Diagnostic model and serialization contract
//!
//! Diagnostics are plain values with a total order: `(filePath, line,
//! column, rule)`. Severity is engine-internal (the CLI colors with it); the
//! machine-readable issue shape carries exactly the contract fields.

use crate::error::AnalyzerError;
use crate::graph::ProjectGraph;
use crate::source::model::Location;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Hint,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedLocation {
  pub file_path: PathBuf,
  pub line: u32,
  pub column: u32,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  pub rule: String,
  pub message: String,
  pub file_path: PathBuf,
  pub line: u32,
  pub column: u32,
  pub related: Vec<RelatedLocation>,
  #[serde(skip)]
  pub severity: Severity,
}

impl Diagnostic {
  pub fn new(rule: &str, severity: Severity, message: String, location: &Location) -> Self {
    Self {
      rule: rule.to_string(),
      message,
      file_path: location.file_path.clone(),
      line: location.line,
      column: location.column,
      related: Vec::new(),
      severity,
    }
  }

  pub fn related(mut self, location: &Location, message: impl Into<String>) -> Self {
    self.related.push(RelatedLocation {
      file_path: location.file_path.clone(),
      line: location.line,
      column: location.column,
      message: message.into(),
    });
    self
  }
}

/// Total order over the aggregated sequence; deterministic for a given
/// corpus regardless of worker count
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
  diagnostics.sort_by(|a, b| {
    a.file_path
      .cmp(&b.file_path)
      .then(a.line.cmp(&b.line))
      .then(a.column.cmp(&b.column))
      .then(a.rule.cmp(&b.rule))
  });
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
  pub files_analyzed: usize,
  pub files_with_issues: usize,
  pub files_clean: usize,
  pub total_issues: usize,
  pub duration_ms: u64,
}

/// Machine-readable report shape
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
  pub issues: &'a [Diagnostic],
  pub stats: &'a AnalysisStats,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub graph: Option<&'a ProjectGraph>,
}

/// Machine-readable engine error record
#[derive(Serialize)]
pub struct ErrorReport {
  pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
  pub kind: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<PathBuf>,
}

impl ErrorReport {
  pub fn from_error(error: &AnalyzerError) -> Self {
    Self {
      error: ErrorBody {
        kind: error.kind().to_string(),
        message: error.to_string(),
        path: error.path().cloned(),
      },
    }
  }
}

/// Engine-level diagnostic for a rule that failed internally
pub fn engine_internal(file: &Path, rule_id: &str) -> Diagnostic {
  Diagnostic {
    rule: "engine/internal".to_string(),
    message: format!("rule '{}' failed internally; analysis continued", rule_id),
    file_path: file.to_path_buf(),
    line: 1,
    column: 0,
    related: Vec::new(),
    severity: Severity::Error,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn diag(file: &str, line: u32, column: u32, rule: &str) -> Diagnostic {
    Diagnostic {
      rule: rule.to_string(),
      message: String::new(),
      file_path: PathBuf::from(file),
      line,
      column,
      related: Vec::new(),
      severity: Severity::Warning,
    }
  }

  #[test]
  fn test_total_order() {
    let mut diagnostics = vec![
      diag("/b.tsx", 1, 0, "x"),
      diag("/a.tsx", 2, 4, "b"),
      diag("/a.tsx", 2, 4, "a"),
      diag("/a.tsx", 1, 9, "z"),
    ];
    sort_diagnostics(&mut diagnostics);

    let keys: Vec<_> = diagnostics
      .iter()
      .map(|d| (d.file_path.clone(), d.line, d.column, d.rule.clone()))
      .collect();
    assert_eq!(
      keys,
      vec![
        (PathBuf::from("/a.tsx"), 1, 9, "z".to_string()),
        (PathBuf::from("/a.tsx"), 2, 4, "a".to_string()),
        (PathBuf::from("/a.tsx"), 2, 4, "b".to_string()),
        (PathBuf::from("/b.tsx"), 1, 0, "x".to_string()),
      ]
    );
  }

  #[test]
  fn test_issue_serialization_shape() {
    let location = Location {
      file_path: PathBuf::from("/p/App.tsx"),
      line: 3,
      column: 7,
      component: Some("App".to_string()),
    };
    let diagnostic = Diagnostic::new(
      "no-inline-props",
      Severity::Warning,
      "inline object".to_string(),
      &location,
    );

    let json = serde_json::to_value(&diagnostic).unwrap();
    assert_eq!(json["rule"], "no-inline-props");
    assert_eq!(json["filePath"], "/p/App.tsx");
    assert_eq!(json["line"], 3);
    assert_eq!(json["column"], 7);
    // Severity stays engine-internal
    assert!(json.get("severity").is_none());
  }
}
