//! Configuration loading
//!
//! Discovery walks from the starting directory toward the filesystem root,
//! checking `.rarc`, `.reactanalyzerrc.json`, then `react-analyzer.json` in
//! each directory. Path aliases have their own fallback chain that ends at
//! `tsconfig.json` (parsed comment-tolerant). A malformed config file is
//! fatal for the run; a missing one means defaults.

use crate::error::{AnalyzerError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names checked in each directory, in precedence order
const CONFIG_FILES: &[&str] = &[".rarc", ".reactanalyzerrc.json", "react-analyzer.json"];

/// Alias sources; includes the legacy name and finally tsconfig
const ALIAS_CONFIG_FILES: &[&str] = &[".rarc", ".reactanalyzerrc.json", ".reactanalyzer.json"];

/// Directories always excluded from analysis
pub const ALWAYS_IGNORED: &[&str] = &["node_modules", "dist", "build", ".git"];

pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Per-rule settings: the enabled flag plus the rule's option bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSettings {
  pub enabled: bool,
  /// `deep-prop-drilling` only: chain-length budget
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_depth: Option<usize>,
}

impl Default for RuleSettings {
  fn default() -> Self {
    Self {
      enabled: true,
      max_depth: None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
  pub base_url: String,
  /// Alias pattern -> target patterns, both possibly carrying one `*` glob
  pub paths: IndexMap<String, Vec<String>>,
}

impl Default for CompilerOptions {
  fn default() -> Self {
    Self {
      base_url: ".".to_string(),
      paths: IndexMap::new(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
  pub rules: IndexMap<String, RuleSettings>,
  pub compiler_options: CompilerOptions,
  pub ignore: Vec<String>,
}

impl AnalyzerConfig {
  /// Rules not mentioned in the config are enabled
  pub fn rule_enabled(&self, rule_id: &str) -> bool {
    self
      .rules
      .get(rule_id)
      .map(|settings| settings.enabled)
      .unwrap_or(true)
  }

  pub fn max_depth(&self) -> usize {
    self
      .rules
      .get("deep-prop-drilling")
      .and_then(|settings| settings.max_depth)
      .unwrap_or(DEFAULT_MAX_DEPTH)
  }

  /// Discover and load configuration starting from a directory
  pub fn discover(start_dir: &Path) -> Result<AnalyzerConfig> {
    let mut config = match find_upward(start_dir, CONFIG_FILES) {
      Some(path) => {
        debug!("Loading configuration from {:?}", path);
        load_config_file(&path)?
      }
      None => {
        debug!("No configuration file found; using defaults");
        AnalyzerConfig::default()
      }
    };

    // Path aliases fall back through the legacy name and tsconfig.json
    if config.compiler_options.paths.is_empty() {
      if let Some(options) = discover_aliases(start_dir)? {
        config.compiler_options = options;
      }
    }

    Ok(config)
  }
}

fn find_upward(start_dir: &Path, names: &[&str]) -> Option<PathBuf> {
  let mut dir = Some(start_dir);
  while let Some(current) = dir {
    for name in names {
      let candidate = current.join(name);
      if candidate.is_file() {
        return Some(candidate);
      }
    }
    dir = current.parent();
  }
  None
}

fn load_config_file(path: &Path) -> Result<AnalyzerConfig> {
  let content = fs::read_to_string(path)?;
  serde_json::from_str(&content).map_err(|e| {
    AnalyzerError::InvalidConfig(format!("{}: {}", path.display(), e))
  })
}

/// `tsconfig.json` subset we care about; comments are stripped before parsing
#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct TsconfigFile {
  compiler_options: TsconfigCompilerOptions,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct TsconfigCompilerOptions {
  base_url: Option<String>,
  paths: Option<IndexMap<String, Vec<String>>>,
}

fn discover_aliases(start_dir: &Path) -> Result<Option<CompilerOptions>> {
  let mut dir = Some(start_dir);
  while let Some(current) = dir {
    for name in ALIAS_CONFIG_FILES {
      let candidate = current.join(name);
      if !candidate.is_file() {
        continue;
      }
      let config = load_config_file(&candidate)?;
      if !config.compiler_options.paths.is_empty() {
        debug!("Path aliases from {:?}", candidate);
        return Ok(Some(config.compiler_options));
      }
    }

    let tsconfig = current.join("tsconfig.json");
    if tsconfig.is_file() {
      let mut content = fs::read_to_string(&tsconfig)?;
      json_strip_comments::strip(&mut content)
        .map_err(|e| AnalyzerError::InvalidConfig(format!("{}: {}", tsconfig.display(), e)))?;
      let parsed: TsconfigFile = serde_json::from_str(&content).map_err(|e| {
        AnalyzerError::InvalidConfig(format!("{}: {}", tsconfig.display(), e))
      })?;
      if let Some(paths) = parsed.compiler_options.paths {
        if !paths.is_empty() {
          debug!("Path aliases from {:?}", tsconfig);
          return Ok(Some(CompilerOptions {
            base_url: parsed.compiler_options.base_url.unwrap_or_else(|| ".".to_string()),
            paths,
          }));
        }
      }
    }

    dir = current.parent();
  }

  Ok(None)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_defaults_when_nothing_found() {
    let temp_dir = TempDir::new().unwrap();
    let config = AnalyzerConfig::discover(temp_dir.path()).unwrap();

    assert!(config.rules.is_empty());
    assert!(config.rule_enabled("deep-prop-drilling"));
    assert!(config.rule_enabled("no-inline-props"));
    assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
    assert_eq!(config.compiler_options.base_url, ".");
  }

  #[test]
  fn test_rarc_takes_precedence() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
      temp_dir.path().join(".rarc"),
      r#"{ "rules": { "no-inline-props": { "enabled": false } } }"#,
    )
    .unwrap();
    fs::write(
      temp_dir.path().join(".reactanalyzerrc.json"),
      r#"{ "rules": { "no-inline-props": { "enabled": true } } }"#,
    )
    .unwrap();

    let config = AnalyzerConfig::discover(temp_dir.path()).unwrap();
    assert!(!config.rule_enabled("no-inline-props"));
    assert!(config.rule_enabled("deep-prop-drilling"));
  }

  #[test]
  fn test_discovery_walks_upward() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("packages").join("web").join("src");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
      temp_dir.path().join("react-analyzer.json"),
      r#"{ "rules": { "deep-prop-drilling": { "enabled": true, "maxDepth": 5 } } }"#,
    )
    .unwrap();

    let config = AnalyzerConfig::discover(&nested).unwrap();
    assert_eq!(config.max_depth(), 5);
  }

  #[test]
  fn test_malformed_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".rarc"), "{ not json").unwrap();

    let err = AnalyzerConfig::discover(temp_dir.path()).unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidConfig(_)));
  }

  #[test]
  fn test_aliases_fall_back_to_tsconfig() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
      temp_dir.path().join("tsconfig.json"),
      r#"{
  // comment-tolerant parse
  "compilerOptions": {
    "baseUrl": ".",
    "paths": { "@/*": ["src/*"] }
  }
}"#,
    )
    .unwrap();

    let config = AnalyzerConfig::discover(temp_dir.path()).unwrap();
    assert_eq!(
      config.compiler_options.paths.get("@/*"),
      Some(&vec!["src/*".to_string()])
    );
  }

  #[test]
  fn test_rarc_aliases_beat_tsconfig() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
      temp_dir.path().join(".rarc"),
      r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "~/*": ["app/*"] } } }"#,
    )
    .unwrap();
    fs::write(
      temp_dir.path().join("tsconfig.json"),
      r#"{ "compilerOptions": { "paths": { "@/*": ["src/*"] } } }"#,
    )
    .unwrap();

    let config = AnalyzerConfig::discover(temp_dir.path()).unwrap();
    assert!(config.compiler_options.paths.contains_key("~/*"));
    assert!(!config.compiler_options.paths.contains_key("@/*"));
  }
}
