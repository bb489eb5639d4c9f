use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_project(files: &[(&str, &str)]) -> TempDir {
  let dir = TempDir::new().expect("Failed to create temp dir");
  for (relative, content) in files {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }
  dir
}

fn analyzer() -> Command {
  Command::cargo_bin("react-analyzer").expect("binary builds")
}

const CLEAN_APP: &str = r#"
export function App() {
  return <main>ok</main>;
}
"#;

const NOISY_APP: &str = r#"
import { memo } from 'react';

const Child = memo(({ config }) => <div>{config.theme}</div>);

export function App() {
  return <Child config={{ theme: 'dark' }} />;
}
"#;

#[test]
fn test_clean_project_exits_zero() {
  let dir = write_project(&[("App.tsx", CLEAN_APP)]);

  analyzer()
    .arg(dir.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_issues_exit_one_with_human_output() {
  let dir = write_project(&[("App.tsx", NOISY_APP)]);

  analyzer()
    .arg(dir.path())
    .assert()
    .code(1)
    .stdout(predicate::str::contains("unstable-props-to-memo"))
    .stdout(predicate::str::contains("App.tsx"));
}

#[test]
fn test_json_output_shape() {
  let dir = write_project(&[("App.tsx", NOISY_APP)]);

  let output = analyzer()
    .arg(dir.path())
    .arg("--json")
    .assert()
    .code(1)
    .get_output()
    .stdout
    .clone();

  let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
  let issues = report["issues"].as_array().expect("issues array");
  assert!(!issues.is_empty());
  for issue in issues {
    assert!(issue["rule"].is_string());
    assert!(issue["message"].is_string());
    assert!(issue["filePath"].as_str().unwrap().starts_with('/'));
    assert!(issue["line"].as_u64().unwrap() >= 1);
    assert!(issue["column"].is_u64());
    assert!(issue["related"].is_array());
  }

  let stats = &report["stats"];
  assert_eq!(stats["filesAnalyzed"], 1);
  assert_eq!(stats["filesWithIssues"], 1);
  assert_eq!(stats["filesClean"], 0);
  assert!(stats["totalIssues"].as_u64().unwrap() >= 1);
  assert!(stats["durationMs"].is_u64());

  // Graph only present when asked for
  assert!(report.get("graph").is_none());
}

#[test]
fn test_json_graph_included_on_request() {
  let dir = write_project(&[("App.tsx", NOISY_APP)]);

  let output = analyzer()
    .arg(dir.path())
    .arg("--json")
    .arg("--graph")
    .assert()
    .code(1)
    .get_output()
    .stdout
    .clone();

  let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
  let graph = &report["graph"];
  assert!(graph["componentNodes"].is_object());
  assert!(graph["stateNodes"].is_object());
  assert!(graph["edges"].is_array());
}

#[test]
fn test_missing_root_exits_two() {
  analyzer()
    .arg("/definitely/not/a/real/path")
    .assert()
    .code(2)
    .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_malformed_config_exits_two() {
  let dir = write_project(&[("App.tsx", CLEAN_APP), (".rarc", "{ broken")]);

  analyzer().arg(dir.path()).assert().code(2);
}

#[test]
fn test_json_error_record() {
  let output = analyzer()
    .arg("/definitely/not/a/real/path")
    .arg("--json")
    .assert()
    .code(2)
    .get_output()
    .stdout
    .clone();

  let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
  assert_eq!(report["error"]["kind"], "root-not-found");
  assert!(report["error"]["message"].is_string());
}

#[test]
fn test_disabled_rule_via_config_file() {
  let dir = write_project(&[
    ("App.tsx", NOISY_APP),
    (
      ".rarc",
      r#"{ "rules": { "unstable-props-to-memo": { "enabled": false }, "no-inline-props": { "enabled": false } } }"#,
    ),
  ]);

  analyzer()
    .arg(dir.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("No issues found"));
}
