use react_analyzer::config::RuleSettings;
use react_analyzer::core::{analyze, AnalysisOutcome, AnalyzeOptions, CancelFlag};
use react_analyzer::diagnostics::Diagnostic;
use react_analyzer::graph::{EdgeKind, Stability, StabilityReason};
use react_analyzer::AnalyzerConfig;
use std::fs;
use tempfile::TempDir;

/// Write a fixture project into a temp dir
fn project(files: &[(&str, &str)]) -> TempDir {
  let dir = TempDir::new().expect("Failed to create temp dir");
  for (relative, content) in files {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("Failed to create fixture dirs");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
  }
  dir
}

fn run(dir: &TempDir) -> AnalysisOutcome {
  run_with(dir, AnalyzerConfig::default(), false)
}

fn run_with(dir: &TempDir, config: AnalyzerConfig, include_graph: bool) -> AnalysisOutcome {
  analyze(&AnalyzeOptions {
    paths: vec![dir.path().to_path_buf()],
    config,
    include_graph,
    severity_threshold: None,
    cancel: CancelFlag::new(),
  })
  .expect("analysis failed")
}

fn of_rule<'a>(outcome: &'a AnalysisOutcome, rule: &str) -> Vec<&'a Diagnostic> {
  outcome
    .diagnostics
    .iter()
    .filter(|d| d.rule == rule)
    .collect()
}

fn config_with_max_depth(max_depth: usize) -> AnalyzerConfig {
  let mut config = AnalyzerConfig::default();
  config.rules.insert(
    "deep-prop-drilling".to_string(),
    RuleSettings {
      enabled: true,
      max_depth: Some(max_depth),
    },
  );
  config
}

// --- Scenario 1: simple 3-level drilling -----------------------------------

const DRILLING_APP: &str = r#"
import { useState } from 'react';

function Display({ count }) {
  return <span>{count}</span>;
}

function Child({ count }) {
  return <Display count={count} />;
}

function Parent({ count }) {
  return <Child count={count} />;
}

export function App() {
  const [count, setCount] = useState(0);
  return <Parent count={count} />;
}
"#;

#[test]
fn test_simple_three_level_drilling() {
  let dir = project(&[("App.tsx", DRILLING_APP)]);
  let outcome = run(&dir);

  let drilling = of_rule(&outcome, "deep-prop-drilling");
  assert_eq!(drilling.len(), 1, "expected exactly one drilling diagnostic");

  let diagnostic = drilling[0];
  assert!(diagnostic.message.contains("count"));
  assert!(diagnostic.message.contains("App"));
  assert!(diagnostic.message.contains("Display"));
  // Anchored at the origin JSX attribute: <Parent count={count} />
  let origin_line = DRILLING_APP
    .lines()
    .position(|l| l.contains("<Parent count="))
    .unwrap() as u32
    + 1;
  assert_eq!(diagnostic.line, origin_line);
  // Parent and Child are the passthroughs
  assert_eq!(diagnostic.related.len(), 2);
}

// --- Scenario 2: partial usage ----------------------------------------------

#[test]
fn test_partial_usage_is_not_drilling() {
  let dir = project(&[(
    "App.tsx",
    r#"
import { useState } from 'react';

function Display({ theme }) {
  return <div className={theme} />;
}

function Parent({ theme }) {
  const cls = theme === 'dark' ? 'dark-bg' : 'light-bg';
  return (
    <section className={cls}>
      <Display theme={theme} />
    </section>
  );
}

export function App() {
  const [theme, setTheme] = useState('light');
  return <Parent theme={theme} />;
}
"#,
  )]);
  let outcome = run(&dir);

  assert!(of_rule(&outcome, "deep-prop-drilling").is_empty());
}

// --- Scenario 3: cross-file drilling ----------------------------------------

#[test]
fn test_cross_file_drilling() {
  let dir = project(&[
    (
      "App.tsx",
      r#"
import { useState } from 'react';
import Dashboard from './Dashboard';

export function App() {
  const [theme, setTheme] = useState('dark');
  return <Dashboard theme={theme} />;
}
"#,
    ),
    (
      "Dashboard.tsx",
      r#"
import { SideNav as Sidebar } from './Sidebar';

export default function Dashboard({ theme }) {
  return <Sidebar theme={theme} />;
}
"#,
    ),
    (
      "Sidebar.tsx",
      r#"
export function SideNav({ theme }) {
  return <aside className={theme} />;
}
"#,
    ),
  ]);
  let outcome = run(&dir);

  let drilling = of_rule(&outcome, "deep-prop-drilling");
  assert_eq!(drilling.len(), 1);

  let diagnostic = drilling[0];
  assert!(diagnostic.file_path.ends_with("App.tsx"));
  // Dashboard is the single passthrough
  assert_eq!(diagnostic.related.len(), 1);
  assert!(diagnostic.related[0].message.contains("Dashboard"));
}

// --- Scenario 4: memo break via inline prop ---------------------------------

const MEMO_APP: &str = r#"
import { memo } from 'react';

const Child = memo(({ config }) => <div>{config.theme}</div>);

export function App() {
  return <Child config={{ theme: 'dark' }} />;
}
"#;

#[test]
fn test_memo_break_via_inline_prop() {
  let dir = project(&[("App.tsx", MEMO_APP)]);
  let outcome = run_with(&dir, AnalyzerConfig::default(), true);

  let memo_breaks = of_rule(&outcome, "unstable-props-to-memo");
  assert_eq!(memo_breaks.len(), 1);
  assert!(memo_breaks[0].message.contains("config"));
  assert!(memo_breaks[0].message.contains("Child"));
  assert_eq!(memo_breaks[0].related.len(), 1);

  // The corresponding passes edge carries the evidence
  let graph = outcome.graph.expect("graph requested");
  let edge = graph
    .edges_of_kind(EdgeKind::Passes)
    .find(|edge| edge.prop_name.as_deref() == Some("config"))
    .expect("config passes edge");
  assert_eq!(edge.breaks_memoization, Some(true));
  assert_eq!(edge.stability, Some(Stability::Unstable));
  assert_eq!(edge.reason, Some(StabilityReason::InlineObject));
}

#[test]
fn test_non_memoized_target_never_flagged() {
  let dir = project(&[(
    "App.tsx",
    r#"
const Child = ({ config }) => <div>{config.theme}</div>;

export function App() {
  return <Child config={{ theme: 'dark' }} />;
}
"#,
  )]);
  let outcome = run(&dir);

  assert!(of_rule(&outcome, "unstable-props-to-memo").is_empty());
}

// --- Scenario 5: inline object in dependency array --------------------------

#[test]
fn test_inline_object_dependency() {
  let dir = project(&[(
    "Profile.tsx",
    r#"
import { useEffect } from 'react';

export function Profile({ userId }) {
  useEffect(() => {
    console.log(userId);
  }, [{ userId }]);
  return <div />;
}
"#,
  )]);
  let outcome = run(&dir);

  let object_deps = of_rule(&outcome, "no-object-deps");
  assert_eq!(object_deps.len(), 1);
  assert!(object_deps[0].message.contains("useEffect"));
}

#[test]
fn test_object_deps_fires_for_any_hook_kind() {
  let dir = project(&[(
    "App.tsx",
    r#"
import { useCallback, useMemo } from 'react';

export function App({ user }) {
  const a = useMemo(() => user.name, [{ id: user.id }]);
  const b = useCallback(() => user.name, [[user.id]]);
  return <span>{a}{b()}</span>;
}
"#,
  )]);
  let outcome = run(&dir);

  assert_eq!(of_rule(&outcome, "no-object-deps").len(), 2);
}

#[test]
fn test_object_deps_through_local_binding() {
  let dir = project(&[(
    "App.tsx",
    r#"
import { useEffect } from 'react';

export function App({ userId }) {
  const query = { id: userId };
  useEffect(() => {
    console.log(query);
  }, [query]);
  return <div />;
}
"#,
  )]);
  let outcome = run(&dir);

  let object_deps = of_rule(&outcome, "no-object-deps");
  assert_eq!(object_deps.len(), 1);
  assert!(object_deps[0].message.contains("query"));
}

// --- Scenario 6: derived state ----------------------------------------------

#[test]
fn test_derived_state() {
  let dir = project(&[(
    "Profile.tsx",
    r#"
import { useEffect, useState } from 'react';

export function Profile({ user }) {
  const [local, setLocal] = useState(user);
  useEffect(() => {
    setLocal(user);
  }, [user]);
  return <div>{local.name}</div>;
}
"#,
  )]);
  let outcome = run(&dir);

  let derived = of_rule(&outcome, "no-derived-state");
  assert_eq!(derived.len(), 1);
  assert!(derived[0].message.contains("user"));
  assert_eq!(derived[0].related.len(), 1);
}

// --- Stale state -------------------------------------------------------------

#[test]
fn test_stale_state_in_callback() {
  let dir = project(&[(
    "Counter.tsx",
    r#"
import { useState } from 'react';

export function Counter() {
  const [count, setCount] = useState(0);
  const increment = () => setCount(count + 1);
  return <button onClick={increment}>{count}</button>;
}
"#,
  )]);
  let outcome = run(&dir);

  let stale = of_rule(&outcome, "no-stale-state");
  assert_eq!(stale.len(), 1);
  assert!(stale[0].message.contains("functional form"));
}

#[test]
fn test_functional_update_is_clean() {
  let dir = project(&[(
    "Counter.tsx",
    r#"
import { useState } from 'react';

export function Counter() {
  const [count, setCount] = useState(0);
  const increment = () => setCount(prev => prev + 1);
  return <button onClick={increment}>{count}</button>;
}
"#,
  )]);
  let outcome = run(&dir);

  assert!(of_rule(&outcome, "no-stale-state").is_empty());
}

// --- Inline props ------------------------------------------------------------

#[test]
fn test_inline_props_rule() {
  let dir = project(&[(
    "App.tsx",
    r#"
function Row({ style, onPick }) {
  return <div onClick={onPick} />;
}

export function App() {
  return <Row style={{ color: 'red' }} onPick={() => 1} />;
}
"#,
  )]);
  let outcome = run(&dir);

  assert_eq!(of_rule(&outcome, "no-inline-props").len(), 2);
}

// --- Depth boundaries ---------------------------------------------------------

/// Chain: App -> A -> B -> Leaf (two passthroughs)
const BOUNDARY_APP: &str = r#"
import { useState } from 'react';

function Leaf({ value }) {
  return <i>{value}</i>;
}

function B({ value }) {
  return <Leaf value={value} />;
}

function A({ value }) {
  return <B value={value} />;
}

export function App() {
  const [value, setValue] = useState(1);
  return <A value={value} />;
}
"#;

#[test]
fn test_chain_below_max_depth_does_not_fire() {
  // Two passthroughs; with maxDepth 5 the smallest offender needs three
  let dir = project(&[("App.tsx", BOUNDARY_APP)]);
  let outcome = run_with(&dir, config_with_max_depth(5), false);

  assert!(of_rule(&outcome, "deep-prop-drilling").is_empty());
}

#[test]
fn test_chain_at_max_depth_fires() {
  // Two passthroughs = maxDepth 4's smallest offender
  let dir = project(&[("App.tsx", BOUNDARY_APP)]);
  let outcome = run_with(&dir, config_with_max_depth(4), false);

  assert_eq!(of_rule(&outcome, "deep-prop-drilling").len(), 1);
}

// --- Renamed prop tracing -----------------------------------------------------

#[test]
fn test_drilling_traced_through_rename() {
  let dir = project(&[(
    "App.tsx",
    r#"
import { useState } from 'react';

function Display({ appearance }) {
  return <div className={appearance} />;
}

function Middle({ look }) {
  return <Display appearance={look} />;
}

function Top({ theme }) {
  return <Middle look={theme} />;
}

export function App() {
  const [theme, setTheme] = useState('dark');
  return <Top theme={theme} />;
}
"#,
  )]);
  let outcome = run(&dir);

  let drilling = of_rule(&outcome, "deep-prop-drilling");
  assert_eq!(drilling.len(), 1);
  assert!(drilling[0].message.contains("theme"));
}

// --- Rule disabling -----------------------------------------------------------

#[test]
fn test_disabled_rule_emits_nothing() {
  let mut config = AnalyzerConfig::default();
  config.rules.insert(
    "unstable-props-to-memo".to_string(),
    RuleSettings {
      enabled: false,
      max_depth: None,
    },
  );
  config.rules.insert(
    "no-inline-props".to_string(),
    RuleSettings {
      enabled: false,
      max_depth: None,
    },
  );

  let dir = project(&[("App.tsx", MEMO_APP)]);
  let outcome = run_with(&dir, config, false);

  assert!(of_rule(&outcome, "unstable-props-to-memo").is_empty());
  assert!(of_rule(&outcome, "no-inline-props").is_empty());
}

// --- Determinism and ordering -------------------------------------------------

#[test]
fn test_idempotent_reanalysis() {
  let dir = project(&[("App.tsx", DRILLING_APP), ("Memo.tsx", MEMO_APP)]);

  let first = run_with(&dir, AnalyzerConfig::default(), true);
  let second = run_with(&dir, AnalyzerConfig::default(), true);

  let issues = |outcome: &AnalysisOutcome| {
    outcome
      .diagnostics
      .iter()
      .map(|d| (d.file_path.clone(), d.line, d.column, d.rule.clone()))
      .collect::<Vec<_>>()
  };
  assert_eq!(issues(&first), issues(&second));

  let first_graph = serde_json::to_string(&first.graph.unwrap()).unwrap();
  let second_graph = serde_json::to_string(&second.graph.unwrap()).unwrap();
  assert_eq!(first_graph, second_graph);
}

#[test]
fn test_diagnostics_totally_ordered() {
  let dir = project(&[("b/Second.tsx", MEMO_APP), ("a/First.tsx", MEMO_APP)]);
  let outcome = run(&dir);

  assert!(!outcome.diagnostics.is_empty());
  let keys: Vec<_> = outcome
    .diagnostics
    .iter()
    .map(|d| (d.file_path.clone(), d.line, d.column, d.rule.clone()))
    .collect();
  let mut sorted = keys.clone();
  sorted.sort();
  assert_eq!(keys, sorted);
}

// --- Graph serialization ------------------------------------------------------

#[test]
fn test_graph_round_trip() {
  let dir = project(&[("App.tsx", DRILLING_APP)]);
  let outcome = run_with(&dir, AnalyzerConfig::default(), true);

  let graph = outcome.graph.unwrap();
  let first = serde_json::to_string(&graph).unwrap();
  let restored: react_analyzer::ProjectGraph = serde_json::from_str(&first).unwrap();
  let second = serde_json::to_string(&restored).unwrap();
  assert_eq!(first, second);
}

// --- Stats and parse recovery -------------------------------------------------

#[test]
fn test_stats_counts() {
  let dir = project(&[
    ("Memo.tsx", MEMO_APP),
    ("Clean.tsx", "export function Clean() { return <p>ok</p>; }"),
  ]);
  let outcome = run(&dir);

  assert_eq!(outcome.stats.files_analyzed, 2);
  assert_eq!(outcome.stats.files_with_issues, 1);
  assert_eq!(outcome.stats.files_clean, 1);
  assert_eq!(outcome.stats.total_issues, outcome.diagnostics.len());
}

#[test]
fn test_parse_errors_do_not_abort() {
  let dir = project(&[
    ("Broken.tsx", "export function Broken( { return <div; }"),
    ("Memo.tsx", MEMO_APP),
  ]);
  let outcome = run(&dir);

  // The valid file still produces its diagnostics
  assert!(!of_rule(&outcome, "unstable-props-to-memo").is_empty());
}

// --- Path aliases -------------------------------------------------------------

#[test]
fn test_alias_resolution_via_config_file() {
  let dir = project(&[
    (
      ".rarc",
      r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@/*": ["src/*"] } } }"#,
    ),
    (
      "src/App.tsx",
      r#"
import { useState } from 'react';
import { Panel } from '@/widgets/Panel';

export function App() {
  const [mode, setMode] = useState('full');
  return <Panel mode={mode} />;
}
"#,
    ),
    (
      "src/widgets/Panel.tsx",
      r#"
import { Badge } from '@/widgets/Badge';

export function Panel({ mode }) {
  return <Badge mode={mode} />;
}
"#,
    ),
    (
      "src/widgets/Badge.tsx",
      r#"
export function Badge({ mode }) {
  return <em>{mode}</em>;
}
"#,
    ),
  ]);

  let config = AnalyzerConfig::discover(dir.path()).unwrap();
  let outcome = run_with(&dir, config, false);

  // Panel is a passthrough on a 3-component chain resolved through aliases
  assert_eq!(of_rule(&outcome, "deep-prop-drilling").len(), 1);
}
