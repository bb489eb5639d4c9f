//! Analysis orchestration
//!
//! `analyze` is the engine entry point the CLI and editor bridge consume:
//! collect source files, parse + run AST rules in parallel per file, build
//! the project graph from the extracted analyses, run graph rules over the
//! frozen graph, and return deterministically ordered diagnostics plus
//! stats (and the graph, when asked for).

use crate::config::{AnalyzerConfig, ALWAYS_IGNORED};
use crate::diagnostics::{sort_diagnostics, AnalysisStats, Diagnostic, Severity};
use crate::error::{AnalyzerError, Result};
use crate::graph::{GraphBuilder, ProjectGraph};
use crate::resolver::ModuleResolver;
use crate::rules::RuleRegistry;
use crate::source::model::FileAnalysis;
use crate::source::{build_semantic, extract_file, parse_source, FileContext};
use crate::symbols::SymbolTable;
use crate::utils;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use oxc_allocator::Allocator;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Cooperative cancellation flag, checked at file boundaries
///
/// Cancellation is not an error: in-flight workers finish their current file
/// and the run returns an empty outcome with `cancelled` set. Partial graphs
/// are discarded.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }
}

pub struct AnalyzeOptions {
  /// Files or directories to analyze
  pub paths: Vec<PathBuf>,
  pub config: AnalyzerConfig,
  /// Attach the serialized graph to the outcome
  pub include_graph: bool,
  /// Drop diagnostics below this severity
  pub severity_threshold: Option<Severity>,
  pub cancel: CancelFlag,
}

pub struct AnalysisOutcome {
  pub diagnostics: Vec<Diagnostic>,
  pub stats: AnalysisStats,
  pub graph: Option<ProjectGraph>,
  pub cancelled: bool,
}

impl AnalysisOutcome {
  fn cancelled() -> Self {
    Self {
      diagnostics: Vec::new(),
      stats: AnalysisStats::default(),
      graph: None,
      cancelled: true,
    }
  }
}

pub fn analyze(options: &AnalyzeOptions) -> Result<AnalysisOutcome> {
  let start = Instant::now();

  // Step 1: collect source files under the requested roots
  let (project_root, files) = collect_files(&options.paths, &options.config)?;
  debug!("Analyzing {} source files under {:?}", files.len(), project_root);

  let registry = RuleRegistry::from_config(&options.config);

  // Step 2: parse, extract and run AST rules - parallel per file; each
  // worker owns its tree exclusively and only the owned analysis leaves it
  let cancel = &options.cancel;
  let mut results: Vec<(FileAnalysis, Vec<Diagnostic>)> = files
    .par_iter()
    .filter_map(|path| {
      if cancel.is_cancelled() {
        return None;
      }
      match analyze_file(path, &registry) {
        Ok(result) => Some(result),
        Err(e) => {
          warn!("Failed to analyze {}: {}", path.display(), e);
          None
        }
      }
    })
    .collect();

  if cancel.is_cancelled() {
    return Ok(AnalysisOutcome::cancelled());
  }

  // Deterministic order regardless of worker scheduling
  results.sort_by(|a, b| a.0.file_path.cmp(&b.0.file_path));

  let mut diagnostics: Vec<Diagnostic> = Vec::new();
  let mut analyses: Vec<FileAnalysis> = Vec::with_capacity(results.len());
  for (analysis, file_diagnostics) in results {
    diagnostics.extend(file_diagnostics);
    analyses.push(analysis);
  }

  // Step 3: global joins - resolver, symbol table, graph
  let resolver = ModuleResolver::new(&project_root, &options.config.compiler_options, &analyses);
  let symbols = SymbolTable::build(&analyses);
  let graph = GraphBuilder::build(&analyses, &resolver, &symbols);

  if cancel.is_cancelled() {
    return Ok(AnalysisOutcome::cancelled());
  }

  // Step 4: graph rules observe the frozen graph
  diagnostics.extend(registry.run_graph_rules(&graph, &project_root));

  // Step 5: threshold, total order, stats
  if let Some(threshold) = options.severity_threshold {
    diagnostics.retain(|d| d.severity >= threshold);
  }
  sort_diagnostics(&mut diagnostics);

  let files_with_issues = diagnostics
    .iter()
    .map(|d| d.file_path.as_path())
    .collect::<FxHashSet<_>>()
    .len();

  let stats = AnalysisStats {
    files_analyzed: analyses.len(),
    files_with_issues,
    files_clean: analyses.len().saturating_sub(files_with_issues),
    total_issues: diagnostics.len(),
    duration_ms: start.elapsed().as_millis() as u64,
  };

  Ok(AnalysisOutcome {
    diagnostics,
    stats,
    graph: options.include_graph.then_some(graph),
    cancelled: false,
  })
}

/// Parse one file, extract its analysis, and run the AST rules on it
fn analyze_file(path: &Path, registry: &RuleRegistry) -> Result<(FileAnalysis, Vec<Diagnostic>)> {
  let source = fs::read_to_string(path)?;

  let allocator = Allocator::default();
  let unit = parse_source(&allocator, path, &source);
  let semantic = build_semantic(path, &unit.program);

  let ctx = FileContext {
    file_path: path,
    source: &source,
    semantic: &semantic,
    imports: &[],
  };
  let mut analysis = extract_file(&ctx, &unit.program);
  analysis.parse_errors = unit.parse_errors;

  // AST rules see the file's import table
  let rule_ctx = FileContext {
    file_path: path,
    source: &source,
    semantic: &semantic,
    imports: &analysis.imports,
  };
  let diagnostics = registry.run_ast_rules(&rule_ctx);

  Ok((analysis, diagnostics))
}

/// Resolve roots, walk directories and filter to source files
///
/// Returns the project root (the first root, or its directory for file
/// roots) together with the sorted, deduplicated file list.
fn collect_files(paths: &[PathBuf], config: &AnalyzerConfig) -> Result<(PathBuf, Vec<PathBuf>)> {
  if paths.is_empty() {
    return Err(AnalyzerError::InvalidConfig(
      "no paths to analyze".to_string(),
    ));
  }

  let mut files = Vec::new();
  let mut project_root: Option<PathBuf> = None;

  for path in paths {
    let canonical =
      fs::canonicalize(path).map_err(|_| AnalyzerError::RootNotFound(path.clone()))?;

    if canonical.is_file() {
      if project_root.is_none() {
        project_root = canonical.parent().map(Path::to_path_buf);
      }
      if utils::is_source_file(&canonical) {
        files.push(canonical);
      }
      continue;
    }

    if project_root.is_none() {
      project_root = Some(canonical.clone());
    }

    let mut override_builder = OverrideBuilder::new(&canonical);
    for dir in ALWAYS_IGNORED {
      override_builder
        .add(&format!("!{}", dir))
        .map_err(|e| AnalyzerError::InvalidConfig(e.to_string()))?;
    }
    for pattern in &config.ignore {
      override_builder
        .add(&format!("!{}", pattern))
        .map_err(|e| {
          AnalyzerError::InvalidConfig(format!("bad ignore pattern '{}': {}", pattern, e))
        })?;
    }
    let overrides = override_builder
      .build()
      .map_err(|e| AnalyzerError::InvalidConfig(e.to_string()))?;

    let walker = WalkBuilder::new(&canonical)
      .git_ignore(true)
      .overrides(overrides)
      .build();

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          debug!("Walk error: {}", e);
          continue;
        }
      };
      let entry_path = entry.path();
      if entry_path.is_file() && utils::is_source_file(entry_path) {
        files.push(entry_path.to_path_buf());
      }
    }
  }

  files.sort();
  files.dedup();

  let project_root = project_root.unwrap_or_else(|| PathBuf::from("."));
  Ok((project_root, files))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_collect_files_filters_and_sorts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("node_modules").join("pkg")).unwrap();
    fs::write(root.join("src").join("b.tsx"), "export {};").unwrap();
    fs::write(root.join("src").join("a.tsx"), "export {};").unwrap();
    fs::write(root.join("src").join("styles.css"), "").unwrap();
    fs::write(
      root.join("node_modules").join("pkg").join("index.ts"),
      "export {};",
    )
    .unwrap();

    let (_, files) = collect_files(
      &[root.to_path_buf()],
      &AnalyzerConfig::default(),
    )
    .unwrap();

    let names: Vec<_> = files
      .iter()
      .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
      .collect();
    assert_eq!(names, vec!["a.tsx", "b.tsx"]);
  }

  #[test]
  fn test_missing_root_is_fatal() {
    let result = collect_files(
      &[PathBuf::from("/definitely/not/here")],
      &AnalyzerConfig::default(),
    );
    assert!(matches!(result, Err(AnalyzerError::RootNotFound(_))));
  }

  #[test]
  fn test_cancelled_run_returns_empty_outcome() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
      temp_dir.path().join("App.tsx"),
      "export const App = () => <div style={{}} />;",
    )
    .unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();

    let outcome = analyze(&AnalyzeOptions {
      paths: vec![temp_dir.path().to_path_buf()],
      config: AnalyzerConfig::default(),
      include_graph: false,
      severity_threshold: None,
      cancel,
    })
    .unwrap();

    assert!(outcome.cancelled);
    assert!(outcome.diagnostics.is_empty());
  }
}
