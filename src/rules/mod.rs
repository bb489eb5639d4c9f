//! Rule engine
//!
//! Two rule kinds: AST rules see one file's source tree (run inside the
//! per-file worker, parallel across files), graph rules see the frozen
//! project graph (run after the build). Rules are trait objects in a
//! registry built from configuration; a disabled rule is never constructed.
//! A rule that panics is captured as an `engine/internal` diagnostic and the
//! neighbouring rules continue.

pub mod derived_state;
pub mod inline_props;
pub mod object_deps;
pub mod prop_drilling;
pub mod stale_state;
pub mod unstable_props;

use crate::config::AnalyzerConfig;
use crate::diagnostics::{engine_internal, Diagnostic, Severity};
use crate::graph::ProjectGraph;
use crate::source::FileContext;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::warn;

/// Identity and metadata every rule declares
pub trait Rule: Send + Sync {
  fn id(&self) -> &'static str;
  fn severity(&self) -> Severity;
}

/// Per-file rule over one source tree
pub trait AstRule: Rule {
  fn check(&self, ctx: &FileContext) -> Vec<Diagnostic>;
}

/// Whole-project rule over the frozen graph
pub trait GraphRule: Rule {
  fn check(&self, graph: &ProjectGraph) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
  ast_rules: Vec<Box<dyn AstRule>>,
  graph_rules: Vec<Box<dyn GraphRule>>,
}

impl RuleRegistry {
  pub fn from_config(config: &AnalyzerConfig) -> Self {
    let mut ast_rules: Vec<Box<dyn AstRule>> = Vec::new();
    let mut graph_rules: Vec<Box<dyn GraphRule>> = Vec::new();

    if config.rule_enabled(object_deps::RULE_ID) {
      ast_rules.push(Box::new(object_deps::NoObjectDeps));
    }
    if config.rule_enabled(derived_state::RULE_ID) {
      ast_rules.push(Box::new(derived_state::NoDerivedState));
    }
    if config.rule_enabled(stale_state::RULE_ID) {
      ast_rules.push(Box::new(stale_state::NoStaleState));
    }
    if config.rule_enabled(inline_props::RULE_ID) {
      ast_rules.push(Box::new(inline_props::NoInlineProps));
    }
    if config.rule_enabled(prop_drilling::RULE_ID) {
      graph_rules.push(Box::new(prop_drilling::DeepPropDrilling {
        max_depth: config.max_depth(),
      }));
    }
    if config.rule_enabled(unstable_props::RULE_ID) {
      graph_rules.push(Box::new(unstable_props::UnstablePropsToMemo));
    }

    Self {
      ast_rules,
      graph_rules,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.ast_rules.is_empty() && self.graph_rules.is_empty()
  }

  /// Run every AST rule on one file
  pub fn run_ast_rules(&self, ctx: &FileContext) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for rule in &self.ast_rules {
      match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
        Ok(found) => diagnostics.extend(found),
        Err(_) => {
          warn!("Rule '{}' panicked on {:?}", rule.id(), ctx.file_path);
          diagnostics.push(engine_internal(ctx.file_path, rule.id()));
        }
      }
    }
    diagnostics
  }

  /// Run every graph rule against the frozen graph, in parallel
  pub fn run_graph_rules(&self, graph: &ProjectGraph, project_root: &Path) -> Vec<Diagnostic> {
    self
      .graph_rules
      .par_iter()
      .flat_map(|rule| match catch_unwind(AssertUnwindSafe(|| rule.check(graph))) {
        Ok(found) => found,
        Err(_) => {
          warn!("Rule '{}' panicked", rule.id());
          vec![engine_internal(project_root, rule.id())]
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Panicking;

  impl Rule for Panicking {
    fn id(&self) -> &'static str {
      "test/panicking"
    }
    fn severity(&self) -> Severity {
      Severity::Warning
    }
  }

  impl GraphRule for Panicking {
    fn check(&self, _graph: &ProjectGraph) -> Vec<Diagnostic> {
      panic!("boom");
    }
  }

  struct Quiet;

  impl Rule for Quiet {
    fn id(&self) -> &'static str {
      "test/quiet"
    }
    fn severity(&self) -> Severity {
      Severity::Warning
    }
  }

  impl GraphRule for Quiet {
    fn check(&self, _graph: &ProjectGraph) -> Vec<Diagnostic> {
      Vec::new()
    }
  }

  #[test]
  fn test_rule_panic_is_captured_and_neighbours_continue() {
    let registry = RuleRegistry {
      ast_rules: Vec::new(),
      graph_rules: vec![Box::new(Panicking), Box::new(Quiet)],
    };
    let graph = ProjectGraph::new();

    let diagnostics = registry.run_graph_rules(&graph, Path::new("/project"));

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule, "engine/internal");
    assert_eq!(diagnostics[0].line, 1);
    assert_eq!(diagnostics[0].column, 0);
  }

  #[test]
  fn test_disabled_rules_are_not_constructed() {
    let mut config = AnalyzerConfig::default();
    for id in [
      object_deps::RULE_ID,
      derived_state::RULE_ID,
      stale_state::RULE_ID,
      inline_props::RULE_ID,
      prop_drilling::RULE_ID,
      unstable_props::RULE_ID,
    ] {
      config.rules.insert(
        id.to_string(),
        crate::config::RuleSettings {
          enabled: false,
          max_depth: None,
        },
      );
    }

    let registry = RuleRegistry::from_config(&config);
    assert!(registry.is_empty());
  }
}
