//! `unstable-props-to-memo`: a `passes` edge whose target is memoized and
//! whose value is unstable is static evidence of a defeated optimization -
//! the memoized child re-renders on every parent render anyway. Works across
//! files because memoization is resolved through the symbol table during the
//! graph build.

use crate::diagnostics::{Diagnostic, Severity};
use crate::graph::{EdgeKind, ProjectGraph, StabilityReason};
use crate::rules::{GraphRule, Rule};

pub const RULE_ID: &str = "unstable-props-to-memo";

pub struct UnstablePropsToMemo;

impl Rule for UnstablePropsToMemo {
  fn id(&self) -> &'static str {
    RULE_ID
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }
}

impl GraphRule for UnstablePropsToMemo {
  fn check(&self, graph: &ProjectGraph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for edge in graph.edges_of_kind(EdgeKind::Passes) {
      if edge.breaks_memoization != Some(true) {
        continue;
      }
      let Some(location) = &edge.location else {
        continue;
      };
      let Some(target) = graph.component(&edge.target) else {
        continue;
      };
      let prop_name = edge.prop_name.as_deref().unwrap_or("<prop>");

      let mut diagnostic = Diagnostic::new(
        RULE_ID,
        self.severity(),
        format!(
          "Prop '{}' passed to memoized component '{}' is {}; the memo comparison \
           fails on every render",
          prop_name,
          target.name,
          describe_reason(edge.reason)
        ),
        location,
      );
      diagnostic = diagnostic.related(&target.location, "memoized component defined here");
      diagnostics.push(diagnostic);
    }

    diagnostics
  }
}

fn describe_reason(reason: Option<StabilityReason>) -> &'static str {
  match reason {
    Some(StabilityReason::InlineObject) => "an inline object literal",
    Some(StabilityReason::InlineArray) => "an inline array literal",
    Some(StabilityReason::InlineFunction) => "an inline function",
    Some(StabilityReason::Call) => "rebuilt by a call on every render",
    _ => "unstable",
  }
}
