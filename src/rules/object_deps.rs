//! `no-object-deps`: inline objects/arrays in hook dependency arrays compare
//! unequal on every render, so the hook re-fires unconditionally. Covers
//! direct literals and identifiers bound to literals within the same render.

use crate::diagnostics::{Diagnostic, Severity};
use crate::rules::{AstRule, Rule};
use crate::source::{react, FileContext};
use oxc_ast::ast::{BindingPatternKind, Expression};
use oxc_ast::AstKind;
use oxc_semantic::AstNode;
use oxc_span::{GetSpan, Span};
use rustc_hash::FxHashSet;

pub const RULE_ID: &str = "no-object-deps";

pub struct NoObjectDeps;

impl Rule for NoObjectDeps {
  fn id(&self) -> &'static str {
    RULE_ID
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }
}

impl AstRule for NoObjectDeps {
  fn check(&self, ctx: &FileContext) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for node in ctx.semantic.nodes().iter() {
      let AstKind::CallExpression(call) = node.kind() else {
        continue;
      };
      let Some(callee) = react::hook_call_name(call) else {
        continue;
      };
      let takes_deps = react::hook_kind(&callee).is_some_and(react::hook_takes_deps);
      if !takes_deps {
        continue;
      }
      let Some(deps) = react::dependency_array(ctx, call) else {
        continue;
      };

      let scope = enclosing_function_span(ctx, node);
      let inline_bindings = inline_bindings_in(ctx, scope);

      for dep in deps {
        match dep.kind {
          crate::source::model::DepKind::Inline => {
            let is_literal = dep.text.starts_with('{') || dep.text.starts_with('[');
            if is_literal {
              diagnostics.push(Diagnostic::new(
                RULE_ID,
                self.severity(),
                format!(
                  "Inline {} in the dependency array of {}; it never compares equal, \
                   so the hook re-runs on every render. Hoist it to a module constant \
                   or wrap it in useMemo",
                  if dep.text.starts_with('{') { "object" } else { "array" },
                  callee
                ),
                &dep.location,
              ));
            }
          }
          crate::source::model::DepKind::Identifier => {
            let root = dep.text.split('.').next().unwrap_or(&dep.text);
            if inline_bindings.contains(root) {
              diagnostics.push(Diagnostic::new(
                RULE_ID,
                self.severity(),
                format!(
                  "'{}' is bound to an inline object/array in the same render, so this \
                   {} dependency changes every time. Memoize the binding or hoist it",
                  root, callee
                ),
                &dep.location,
              ));
            }
          }
        }
      }
    }

    diagnostics
  }
}

/// Span of the nearest enclosing function, or the whole file
fn enclosing_function_span(ctx: &FileContext, node: &AstNode) -> Span {
  let nodes = ctx.semantic.nodes();
  let mut current_id = node.id();
  loop {
    let parent_id = nodes.parent_id(current_id);
    if parent_id == current_id {
      return Span::new(0, ctx.source.len() as u32);
    }
    match nodes.get_node(parent_id).kind() {
      AstKind::Function(func) => return func.span(),
      AstKind::ArrowFunctionExpression(arrow) => return arrow.span,
      _ => {}
    }
    current_id = parent_id;
  }
}

/// Names bound (possibly through aliases) to object/array literals inside a span
fn inline_bindings_in(ctx: &FileContext, scope: Span) -> FxHashSet<String> {
  let mut inline = FxHashSet::default();
  let mut aliases = Vec::new();

  for node in ctx.semantic.nodes().iter() {
    let AstKind::VariableDeclarator(declarator) = node.kind() else {
      continue;
    };
    let span = declarator.span();
    if span.start < scope.start || span.end > scope.end {
      continue;
    }
    let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
      continue;
    };
    let Some(init) = &declarator.init else { continue };

    match react::strip_wrappers(init) {
      Expression::ObjectExpression(_) | Expression::ArrayExpression(_) => {
        inline.insert(id.name.to_string());
      }
      Expression::Identifier(other) => {
        aliases.push((id.name.to_string(), other.name.to_string()));
      }
      _ => {}
    }
  }

  // Alias chains: const a = {}; const b = a;
  let mut changed = true;
  while changed {
    changed = false;
    for (alias, source) in &aliases {
      if inline.contains(source.as_str()) && !inline.contains(alias.as_str()) {
        inline.insert(alias.clone());
        changed = true;
      }
    }
  }

  inline
}
