//! `no-stale-state`: a setter called inside a callback that reads the
//! matching state variable directly captures the value from the render the
//! callback closed over. The functional form always sees the latest value.

use crate::diagnostics::{Diagnostic, Severity};
use crate::rules::{AstRule, Rule};
use crate::source::model::HookKind;
use crate::source::{react, FileContext};
use oxc_ast::ast::{BindingPatternKind, Expression};
use oxc_ast::AstKind;
use oxc_semantic::AstNode;
use oxc_span::{GetSpan, Span};

pub const RULE_ID: &str = "no-stale-state";

pub struct NoStaleState;

struct StatePair {
  value: String,
  setter: String,
  owner: Span,
}

impl Rule for NoStaleState {
  fn id(&self) -> &'static str {
    RULE_ID
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }
}

impl AstRule for NoStaleState {
  fn check(&self, ctx: &FileContext) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let pairs = state_pairs(ctx);
    if pairs.is_empty() {
      return diagnostics;
    }

    for node in ctx.semantic.nodes().iter() {
      let AstKind::CallExpression(call) = node.kind() else {
        continue;
      };
      let Expression::Identifier(callee) = react::strip_wrappers(&call.callee) else {
        continue;
      };
      let Some(pair) = pairs.iter().find(|pair| pair.setter == callee.name.as_str()) else {
        continue;
      };

      // Direct calls during render are a different problem; this rule is
      // about callbacks capturing old values
      let call_owner = enclosing_function_span(ctx, node);
      if call_owner == pair.owner {
        continue;
      }

      let Some(arg) = call.arguments.first().and_then(|a| a.as_expression()) else {
        continue;
      };
      let arg = react::strip_wrappers(arg);
      if matches!(
        arg,
        Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_)
      ) {
        continue;
      }

      if reads_identifier(ctx, arg.span(), &pair.value) {
        diagnostics.push(Diagnostic::new(
          RULE_ID,
          self.severity(),
          format!(
            "{}({} ...) inside a callback reads '{}' from the closed-over render; \
             use the functional form {}(prev => ...)",
            pair.setter, pair.value, pair.value, pair.setter
          ),
          &ctx.location(call.span),
        ));
      }
    }

    diagnostics
  }
}

fn state_pairs(ctx: &FileContext) -> Vec<StatePair> {
  let mut pairs = Vec::new();

  for node in ctx.semantic.nodes().iter() {
    let AstKind::VariableDeclarator(declarator) = node.kind() else {
      continue;
    };
    let Some(init) = &declarator.init else { continue };
    let Expression::CallExpression(call) = react::strip_wrappers(init) else {
      continue;
    };
    let is_state_hook = react::hook_call_name(call)
      .and_then(|name| react::hook_kind(&name))
      .is_some_and(|kind| matches!(kind, HookKind::State | HookKind::Reducer));
    if !is_state_hook {
      continue;
    }
    let BindingPatternKind::ArrayPattern(pattern) = &declarator.id.kind else {
      continue;
    };

    let mut names = pattern.elements.iter().map(|element| {
      element.as_ref().and_then(|el| {
        if let BindingPatternKind::BindingIdentifier(id) = &el.kind {
          Some(id.name.to_string())
        } else {
          None
        }
      })
    });
    let (Some(Some(value)), Some(Some(setter))) = (names.next(), names.next()) else {
      continue;
    };

    pairs.push(StatePair {
      value,
      setter,
      owner: enclosing_function_span(ctx, node),
    });
  }

  pairs
}

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

fn reads_identifier(ctx: &FileContext, span: Span, name: &str) -> bool {
  ctx.semantic.nodes().iter().any(|node| {
    if let AstKind::IdentifierReference(ident) = node.kind() {
      ident.span.start >= span.start && ident.span.end <= span.end && ident.name == name
    } else {
      false
    }
  })
}
