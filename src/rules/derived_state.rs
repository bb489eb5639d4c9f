//! `no-derived-state`: `useState(p)` paired with an effect that mirrors `p`
//! back into the state duplicates data that React already owns. The state
//! lags one render behind and the effect is a wasted pass.

use crate::diagnostics::{Diagnostic, Severity};
use crate::rules::{AstRule, Rule};
use crate::source::model::{HookKind, Location};
use crate::source::{react, FileContext};
use oxc_ast::ast::{BindingPatternKind, CallExpression, Expression};
use oxc_ast::AstKind;
use oxc_span::{GetSpan, Span};

pub const RULE_ID: &str = "no-derived-state";

pub struct NoDerivedState;

struct MirrorCandidate {
  setter: String,
  source: String,
  location: Location,
}

impl Rule for NoDerivedState {
  fn id(&self) -> &'static str {
    RULE_ID
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }
}

impl AstRule for NoDerivedState {
  fn check(&self, ctx: &FileContext) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let candidates = mirror_candidates(ctx);
    if candidates.is_empty() {
      return diagnostics;
    }

    let mut reported = vec![false; candidates.len()];

    for node in ctx.semantic.nodes().iter() {
      let AstKind::CallExpression(call) = node.kind() else {
        continue;
      };
      let is_effect = react::hook_call_name(call)
        .and_then(|name| react::hook_kind(&name))
        .is_some_and(|kind| kind == HookKind::Effect);
      if !is_effect {
        continue;
      }
      let Some(deps) = react::dependency_array(ctx, call) else {
        continue;
      };
      let Some(body) = call.arguments.first().and_then(|a| a.as_expression()) else {
        continue;
      };
      let body_span = body.span();

      for (index, candidate) in candidates.iter().enumerate() {
        if reported[index] {
          continue;
        }
        let mirrors = setter_call_in(ctx, body_span, &candidate.setter, &candidate.source);
        let depends = deps.iter().any(|dep| dep.text == candidate.source);
        if mirrors && depends {
          reported[index] = true;
          diagnostics.push(
            Diagnostic::new(
              RULE_ID,
              self.severity(),
              format!(
                "State initialized from '{}' and mirrored back by an effect; derive the \
                 value during render instead of duplicating it in state",
                candidate.source
              ),
              &candidate.location,
            )
            .related(&ctx.location(call.span), "mirroring effect here"),
          );
        }
      }
    }

    diagnostics
  }
}

/// `const [x, setX] = useState(p)` declarators where `p` is an identifier
fn mirror_candidates(ctx: &FileContext) -> Vec<MirrorCandidate> {
  let mut candidates = Vec::new();

  for node in ctx.semantic.nodes().iter() {
    let AstKind::VariableDeclarator(declarator) = node.kind() else {
      continue;
    };
    let Some(init) = &declarator.init else { continue };
    let Expression::CallExpression(call) = react::strip_wrappers(init) else {
      continue;
    };
    let is_use_state = react::hook_call_name(call)
      .and_then(|name| react::hook_kind(&name))
      .is_some_and(|kind| kind == HookKind::State);
    if !is_use_state {
      continue;
    }

    let Some(Expression::Identifier(source)) = call
      .arguments
      .first()
      .and_then(|a| a.as_expression())
      .map(react::strip_wrappers)
    else {
      continue;
    };

    let BindingPatternKind::ArrayPattern(pattern) = &declarator.id.kind else {
      continue;
    };
    let setter = pattern.elements.get(1).and_then(|element| {
      element.as_ref().and_then(|el| {
        if let BindingPatternKind::BindingIdentifier(id) = &el.kind {
          Some(id.name.to_string())
        } else {
          None
        }
      })
    });
    let Some(setter) = setter else { continue };

    candidates.push(MirrorCandidate {
      setter,
      source: source.name.to_string(),
      location: ctx.location(call.span),
    });
  }

  candidates
}

/// Is there a `setter(source)` call inside the span?
fn setter_call_in(ctx: &FileContext, span: Span, setter: &str, source: &str) -> bool {
  for node in ctx.semantic.nodes().iter() {
    let AstKind::CallExpression(call) = node.kind() else {
      continue;
    };
    if call.span.start < span.start || call.span.end > span.end {
      continue;
    }
    if !callee_is(call, setter) {
      continue;
    }
    let arg = call
      .arguments
      .first()
      .and_then(|a| a.as_expression())
      .map(react::strip_wrappers);
    if let Some(Expression::Identifier(ident)) = arg {
      if ident.name == source {
        return true;
      }
    }
  }
  false
}

fn callee_is(call: &CallExpression, name: &str) -> bool {
  matches!(
    react::strip_wrappers(&call.callee),
    Expression::Identifier(ident) if ident.name == name
  )
}
