//! `no-inline-props`: a JSX attribute whose value is an inline object, array
//! or function expression gets a fresh reference on every render.

use crate::diagnostics::{Diagnostic, Severity};
use crate::rules::{AstRule, Rule};
use crate::source::{react, FileContext};
use oxc_ast::ast::{Expression, JSXAttributeItem, JSXAttributeName, JSXAttributeValue};
use oxc_ast::AstKind;

pub const RULE_ID: &str = "no-inline-props";

pub struct NoInlineProps;

impl Rule for NoInlineProps {
  fn id(&self) -> &'static str {
    RULE_ID
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }
}

impl AstRule for NoInlineProps {
  fn check(&self, ctx: &FileContext) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for node in ctx.semantic.nodes().iter() {
      let AstKind::JSXOpeningElement(opening) = node.kind() else {
        continue;
      };

      for item in &opening.attributes {
        let JSXAttributeItem::Attribute(attr) = item else {
          continue;
        };
        let JSXAttributeName::Identifier(name) = &attr.name else {
          continue;
        };
        let Some(JSXAttributeValue::ExpressionContainer(container)) = &attr.value else {
          continue;
        };
        let Some(expr) = container.expression.as_expression() else {
          continue;
        };

        let kind_text = match react::strip_wrappers(expr) {
          Expression::ObjectExpression(_) => "object",
          Expression::ArrayExpression(_) => "array",
          Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => "function",
          _ => continue,
        };

        diagnostics.push(Diagnostic::new(
          RULE_ID,
          self.severity(),
          format!(
            "Inline {} passed as prop '{}'; its reference changes on every render. \
             Hoist it or memoize it with useMemo/useCallback",
            kind_text, name.name
          ),
          &ctx.location(attr.span),
        ));
      }
    }

    diagnostics
  }
}
