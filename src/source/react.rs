//! React-aware helpers over the oxc AST
//!
//! Everything here answers questions in React's vocabulary: is this binding a
//! component, is this call a hook, what does this JSX attribute pass. The
//! answers are purely syntactic plus light heuristics over annotation text;
//! no type inference is consulted.

use crate::source::model::{AttrValue, DataShape, DepEntry, DepKind, HookKind};
use crate::source::FileContext;
use crate::utils;
use oxc_ast::ast::{
  CallExpression, Expression, JSXAttributeValue, JSXElementName, JSXMemberExpression,
  JSXMemberExpressionObject, JSXOpeningElement, StaticMemberExpression,
};
use oxc_ast::AstKind;
use oxc_semantic::Semantic;
use oxc_span::{GetSpan, Span};

/// Strip parentheses and TS assertion wrappers from an expression
pub fn strip_wrappers<'a, 'b>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
  match expr {
    Expression::ParenthesizedExpression(e) => strip_wrappers(&e.expression),
    Expression::TSAsExpression(e) => strip_wrappers(&e.expression),
    Expression::TSSatisfiesExpression(e) => strip_wrappers(&e.expression),
    Expression::TSNonNullExpression(e) => strip_wrappers(&e.expression),
    _ => expr,
  }
}

/// Printable callee of a call: `foo` or `React.foo`
pub fn callee_name(call: &CallExpression) -> Option<String> {
  match strip_wrappers(&call.callee) {
    Expression::Identifier(ident) => Some(ident.name.to_string()),
    Expression::StaticMemberExpression(member) => {
      if let Expression::Identifier(object) = strip_wrappers(&member.object) {
        Some(format!("{}.{}", object.name, member.property.name))
      } else {
        None
      }
    }
    _ => None,
  }
}

pub fn is_memo_callee(name: &str) -> bool {
  matches!(name, "memo" | "React.memo")
}

pub fn is_forward_ref_callee(name: &str) -> bool {
  matches!(name, "forwardRef" | "React.forwardRef")
}

/// Unwrap memo/forwardRef wrapper calls around a component initializer
///
/// Returns the innermost expression and whether any memo layer was present.
/// `memo(forwardRef(fn))` and `forwardRef(memo(fn))` both unwrap fully.
pub fn unwrap_component_wrappers<'a, 'b>(expr: &'b Expression<'a>) -> (&'b Expression<'a>, bool) {
  let mut current = strip_wrappers(expr);
  let mut memoized = false;

  loop {
    if let Expression::CallExpression(call) = current {
      if let Some(name) = callee_name(call) {
        if is_memo_callee(&name) || is_forward_ref_callee(&name) {
          if let Some(arg) = call.arguments.first().and_then(|a| a.as_expression()) {
            memoized = memoized || is_memo_callee(&name);
            current = strip_wrappers(arg);
            continue;
          }
        }
      }
    }
    return (current, memoized);
  }
}

/// Classify a hook callee; `React.`-qualified calls count
pub fn hook_kind(callee: &str) -> Option<HookKind> {
  let name = callee.strip_prefix("React.").unwrap_or(callee);
  let kind = match name {
    "useState" => HookKind::State,
    "useReducer" => HookKind::Reducer,
    "useMemo" => HookKind::Memo,
    "useCallback" => HookKind::Callback,
    "useContext" => HookKind::Context,
    "useEffect" | "useLayoutEffect" | "useInsertionEffect" => HookKind::Effect,
    "useRef" => HookKind::Ref,
    _ if utils::is_hook_name(name) => HookKind::Other,
    _ => return None,
  };
  Some(kind)
}

/// Callee name when the call follows the hook naming convention
pub fn hook_call_name(call: &CallExpression) -> Option<String> {
  let name = callee_name(call)?;
  hook_kind(&name).map(|_| name)
}

/// Hooks whose last argument is a dependency array
pub fn hook_takes_deps(kind: HookKind) -> bool {
  matches!(kind, HookKind::Memo | HookKind::Callback | HookKind::Effect)
}

/// Resolve the dependency-array argument of a hook call
///
/// Identifier and member-expression entries are `Identifier` dependencies;
/// everything else (object/array literals, calls) is an inline expression.
pub fn dependency_array(ctx: &FileContext, call: &CallExpression) -> Option<Vec<DepEntry>> {
  if call.arguments.len() < 2 {
    return None;
  }

  let last = call.arguments.last()?.as_expression()?;
  let Expression::ArrayExpression(array) = strip_wrappers(last) else {
    return None;
  };

  let mut entries = Vec::new();
  for element in &array.elements {
    let Some(expr) = element.as_expression() else {
      continue;
    };
    let expr = strip_wrappers(expr);
    let span = expr.span();
    let kind = match expr {
      Expression::Identifier(_)
      | Expression::StaticMemberExpression(_)
      | Expression::ComputedMemberExpression(_) => DepKind::Identifier,
      _ => DepKind::Inline,
    };
    entries.push(DepEntry {
      kind,
      text: ctx.text(span).to_string(),
      location: ctx.location(span),
    });
  }

  Some(entries)
}

/// Element name as written: `Child`, `div`, `Ctx.Provider`
pub fn jsx_element_name(opening: &JSXOpeningElement) -> Option<String> {
  match &opening.name {
    JSXElementName::Identifier(ident) => Some(ident.name.to_string()),
    JSXElementName::IdentifierReference(ident) => Some(ident.name.to_string()),
    JSXElementName::MemberExpression(member) => jsx_member_name(member),
    JSXElementName::NamespacedName(_) | JSXElementName::ThisExpression(_) => None,
  }
}

fn jsx_member_name(member: &JSXMemberExpression) -> Option<String> {
  let object = match &member.object {
    JSXMemberExpressionObject::IdentifierReference(ident) => ident.name.to_string(),
    JSXMemberExpressionObject::MemberExpression(inner) => jsx_member_name(inner)?,
    JSXMemberExpressionObject::ThisExpression(_) => return None,
  };
  Some(format!("{}.{}", object, member.property.name))
}

/// Root identifier and dotted property path of a member chain
/// (`settings.user.locale` -> ("settings", "user.locale"))
pub fn member_parts(member: &StaticMemberExpression) -> Option<(String, String)> {
  match strip_wrappers(&member.object) {
    Expression::Identifier(ident) => {
      Some((ident.name.to_string(), member.property.name.to_string()))
    }
    Expression::StaticMemberExpression(inner) => {
      let (root, path) = member_parts(inner)?;
      Some((root, format!("{}.{}", path, member.property.name)))
    }
    _ => None,
  }
}

/// Classify the value of a JSX attribute
pub fn classify_attr_value(ctx: &FileContext, value: Option<&JSXAttributeValue>) -> AttrValue {
  let Some(value) = value else {
    return AttrValue::Empty;
  };

  match value {
    JSXAttributeValue::StringLiteral(lit) => AttrValue::StringLiteral(lit.value.to_string()),
    JSXAttributeValue::ExpressionContainer(container) => {
      match container.expression.as_expression() {
        Some(expr) => classify_expression(ctx, expr),
        None => AttrValue::Empty,
      }
    }
    JSXAttributeValue::Element(_) | JSXAttributeValue::Fragment(_) => AttrValue::JsxNode,
  }
}

/// Classify an attribute-value expression by reference-stability shape
pub fn classify_expression(ctx: &FileContext, expr: &Expression) -> AttrValue {
  let expr = strip_wrappers(expr);
  let span = expr.span();

  match expr {
    Expression::StringLiteral(_)
    | Expression::NumericLiteral(_)
    | Expression::BooleanLiteral(_)
    | Expression::BigIntLiteral(_)
    | Expression::NullLiteral(_) => AttrValue::PrimitiveLiteral(ctx.text(span).to_string()),
    // Template strings are primitives; value equality is what memo sees
    Expression::TemplateLiteral(_) => AttrValue::PrimitiveLiteral(ctx.text(span).to_string()),
    Expression::Identifier(ident) => AttrValue::Identifier(ident.name.to_string()),
    Expression::ObjectExpression(_) => AttrValue::InlineObject,
    Expression::ArrayExpression(_) => AttrValue::InlineArray,
    Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
      AttrValue::InlineFunction
    }
    Expression::StaticMemberExpression(member) => match member_parts(member) {
      Some((root, property)) => AttrValue::Member {
        root,
        property,
        text: ctx.text(span).to_string(),
      },
      None => AttrValue::Other(ctx.text(span).to_string()),
    },
    Expression::CallExpression(call) => AttrValue::Call {
      callee: callee_name(call).unwrap_or_else(|| "<expression>".to_string()),
    },
    Expression::JSXElement(_) | Expression::JSXFragment(_) => AttrValue::JsxNode,
    Expression::NewExpression(_) => AttrValue::InlineObject,
    _ => AttrValue::Other(ctx.text(span).to_string()),
  }
}

/// Coarse data shape of an initializer expression
pub fn data_shape_of(expr: &Expression) -> DataShape {
  match strip_wrappers(expr) {
    Expression::StringLiteral(_)
    | Expression::NumericLiteral(_)
    | Expression::BooleanLiteral(_)
    | Expression::BigIntLiteral(_)
    | Expression::NullLiteral(_)
    | Expression::TemplateLiteral(_) => DataShape::Primitive,
    Expression::ObjectExpression(_) | Expression::NewExpression(_) => DataShape::Object,
    Expression::ArrayExpression(_) => DataShape::Array,
    Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
      DataShape::Function
    }
    _ => DataShape::Unknown,
  }
}

/// Does a function body contain a JSX-bearing return path?
///
/// A JSX node counts when its nearest enclosing function is the one under
/// test and it sits under a return statement (or is the expression body of
/// an arrow). JSX inside nested callbacks belongs to those callbacks.
pub fn has_jsx_return(semantic: &Semantic, func_span: Span) -> bool {
  let nodes = semantic.nodes();

  for node in nodes.iter() {
    match node.kind() {
      AstKind::JSXElement(_) | AstKind::JSXFragment(_) => {}
      _ => continue,
    }

    let span = node.kind().span();
    if span.start < func_span.start || span.end > func_span.end {
      continue;
    }

    // Walk up: find the nearest enclosing function and whether the path to
    // it runs through a return statement.
    let mut current_id = node.id();
    let mut passed_return = false;
    loop {
      let parent_id = nodes.parent_id(current_id);
      if parent_id == current_id {
        break;
      }
      let parent = nodes.get_node(parent_id);
      match parent.kind() {
        AstKind::ReturnStatement(_) => {
          passed_return = true;
        }
        AstKind::Function(func) => {
          if func.span() == func_span && passed_return {
            return true;
          }
          break;
        }
        AstKind::ArrowFunctionExpression(arrow) => {
          if arrow.span == func_span && (passed_return || arrow.expression) {
            return true;
          }
          break;
        }
        _ => {}
      }
      current_id = parent_id;
    }
  }

  false
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::{build_semantic, parse_source};
  use oxc_allocator::Allocator;
  use std::path::Path;

  fn with_semantic<F: FnOnce(&Semantic)>(source: &str, f: F) {
    let allocator = Allocator::default();
    let unit = parse_source(&allocator, Path::new("test.tsx"), source);
    let semantic = build_semantic(Path::new("test.tsx"), &unit.program);
    f(&semantic);
  }

  fn first_function_span(semantic: &Semantic) -> Span {
    semantic
      .nodes()
      .iter()
      .find_map(|node| match node.kind() {
        AstKind::Function(func) => Some(func.span()),
        AstKind::ArrowFunctionExpression(arrow) => Some(arrow.span),
        _ => None,
      })
      .expect("no function in source")
  }

  #[test]
  fn test_jsx_return_function_declaration() {
    with_semantic("function App() { return <div>hi</div>; }", |semantic| {
      let span = first_function_span(semantic);
      assert!(has_jsx_return(semantic, span));
    });
  }

  #[test]
  fn test_jsx_return_expression_arrow() {
    with_semantic("const App = () => <div>hi</div>;", |semantic| {
      let span = first_function_span(semantic);
      assert!(has_jsx_return(semantic, span));
    });
  }

  #[test]
  fn test_no_jsx_return_for_plain_function() {
    with_semantic("function add(a: number, b: number) { return a + b; }", |semantic| {
      let span = first_function_span(semantic);
      assert!(!has_jsx_return(semantic, span));
    });
  }

  #[test]
  fn test_jsx_in_nested_callback_does_not_count_for_outer() {
    // The JSX belongs to the inner arrow; the outer function never returns it
    with_semantic(
      "function useRows(items) { const make = () => <li />; return make; }",
      |semantic| {
        let span = first_function_span(semantic);
        assert!(!has_jsx_return(semantic, span));
      },
    );
  }

  #[test]
  fn test_conditional_jsx_return_counts() {
    with_semantic(
      "function App({ ready }) { if (!ready) { return null; } return <main />; }",
      |semantic| {
        let span = first_function_span(semantic);
        assert!(has_jsx_return(semantic, span));
      },
    );
  }
}
