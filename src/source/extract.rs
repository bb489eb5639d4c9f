//! Per-file extraction
//!
//! Walks a parsed file once and copies everything the global passes need into
//! an owned [`FileAnalysis`]: import/export tables, component declarations
//! with their props, hook calls, JSX usages with classified attribute values,
//! and the props-used-locally sets. The oxc arena stays behind.

use crate::source::model::{
  ComponentInfo, ComponentKind, ContextDecl, DefaultExport, Export, FileAnalysis, HookCall,
  HookKind, Import, JsxAttr, JsxSpread, JsxUsage, Location, PropDecl, SetterCall, SpreadExpr,
};
use crate::source::{react, FileContext};
use crate::utils;
use oxc_ast::ast::{
  BindingPatternKind, Declaration, Expression, ExportDefaultDeclarationKind, FormalParameters,
  FunctionType, ImportDeclarationSpecifier, JSXAttributeItem, JSXAttributeName,
  JSXAttributeValue, Program, PropertyKey, Statement, TSSignature, TSType, TSTypeAnnotation,
  TSTypeName, VariableDeclarator,
};
use oxc_ast::AstKind;
use oxc_span::{GetSpan, Span};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use tracing::debug;

/// Ordered (name, type_text, optional) members of a props type
type MemberList = Vec<(String, Option<String>, bool)>;

/// Extract the owned analysis for one parsed file
pub fn extract_file(ctx: &FileContext, program: &Program) -> FileAnalysis {
  let mut analysis = FileAnalysis {
    file_path: ctx.file_path.to_path_buf(),
    ..Default::default()
  };

  analysis.imports = extract_imports(program);
  analysis.exports = extract_exports(program);

  let interfaces = collect_prop_types(ctx);

  collect_components(ctx, &interfaces, &mut analysis);
  collect_module_scope(ctx, program, &mut analysis);

  // A `export default Name` referencing a local component marks it
  if let Some(default) = &analysis.default_export {
    if let Some(local) = &default.local_name {
      for component in &mut analysis.components {
        if component.name == *local {
          component.default_export = true;
          component.exported = true;
          component.memoized = component.memoized || default.memoized;
        }
      }
    }
  }

  collect_component_bodies(ctx, &mut analysis.components);

  debug!(
    "Extracted {} components, {} imports, {} exports from {:?}",
    analysis.components.len(),
    analysis.imports.len(),
    analysis.exports.len(),
    ctx.file_path
  );

  analysis
}

/// Extract static imports from the program body
fn extract_imports(program: &Program) -> Vec<Import> {
  let mut imports = Vec::new();

  for node in program.body.iter() {
    let Statement::ImportDeclaration(import_decl) = node else {
      continue;
    };
    let from_module = import_decl.source.value.as_str().to_string();
    let is_type_only = import_decl.import_kind.is_type();

    if let Some(specifiers) = &import_decl.specifiers {
      for specifier in specifiers.iter() {
        match specifier {
          ImportDeclarationSpecifier::ImportSpecifier(spec) => {
            imports.push(Import {
              imported_name: spec.imported.name().to_string(),
              local_name: spec.local.name.to_string(),
              from_module: from_module.clone(),
              is_type_only: is_type_only || spec.import_kind.is_type(),
            });
          }
          ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
            imports.push(Import {
              imported_name: "default".to_string(),
              local_name: spec.local.name.to_string(),
              from_module: from_module.clone(),
              is_type_only,
            });
          }
          ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
            imports.push(Import {
              imported_name: "*".to_string(),
              local_name: spec.local.name.to_string(),
              from_module: from_module.clone(),
              is_type_only,
            });
          }
        }
      }
    }
  }

  imports
}

/// Extract exports from the program body
fn extract_exports(program: &Program) -> Vec<Export> {
  let mut exports = Vec::new();

  for node in program.body.iter() {
    match node {
      Statement::ExportNamedDeclaration(export_decl) => {
        let re_export_from = export_decl
          .source
          .as_ref()
          .map(|s| s.value.as_str().to_string());

        for specifier in &export_decl.specifiers {
          exports.push(Export {
            exported_name: specifier.exported.name().to_string(),
            local_name: Some(specifier.local.name().to_string()),
            re_export_from: re_export_from.clone(),
          });
        }

        // Inline exports (export const x = ..., export function X() {})
        if let Some(decl) = &export_decl.declaration {
          match decl {
            Declaration::VariableDeclaration(var_decl) => {
              for declarator in &var_decl.declarations {
                if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                  exports.push(Export {
                    exported_name: id.name.to_string(),
                    local_name: None,
                    re_export_from: None,
                  });
                }
              }
            }
            Declaration::FunctionDeclaration(func_decl) => {
              if let Some(id) = &func_decl.id {
                exports.push(Export {
                  exported_name: id.name.to_string(),
                  local_name: None,
                  re_export_from: None,
                });
              }
            }
            Declaration::ClassDeclaration(class_decl) => {
              if let Some(id) = &class_decl.id {
                exports.push(Export {
                  exported_name: id.name.to_string(),
                  local_name: None,
                  re_export_from: None,
                });
              }
            }
            _ => {}
          }
        }
      }
      Statement::ExportDefaultDeclaration(_) => {
        exports.push(Export {
          exported_name: "default".to_string(),
          local_name: None,
          re_export_from: None,
        });
      }
      Statement::ExportAllDeclaration(export_all) => {
        exports.push(Export {
          exported_name: "*".to_string(),
          local_name: None,
          re_export_from: Some(export_all.source.value.as_str().to_string()),
        });
      }
      _ => {}
    }
  }

  exports
}

/// Interface and type-literal alias members, for prop type lookups
fn collect_prop_types(ctx: &FileContext) -> Vec<(String, MemberList)> {
  let mut types = Vec::new();

  for node in ctx.semantic.nodes().iter() {
    match node.kind() {
      AstKind::TSInterfaceDeclaration(interface) => {
        types.push((
          interface.id.name.to_string(),
          members_of_signatures(ctx, &interface.body.body),
        ));
      }
      AstKind::TSTypeAliasDeclaration(alias) => {
        if let TSType::TSTypeLiteral(literal) = &alias.type_annotation {
          types.push((
            alias.id.name.to_string(),
            members_of_signatures(ctx, &literal.members),
          ));
        }
      }
      _ => {}
    }
  }

  types
}

fn members_of_signatures(ctx: &FileContext, members: &[TSSignature]) -> MemberList {
  let mut list = MemberList::new();
  for member in members {
    let TSSignature::TSPropertySignature(sig) = member else {
      continue;
    };
    let PropertyKey::StaticIdentifier(id) = &sig.key else {
      continue;
    };
    let type_text = sig
      .type_annotation
      .as_ref()
      .map(|t| ctx.text(t.type_annotation.span()).to_string());
    list.push((id.name.to_string(), type_text, sig.optional));
  }
  list
}

/// Find component declarations at any scope depth
fn collect_components(
  ctx: &FileContext,
  prop_types: &[(String, MemberList)],
  analysis: &mut FileAnalysis,
) {
  let exported: FxHashSet<String> = analysis
    .exports
    .iter()
    .flat_map(|e| {
      [
        Some(e.exported_name.clone()),
        e.local_name.clone(),
      ]
    })
    .flatten()
    .collect();

  for node in ctx.semantic.nodes().iter() {
    match node.kind() {
      AstKind::Function(func) => {
        if func.r#type != FunctionType::FunctionDeclaration {
          continue;
        }
        let Some(id) = &func.id else { continue };
        let name = id.name.to_string();
        if !utils::is_pascal_case(&name) {
          continue;
        }
        let span = func.span();
        if !react::has_jsx_return(ctx.semantic, span) {
          continue;
        }
        let (props, props_param, rest_prop) = extract_props(ctx, &func.params, prop_types);
        analysis.components.push(make_component(
          ctx,
          name.clone(),
          ComponentKind::FunctionDeclaration,
          false,
          exported.contains(name.as_str()),
          props,
          props_param,
          rest_prop,
          None,
          span,
        ));
      }
      AstKind::VariableDeclarator(declarator) => {
        if let Some(component) = component_from_declarator(ctx, declarator, prop_types, &exported)
        {
          analysis.components.push(component);
        }
      }
      _ => {}
    }
  }
}

fn component_from_declarator(
  ctx: &FileContext,
  declarator: &VariableDeclarator,
  prop_types: &[(String, MemberList)],
  exported: &FxHashSet<String>,
) -> Option<ComponentInfo> {
  let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
    return None;
  };
  let name = id.name.to_string();
  if !utils::is_pascal_case(&name) {
    return None;
  }
  let init = declarator.init.as_ref()?;
  let (inner, memoized) = react::unwrap_component_wrappers(init);

  match inner {
    Expression::ArrowFunctionExpression(arrow) => {
      let span = arrow.span;
      if !react::has_jsx_return(ctx.semantic, span) {
        return None;
      }
      let (props, props_param, rest_prop) = extract_props(ctx, &arrow.params, prop_types);
      Some(make_component(
        ctx,
        name.clone(),
        ComponentKind::ArrowFunction,
        memoized,
        exported.contains(name.as_str()),
        props,
        props_param,
        rest_prop,
        None,
        span,
      ))
    }
    Expression::FunctionExpression(func) => {
      let span = func.span();
      if !react::has_jsx_return(ctx.semantic, span) {
        return None;
      }
      let (props, props_param, rest_prop) = extract_props(ctx, &func.params, prop_types);
      Some(make_component(
        ctx,
        name.clone(),
        ComponentKind::ArrowFunction,
        memoized,
        exported.contains(name.as_str()),
        props,
        props_param,
        rest_prop,
        None,
        span,
      ))
    }
    // const Memoized = memo(Other) - wrapper binding over another component
    Expression::Identifier(wrapped) if memoized => Some(make_component(
      ctx,
      name.clone(),
      ComponentKind::MemoWrapper,
      true,
      exported.contains(name.as_str()),
      Vec::new(),
      None,
      None,
      Some(wrapped.name.to_string()),
      declarator.span(),
    )),
    _ => None,
  }
}

#[allow(clippy::too_many_arguments)]
fn make_component(
  ctx: &FileContext,
  name: String,
  kind: ComponentKind,
  memoized: bool,
  exported: bool,
  props: Vec<PropDecl>,
  props_param: Option<String>,
  rest_prop: Option<String>,
  wraps: Option<String>,
  span: Span,
) -> ComponentInfo {
  let mut location = ctx.location(span);
  location.component = Some(name.clone());
  ComponentInfo {
    name,
    kind,
    memoized,
    exported,
    default_export: false,
    props,
    props_param,
    rest_prop,
    props_used_locally: BTreeSet::new(),
    hooks: Vec::new(),
    jsx: Vec::new(),
    setter_calls: Vec::new(),
    wraps,
    location,
    span: (span.start, span.end),
  }
}

/// Declared props from the first parameter: destructuring pattern preferred,
/// plain `props` identifier otherwise (with type members when annotated)
fn extract_props(
  ctx: &FileContext,
  params: &FormalParameters,
  prop_types: &[(String, MemberList)],
) -> (Vec<PropDecl>, Option<String>, Option<String>) {
  let Some(first) = params.items.first() else {
    return (Vec::new(), None, None);
  };
  let pattern = &first.pattern;
  let members = annotation_members(ctx, pattern.type_annotation.as_deref(), prop_types);

  match &pattern.kind {
    BindingPatternKind::ObjectPattern(object) => {
      let mut props = Vec::new();
      for property in &object.properties {
        let PropertyKey::StaticIdentifier(key) = &property.key else {
          continue;
        };
        let name = key.name.to_string();
        let default_text = match &property.value.kind {
          BindingPatternKind::AssignmentPattern(assignment) => {
            Some(ctx.text(assignment.right.span()).to_string())
          }
          _ => None,
        };
        let (type_text, optional) = members
          .iter()
          .find(|(n, _, _)| *n == name)
          .map(|(_, t, o)| (t.clone(), *o))
          .unwrap_or((None, false));
        props.push(PropDecl {
          name,
          type_text,
          required: default_text.is_none() && !optional,
          default_text,
        });
      }
      let rest_prop = object.rest.as_ref().and_then(|rest| {
        if let BindingPatternKind::BindingIdentifier(id) = &rest.argument.kind {
          Some(id.name.to_string())
        } else {
          None
        }
      });
      (props, None, rest_prop)
    }
    BindingPatternKind::BindingIdentifier(id) => {
      // Non-destructured: declared props only known through the annotation
      let props = members
        .into_iter()
        .map(|(name, type_text, optional)| PropDecl {
          name,
          type_text,
          required: !optional,
          default_text: None,
        })
        .collect();
      (props, Some(id.name.to_string()), None)
    }
    _ => (Vec::new(), None, None),
  }
}

fn annotation_members(
  ctx: &FileContext,
  annotation: Option<&TSTypeAnnotation>,
  prop_types: &[(String, MemberList)],
) -> MemberList {
  let Some(annotation) = annotation else {
    return MemberList::new();
  };
  match &annotation.type_annotation {
    TSType::TSTypeLiteral(literal) => members_of_signatures(ctx, &literal.members),
    TSType::TSTypeReference(reference) => {
      if let TSTypeName::IdentifierReference(ident) = &reference.type_name {
        prop_types
          .iter()
          .find(|(name, _)| *name == ident.name.as_str())
          .map(|(_, members)| members.clone())
          .unwrap_or_default()
      } else {
        MemberList::new()
      }
    }
    _ => MemberList::new(),
  }
}

/// Module-scope pass: constants, contexts, default export
fn collect_module_scope(ctx: &FileContext, program: &Program, analysis: &mut FileAnalysis) {
  for stmt in program.body.iter() {
    match stmt {
      Statement::VariableDeclaration(var_decl) => {
        module_variable_declaration(ctx, var_decl, false, analysis);
      }
      Statement::ExportNamedDeclaration(export_decl) => {
        if let Some(Declaration::VariableDeclaration(var_decl)) = &export_decl.declaration {
          module_variable_declaration(ctx, var_decl, true, analysis);
        }
      }
      Statement::ExportDefaultDeclaration(export_default) => {
        default_export_declaration(ctx, &export_default.declaration, analysis);
      }
      _ => {}
    }
  }
}

fn module_variable_declaration(
  ctx: &FileContext,
  var_decl: &oxc_ast::ast::VariableDeclaration,
  exported: bool,
  analysis: &mut FileAnalysis,
) {
  let is_const = var_decl.kind.is_const();

  for declarator in &var_decl.declarations {
    let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
      continue;
    };
    let name = id.name.to_string();

    // Module-scope consts are created once; referentially stable
    if is_const {
      analysis.module_constants.insert(name.clone());
    }

    if let Some(init) = &declarator.init {
      if let Expression::CallExpression(call) = react::strip_wrappers(init) {
        if let Some(callee) = react::callee_name(call) {
          if matches!(callee.as_str(), "createContext" | "React.createContext") {
            analysis.contexts.push(ContextDecl {
              name,
              exported,
              location: ctx.location(declarator.span()),
            });
          }
        }
      }
    }
  }
}

fn default_export_declaration(
  ctx: &FileContext,
  declaration: &ExportDefaultDeclarationKind,
  analysis: &mut FileAnalysis,
) {
  if let ExportDefaultDeclarationKind::FunctionDeclaration(func) = declaration {
    // `export default function App() {}` is picked up by the component scan
    // when named; anonymous defaults adopt the module base name.
    if func.id.is_none() && react::has_jsx_return(ctx.semantic, func.span()) {
      let name = utils::module_base_name(ctx.file_path);
      let (props, props_param, rest_prop) = extract_props(ctx, &func.params, &[]);
      let mut component = make_component(
        ctx,
        name.clone(),
        ComponentKind::FunctionDeclaration,
        false,
        true,
        props,
        props_param,
        rest_prop,
        None,
        func.span(),
      );
      component.default_export = true;
      analysis.components.push(component);
    }
    analysis.default_export = Some(DefaultExport {
      local_name: func.id.as_ref().map(|id| id.name.to_string()),
      memoized: false,
    });
    return;
  }

  let Some(expr) = declaration.as_expression() else {
    return;
  };
  let (inner, memoized) = react::unwrap_component_wrappers(expr);

  match inner {
    Expression::Identifier(ident) => {
      analysis.default_export = Some(DefaultExport {
        local_name: Some(ident.name.to_string()),
        memoized,
      });
    }
    Expression::ArrowFunctionExpression(arrow) => {
      if react::has_jsx_return(ctx.semantic, arrow.span) {
        let name = utils::module_base_name(ctx.file_path);
        let (props, props_param, rest_prop) = extract_props(ctx, &arrow.params, &[]);
        let mut component = make_component(
          ctx,
          name.clone(),
          ComponentKind::ArrowFunction,
          memoized,
          true,
          props,
          props_param,
          rest_prop,
          None,
          arrow.span,
        );
        component.default_export = true;
        analysis.components.push(component);
        analysis.default_export = Some(DefaultExport {
          local_name: Some(name),
          memoized,
        });
      }
    }
    _ => {
      analysis.default_export = Some(DefaultExport {
        local_name: None,
        memoized,
      });
    }
  }
}

/// Body pass: hooks, JSX usages, setter calls, props used locally
fn collect_component_bodies(ctx: &FileContext, components: &mut [ComponentInfo]) {
  if components.is_empty() {
    return;
  }

  // Innermost containing component for a span; components may nest
  let spans: Vec<(u32, u32)> = components.iter().map(|c| c.span).collect();
  let innermost = |span: Span| -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, (start, end)) in spans.iter().enumerate() {
      if *start <= span.start && span.end <= *end {
        let better = match best {
          Some(prev) => {
            let (ps, pe) = spans[prev];
            (*end - *start) < (pe - ps)
          }
          None => true,
        };
        if better {
          best = Some(idx);
        }
      }
    }
    best
  };

  let nodes = ctx.semantic.nodes();

  // Pass A: hooks (bound and bare)
  for node in nodes.iter() {
    match node.kind() {
      AstKind::VariableDeclarator(declarator) => {
        let Some(init) = &declarator.init else { continue };
        let Expression::CallExpression(call) = react::strip_wrappers(init) else {
          continue;
        };
        let Some(callee) = react::hook_call_name(call) else {
          continue;
        };
        let Some(idx) = innermost(declarator.span()) else {
          continue;
        };
        let hook = bound_hook(ctx, &callee, call, declarator);
        components[idx].hooks.push(hook);
      }
      AstKind::CallExpression(call) => {
        // Bare hook statements, typically effects
        let parent = nodes.get_node(nodes.parent_id(node.id()));
        if !matches!(parent.kind(), AstKind::ExpressionStatement(_)) {
          continue;
        }
        let Some(callee) = react::hook_call_name(call) else {
          continue;
        };
        let Some(idx) = innermost(call.span) else { continue };
        let kind = react::hook_kind(&callee).unwrap_or(HookKind::Other);
        components[idx].hooks.push(HookCall {
          kind,
          callee: callee.clone(),
          value_name: None,
          setter_name: None,
          bound_name: None,
          initial_text: None,
          data_shape: Default::default(),
          deps: react::dependency_array(ctx, call),
          context_ident: None,
          location: ctx.location(call.span),
        });
      }
      _ => {}
    }
  }

  // Setter names per component, for update-site and stale-state tracking
  let setters: Vec<FxHashSet<String>> = components
    .iter()
    .map(|c| {
      c.hooks
        .iter()
        .filter_map(|h| h.setter_name.clone())
        .collect()
    })
    .collect();

  // Spans of identifiers that only forward a value through a JSX attribute
  let mut forwarding: FxHashSet<u32> = FxHashSet::default();

  // Pass B: JSX usages
  for node in nodes.iter() {
    let AstKind::JSXOpeningElement(opening) = node.kind() else {
      continue;
    };
    let Some(idx) = innermost(opening.span) else {
      continue;
    };
    let Some(element_name) = react::jsx_element_name(opening) else {
      continue;
    };

    let mut attributes = Vec::new();
    let mut spreads = Vec::new();

    for item in &opening.attributes {
      match item {
        JSXAttributeItem::Attribute(attr) => {
          let JSXAttributeName::Identifier(attr_name) = &attr.name else {
            continue;
          };
          let value = react::classify_attr_value(ctx, attr.value.as_ref());

          // A bare identifier as the whole attribute value is a forwarding
          // position, not a local use
          if let Some(JSXAttributeValue::ExpressionContainer(container)) = &attr.value {
            if let Some(Expression::Identifier(ident)) =
              container.expression.as_expression().map(react::strip_wrappers)
            {
              forwarding.insert(ident.span.start);
            }
          }

          attributes.push(JsxAttr {
            name: attr_name.name.to_string(),
            value,
            location: ctx.location(attr.span),
          });
        }
        JSXAttributeItem::SpreadAttribute(spread) => {
          let expr = match react::strip_wrappers(&spread.argument) {
            Expression::Identifier(ident) => {
              forwarding.insert(ident.span.start);
              SpreadExpr::Identifier(ident.name.to_string())
            }
            other => SpreadExpr::Other(ctx.text(other.span()).to_string()),
          };
          spreads.push(JsxSpread {
            expr,
            location: ctx.location(spread.span),
          });
        }
      }
    }

    components[idx].jsx.push(JsxUsage {
      element_name,
      attributes,
      spreads,
      location: ctx.location(opening.span),
    });
  }

  // Pass C: setter calls and props used locally
  for node in nodes.iter() {
    match node.kind() {
      AstKind::CallExpression(call) => {
        if let Expression::Identifier(callee) = react::strip_wrappers(&call.callee) {
          if let Some(idx) = innermost(call.span) {
            if setters[idx].contains(callee.name.as_str()) {
              components[idx].setter_calls.push(SetterCall {
                setter: callee.name.to_string(),
                location: ctx.location(call.span),
              });
            }
          }
        }
      }
      AstKind::IdentifierReference(ident) => {
        let Some(idx) = innermost(ident.span) else {
          continue;
        };
        if forwarding.contains(&ident.span.start) {
          continue;
        }
        let name = ident.name.as_str();
        let declares_prop = components[idx].props.iter().any(|p| p.name == name);
        let is_props_param = components[idx].props_param.as_deref() == Some(name);

        if declares_prop {
          components[idx].props_used_locally.insert(name.to_string());
        } else if is_props_param {
          // props.x through the parameter object marks x as used
          let parent = nodes.get_node(nodes.parent_id(node.id()));
          if let AstKind::StaticMemberExpression(member) = parent.kind() {
            if member.object.span() == ident.span {
              components[idx]
                .props_used_locally
                .insert(member.property.name.to_string());
            }
          }
        }
      }
      _ => {}
    }
  }
}

fn bound_hook(
  ctx: &FileContext,
  callee: &str,
  call: &oxc_ast::ast::CallExpression,
  declarator: &VariableDeclarator,
) -> HookCall {
  let kind = react::hook_kind(callee).unwrap_or(HookKind::Other);

  let mut value_name = None;
  let mut setter_name = None;
  let mut bound_name = None;

  match &declarator.id.kind {
    BindingPatternKind::ArrayPattern(array) => {
      let mut names = array.elements.iter().map(|element| {
        element.as_ref().and_then(|el| {
          if let BindingPatternKind::BindingIdentifier(id) = &el.kind {
            Some(id.name.to_string())
          } else {
            None
          }
        })
      });
      value_name = names.next().flatten();
      setter_name = names.next().flatten();
    }
    BindingPatternKind::BindingIdentifier(id) => {
      bound_name = Some(id.name.to_string());
    }
    _ => {}
  }

  let first_arg = call.arguments.first().and_then(|a| a.as_expression());

  let (initial_text, data_shape) = match kind {
    HookKind::State | HookKind::Reducer => {
      // useReducer's initial value is the second argument
      let init_expr = if kind == HookKind::Reducer {
        call.arguments.get(1).and_then(|a| a.as_expression())
      } else {
        first_arg
      };
      match init_expr {
        Some(expr) => (
          Some(ctx.text(expr.span()).to_string()),
          react::data_shape_of(expr),
        ),
        None => (None, Default::default()),
      }
    }
    HookKind::Callback => (None, crate::source::model::DataShape::Function),
    HookKind::Memo => {
      // Shape from an expression-body factory, when that cheap view exists
      let shape = match first_arg.map(react::strip_wrappers) {
        Some(Expression::ArrowFunctionExpression(arrow)) if arrow.expression => arrow
          .body
          .statements
          .first()
          .and_then(|stmt| {
            if let oxc_ast::ast::Statement::ExpressionStatement(expr_stmt) = stmt {
              Some(react::data_shape_of(&expr_stmt.expression))
            } else {
              None
            }
          })
          .unwrap_or_default(),
        _ => Default::default(),
      };
      (None, shape)
    }
    _ => (None, Default::default()),
  };

  let context_ident = if kind == HookKind::Context {
    match first_arg.map(react::strip_wrappers) {
      Some(Expression::Identifier(ident)) => Some(ident.name.to_string()),
      _ => None,
    }
  } else {
    None
  };

  let deps = if react::hook_takes_deps(kind) {
    react::dependency_array(ctx, call)
  } else {
    None
  };

  HookCall {
    kind,
    callee: callee.to_string(),
    value_name,
    setter_name,
    bound_name,
    initial_text,
    data_shape,
    deps,
    context_ident,
    location: ctx.location(call.span),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::model::AttrValue;
  use crate::source::{build_semantic, parse_source};
  use oxc_allocator::Allocator;
  use std::path::Path;

  fn analyze(source: &str) -> FileAnalysis {
    analyze_at(Path::new("/proj/src/App.tsx"), source)
  }

  fn analyze_at(path: &Path, source: &str) -> FileAnalysis {
    let allocator = Allocator::default();
    let unit = parse_source(&allocator, path, source);
    let semantic = build_semantic(path, &unit.program);
    let ctx = FileContext {
      file_path: path,
      source,
      semantic: &semantic,
      imports: &[],
    };
    extract_file(&ctx, &unit.program)
  }

  #[test]
  fn test_function_component_with_destructured_props() {
    let analysis = analyze(
      r#"
export function Profile({ name, age = 30 }: { name: string; age?: number }) {
  return <div>{name}</div>;
}
"#,
    );

    assert_eq!(analysis.components.len(), 1);
    let profile = &analysis.components[0];
    assert_eq!(profile.name, "Profile");
    assert_eq!(profile.kind, ComponentKind::FunctionDeclaration);
    assert!(profile.exported);
    assert!(!profile.memoized);

    assert_eq!(profile.props.len(), 2);
    assert_eq!(profile.props[0].name, "name");
    assert!(profile.props[0].required);
    assert_eq!(profile.props[0].type_text.as_deref(), Some("string"));
    assert_eq!(profile.props[1].name, "age");
    assert!(!profile.props[1].required);
    assert_eq!(profile.props[1].default_text.as_deref(), Some("30"));

    assert!(profile.props_used_locally.contains("name"));
    assert!(!profile.props_used_locally.contains("age"));
  }

  #[test]
  fn test_lowercase_function_is_not_a_component() {
    let analysis = analyze("function helper() { return <div />; }");
    assert!(analysis.components.is_empty());
  }

  #[test]
  fn test_non_jsx_function_is_not_a_component() {
    let analysis = analyze("function Add(a, b) { return a + b; }");
    assert!(analysis.components.is_empty());
  }

  #[test]
  fn test_memo_wrapped_arrow_component() {
    let analysis = analyze(
      "import { memo } from 'react';\nexport const Card = memo(({ title }) => <h1>{title}</h1>);",
    );

    assert_eq!(analysis.components.len(), 1);
    let card = &analysis.components[0];
    assert_eq!(card.name, "Card");
    assert_eq!(card.kind, ComponentKind::ArrowFunction);
    assert!(card.memoized);
    assert_eq!(card.props.len(), 1);
    assert_eq!(card.props[0].name, "title");
  }

  #[test]
  fn test_memo_wrapper_binding() {
    let analysis = analyze(
      r#"
function Row({ id }) { return <tr>{id}</tr>; }
const MemoRow = React.memo(Row);
"#,
    );

    assert_eq!(analysis.components.len(), 2);
    let wrapper = analysis
      .components
      .iter()
      .find(|c| c.name == "MemoRow")
      .unwrap();
    assert_eq!(wrapper.kind, ComponentKind::MemoWrapper);
    assert!(wrapper.memoized);
    assert_eq!(wrapper.wraps.as_deref(), Some("Row"));
  }

  #[test]
  fn test_use_state_hook_extraction() {
    let analysis = analyze(
      r#"
function Counter() {
  const [count, setCount] = useState(0);
  return <button onClick={() => setCount(count + 1)}>{count}</button>;
}
"#,
    );

    let counter = &analysis.components[0];
    assert_eq!(counter.hooks.len(), 1);
    let hook = &counter.hooks[0];
    assert_eq!(hook.kind, HookKind::State);
    assert_eq!(hook.value_name.as_deref(), Some("count"));
    assert_eq!(hook.setter_name.as_deref(), Some("setCount"));
    assert_eq!(hook.initial_text.as_deref(), Some("0"));
    assert_eq!(hook.data_shape, crate::source::model::DataShape::Primitive);

    assert_eq!(counter.setter_calls.len(), 1);
    assert_eq!(counter.setter_calls[0].setter, "setCount");
  }

  #[test]
  fn test_effect_and_memo_deps() {
    let analysis = analyze(
      r#"
function Widget({ user }) {
  const label = useMemo(() => user.name, [user]);
  useEffect(() => { console.log(label); }, [label, { raw: user }]);
  return <span>{label}</span>;
}
"#,
    );

    let widget = &analysis.components[0];
    assert_eq!(widget.hooks.len(), 2);

    let memo = widget.hooks.iter().find(|h| h.kind == HookKind::Memo).unwrap();
    assert_eq!(memo.bound_name.as_deref(), Some("label"));
    let memo_deps = memo.deps.as_ref().unwrap();
    assert_eq!(memo_deps.len(), 1);
    assert_eq!(memo_deps[0].kind, crate::source::model::DepKind::Identifier);

    let effect = widget
      .hooks
      .iter()
      .find(|h| h.kind == HookKind::Effect)
      .unwrap();
    let effect_deps = effect.deps.as_ref().unwrap();
    assert_eq!(effect_deps.len(), 2);
    assert_eq!(effect_deps[1].kind, crate::source::model::DepKind::Inline);
  }

  #[test]
  fn test_jsx_attribute_classification() {
    let analysis = analyze(
      r#"
function Parent({ theme, settings }) {
  const style = useMemo(() => ({ color: theme }), [theme]);
  return (
    <Child
      theme={theme}
      locale={settings.locale}
      style={style}
      config={{ deep: true }}
      items={[1, 2]}
      onPick={() => theme}
      label="fixed"
      count={3}
    />
  );
}
"#,
    );

    let parent = &analysis.components[0];
    assert_eq!(parent.jsx.len(), 1);
    let child = &parent.jsx[0];
    assert_eq!(child.element_name, "Child");

    let value_of = |name: &str| {
      &child
        .attributes
        .iter()
        .find(|a| a.name == name)
        .unwrap()
        .value
    };

    assert_eq!(value_of("theme"), &AttrValue::Identifier("theme".into()));
    assert_eq!(
      value_of("locale"),
      &AttrValue::Member {
        root: "settings".into(),
        property: "locale".into(),
        text: "settings.locale".into(),
      }
    );
    assert_eq!(value_of("style"), &AttrValue::Identifier("style".into()));
    assert_eq!(value_of("config"), &AttrValue::InlineObject);
    assert_eq!(value_of("items"), &AttrValue::InlineArray);
    assert_eq!(value_of("onPick"), &AttrValue::InlineFunction);
    assert_eq!(value_of("label"), &AttrValue::StringLiteral("fixed".into()));
    assert_eq!(value_of("count"), &AttrValue::PrimitiveLiteral("3".into()));
  }

  #[test]
  fn test_forwarded_prop_is_not_used_locally() {
    let analysis = analyze(
      r#"
function Middle({ theme }) {
  return <Inner theme={theme} />;
}
"#,
    );

    let middle = &analysis.components[0];
    assert!(middle.props_used_locally.is_empty());
  }

  #[test]
  fn test_read_and_forwarded_prop_is_used_locally() {
    let analysis = analyze(
      r#"
function Middle({ theme }) {
  const cls = theme === 'dark' ? 'dark' : 'light';
  return <Inner theme={theme} className={cls} />;
}
"#,
    );

    let middle = &analysis.components[0];
    assert!(middle.props_used_locally.contains("theme"));
  }

  #[test]
  fn test_spread_attribute() {
    let analysis = analyze(
      r#"
function Wrapper(props) {
  return <Inner {...props} />;
}
"#,
    );

    let wrapper = &analysis.components[0];
    assert_eq!(wrapper.props_param.as_deref(), Some("props"));
    let usage = &wrapper.jsx[0];
    assert_eq!(usage.spreads.len(), 1);
    assert!(matches!(
      &usage.spreads[0].expr,
      SpreadExpr::Identifier(name) if name == "props"
    ));
  }

  #[test]
  fn test_default_export_adopts_module_base_name() {
    let analysis = analyze_at(
      Path::new("/proj/src/Dashboard.tsx"),
      "export default function ({ data }) { return <main>{data}</main>; }",
    );

    assert_eq!(analysis.components.len(), 1);
    assert_eq!(analysis.components[0].name, "Dashboard");
    assert!(analysis.components[0].default_export);
  }

  #[test]
  fn test_default_export_memo_of_local() {
    let analysis = analyze(
      r#"
function Panel({ label }) { return <div>{label}</div>; }
export default React.memo(Panel);
"#,
    );

    let panel = &analysis.components[0];
    assert!(panel.memoized);
    assert!(panel.default_export);
  }

  #[test]
  fn test_create_context_and_use_context() {
    let analysis = analyze(
      r#"
export const ThemeContext = createContext('light');

function Reader() {
  const theme = useContext(ThemeContext);
  return <div className={theme} />;
}
"#,
    );

    assert_eq!(analysis.contexts.len(), 1);
    assert_eq!(analysis.contexts[0].name, "ThemeContext");
    assert!(analysis.contexts[0].exported);

    let reader = &analysis.components[0];
    let hook = &reader.hooks[0];
    assert_eq!(hook.kind, HookKind::Context);
    assert_eq!(hook.context_ident.as_deref(), Some("ThemeContext"));
  }

  #[test]
  fn test_module_constants() {
    let analysis = analyze(
      r#"
const COLUMNS = ['a', 'b'];
let mutable = 1;

function Table() { return <table columns={COLUMNS} />; }
"#,
    );

    assert!(analysis.module_constants.contains("COLUMNS"));
    assert!(!analysis.module_constants.contains("mutable"));
  }

  #[test]
  fn test_imports_and_exports() {
    let analysis = analyze(
      r#"
import Dashboard from './Dashboard';
import { Sidebar as Side } from './Sidebar';
import * as icons from './icons';

export { Side as PublicSide };
export const VERSION = '1.0';
"#,
    );

    assert_eq!(analysis.imports.len(), 3);
    assert_eq!(analysis.imports[0].imported_name, "default");
    assert_eq!(analysis.imports[0].local_name, "Dashboard");
    assert_eq!(analysis.imports[1].imported_name, "Sidebar");
    assert_eq!(analysis.imports[1].local_name, "Side");
    assert_eq!(analysis.imports[2].imported_name, "*");

    assert!(analysis
      .exports
      .iter()
      .any(|e| e.exported_name == "PublicSide" && e.local_name.as_deref() == Some("Side")));
    assert!(analysis.exports.iter().any(|e| e.exported_name == "VERSION"));
  }
}
