//! Graph builder
//!
//! Materializes the project graph from the extracted file analyses in four
//! dependency-ordered passes:
//!
//! 1. components - one node per component declaration
//! 2. state - hooks, props and contexts become state nodes with
//!    defines/updates/derives/consumes edges
//! 3. hierarchy - JSX element names resolve (same-file, then through the
//!    module resolver) into renders edges and parent/child links
//! 4. prop passing - one `passes` edge per JSX attribute, with stability
//!    classification, member-expression synthesis and spread handling
//!
//! Passes 3 and 4 rely on the globally complete output of passes 1-2, so the
//! builder runs after every file has been analyzed. File order is sorted by
//! path, which makes node ids and the edge sequence deterministic.

use crate::graph::model::{
  component_id, state_id, ComponentNode, Edge, EdgeKind, NodeId, ProjectGraph, Stability,
  StabilityReason, StateKind, StateNode, SPREAD_SENTINEL,
};
use crate::resolver::ModuleResolver;
use crate::source::model::{
  AttrValue, ComponentInfo, DataShape, DepKind, FileAnalysis, HookKind, JsxUsage, Location,
  SpreadExpr,
};
use crate::symbols::SymbolTable;
use crate::utils;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use tracing::debug;

pub struct GraphBuilder<'a> {
  analyses: &'a [FileAnalysis],
  resolver: &'a ModuleResolver,
  symbols: &'a SymbolTable,
  graph: ProjectGraph,
  /// Component id -> (file index, component index) into `analyses`
  component_info: FxHashMap<NodeId, (usize, usize)>,
  /// (file index, component index, jsx index) -> resolved target id
  jsx_targets: FxHashMap<(usize, usize, usize), NodeId>,
}

impl<'a> GraphBuilder<'a> {
  /// Build the project graph. `analyses` must be sorted by file path.
  pub fn build(
    analyses: &'a [FileAnalysis],
    resolver: &'a ModuleResolver,
    symbols: &'a SymbolTable,
  ) -> ProjectGraph {
    let mut builder = Self {
      analyses,
      resolver,
      symbols,
      graph: ProjectGraph::new(),
      component_info: FxHashMap::default(),
      jsx_targets: FxHashMap::default(),
    };

    builder.components_pass();
    builder.state_pass();
    builder.hierarchy_pass();
    builder.prop_edges_pass();

    debug!(
      "Graph built: {} components, {} state nodes, {} edges",
      builder.graph.component_nodes.len(),
      builder.graph.state_nodes.len(),
      builder.graph.edges.len()
    );

    builder.graph
  }

  /// Pass 1: one ComponentNode per declaration
  fn components_pass(&mut self) {
    let analyses = self.analyses;
    for (file_idx, analysis) in analyses.iter().enumerate() {
      for (comp_idx, component) in analysis.components.iter().enumerate() {
        let id = component_id(&analysis.file_path, &component.name);
        self.component_info.insert(id.clone(), (file_idx, comp_idx));
        self.graph.add_component(ComponentNode {
          id,
          name: component.name.clone(),
          file_path: analysis.file_path.clone(),
          kind: component.kind,
          memoized: component.memoized,
          props: component.props.clone(),
          props_used_locally: component.props_used_locally.clone(),
          states: Vec::new(),
          consumed: Vec::new(),
          parent: None,
          children: Vec::new(),
          props_passed: BTreeMap::new(),
          location: component.location.clone(),
        });
      }
    }

    // Memo wrappers adopt the props of the component they wrap
    for analysis in analyses {
      for component in &analysis.components {
        let Some(wrapped) = &component.wraps else { continue };
        let Some(target_id) = self.resolve_local_component(analysis, wrapped) else {
          continue;
        };
        let (props, used) = match self.graph.component(&target_id) {
          Some(node) => (node.props.clone(), node.props_used_locally.clone()),
          None => continue,
        };
        let wrapper_id = component_id(&analysis.file_path, &component.name);
        if let Some(wrapper) = self.graph.component_mut(&wrapper_id) {
          wrapper.props = props;
          wrapper.props_used_locally = used;
        }
      }
    }
  }

  /// Pass 2: state nodes and their defining/updating/deriving edges
  fn state_pass(&mut self) {
    let analyses = self.analyses;
    for analysis in analyses {
      let file = &analysis.file_path;

      for context in &analysis.contexts {
        self.graph.add_state(StateNode {
          id: state_id(file, "", &context.name),
          kind: StateKind::Context,
          name: context.name.clone(),
          component: String::new(),
          file_path: file.clone(),
          data_shape: DataShape::Unknown,
          initial_value: None,
          mutable: false,
          dependencies: Vec::new(),
          update_sites: Vec::new(),
          synthetic: false,
        });
      }

      for component in &analysis.components {
        self.component_state(analysis, component);
      }
    }
  }

  fn component_state(&mut self, analysis: &FileAnalysis, component: &ComponentInfo) {
    let file = &analysis.file_path;
    let cid = component_id(file, &component.name);

    // Declared props are observable state of the component
    for prop in &component.props {
      let sid = state_id(file, &component.name, &prop.name);
      self.graph.add_state(StateNode {
        id: sid.clone(),
        kind: StateKind::Prop,
        name: prop.name.clone(),
        component: component.name.clone(),
        file_path: file.clone(),
        data_shape: shape_from_type(prop.type_text.as_deref()),
        initial_value: prop.default_text.clone(),
        mutable: false,
        dependencies: Vec::new(),
        update_sites: Vec::new(),
        synthetic: false,
      });
      self.define(&cid, sid);
    }

    for hook in &component.hooks {
      match hook.kind {
        HookKind::State | HookKind::Reducer => {
          let Some(value_name) = &hook.value_name else {
            continue;
          };
          let sid = state_id(file, &component.name, value_name);
          let update_sites: Vec<Location> = component
            .setter_calls
            .iter()
            .filter(|call| Some(&call.setter) == hook.setter_name.as_ref())
            .map(|call| call.location.clone())
            .collect();

          self.graph.add_state(StateNode {
            id: sid.clone(),
            kind: if hook.kind == HookKind::State {
              StateKind::UseState
            } else {
              StateKind::UseReducer
            },
            name: value_name.clone(),
            component: component.name.clone(),
            file_path: file.clone(),
            data_shape: hook.data_shape,
            initial_value: hook.initial_text.clone(),
            mutable: true,
            dependencies: Vec::new(),
            update_sites: update_sites.clone(),
            synthetic: false,
          });
          self.define(&cid, sid.clone());

          for site in update_sites {
            self
              .graph
              .push_edge(Edge::new(EdgeKind::Updates, cid.clone(), sid.clone()).at(site));
          }
        }
        HookKind::Memo | HookKind::Callback => {
          let Some(bound_name) = &hook.bound_name else {
            continue;
          };
          let sid = state_id(file, &component.name, bound_name);
          let mut dependencies = Vec::new();

          for dep in hook.deps.iter().flatten() {
            let dep_sid = match dep.kind {
              DepKind::Identifier => self
                .local_state_id(analysis, component, &dep.text)
                .unwrap_or_else(|| {
                  self.synthetic_state(analysis, component, &dep.text, DataShape::Unknown)
                }),
              DepKind::Inline => {
                // Inline entries get a synthetic unstable origin so the
                // downstream rules can still trace the dependency
                self.synthetic_state(analysis, component, &dep.text, DataShape::Unknown)
              }
            };
            self
              .graph
              .push_edge(Edge::new(EdgeKind::Derives, sid.clone(), dep_sid.clone()));
            dependencies.push(dep_sid);
          }

          self.graph.add_state(StateNode {
            id: sid.clone(),
            kind: StateKind::Derived,
            name: bound_name.clone(),
            component: component.name.clone(),
            file_path: file.clone(),
            data_shape: if hook.kind == HookKind::Callback {
              DataShape::Function
            } else {
              hook.data_shape
            },
            initial_value: None,
            mutable: false,
            dependencies,
            update_sites: Vec::new(),
            synthetic: false,
          });
          self.define(&cid, sid);
        }
        HookKind::Context => {
          let Some(context_ident) = &hook.context_ident else {
            continue;
          };
          let ctx_sid = self.resolve_context_node(analysis, component, context_ident);
          self.graph.push_edge(
            Edge::new(EdgeKind::Consumes, cid.clone(), ctx_sid.clone())
              .at(hook.location.clone()),
          );
          if let Some(node) = self.graph.component_mut(&cid) {
            node.consumed.push(ctx_sid.clone());
          }

          // The bound value is derived from the context, so passes of the
          // binding trace back to the provider
          if let Some(bound_name) = &hook.bound_name {
            let sid = state_id(file, &component.name, bound_name);
            self.graph.add_state(StateNode {
              id: sid.clone(),
              kind: StateKind::Derived,
              name: bound_name.clone(),
              component: component.name.clone(),
              file_path: file.clone(),
              data_shape: DataShape::Unknown,
              initial_value: None,
              mutable: false,
              dependencies: vec![ctx_sid.clone()],
              update_sites: Vec::new(),
              synthetic: false,
            });
            self
              .graph
              .push_edge(Edge::new(EdgeKind::Derives, sid.clone(), ctx_sid));
            self.define(&cid, sid);
          }
        }
        _ => {}
      }
    }

    // Provider sites publish into the context node
    for usage in &component.jsx {
      let Some(root) = usage.element_name.strip_suffix(".Provider") else {
        continue;
      };
      let Some(ctx_sid) = self.known_context_node(analysis, root) else {
        continue;
      };
      let value_attr = usage.attributes.iter().find(|attr| attr.name == "value");
      self.graph.push_edge(
        Edge::new(EdgeKind::Updates, cid.clone(), ctx_sid.clone()).at(usage.location.clone()),
      );
      if let Some(state) = self.graph.state_mut(&ctx_sid) {
        state.update_sites.push(usage.location.clone());
        if let Some(attr) = value_attr {
          if state.initial_value.is_none() {
            if let AttrValue::Identifier(name) | AttrValue::StringLiteral(name)
            | AttrValue::PrimitiveLiteral(name) = &attr.value
            {
              state.initial_value = Some(name.clone());
            }
          }
        }
      }
    }
  }

  /// Pass 3: resolve JSX element names into the component hierarchy
  fn hierarchy_pass(&mut self) {
    let analyses = self.analyses;
    for (file_idx, analysis) in analyses.iter().enumerate() {
      for (comp_idx, component) in analysis.components.iter().enumerate() {
        let parent_id = component_id(&analysis.file_path, &component.name);

        for (jsx_idx, usage) in component.jsx.iter().enumerate() {
          let Some(target_id) = self.resolve_jsx_target(analysis, usage) else {
            continue;
          };

          self
            .jsx_targets
            .insert((file_idx, comp_idx, jsx_idx), target_id.clone());

          self.graph.push_edge(
            Edge::new(EdgeKind::Renders, parent_id.clone(), target_id.clone())
              .at(usage.location.clone()),
          );

          if let Some(parent) = self.graph.component_mut(&parent_id) {
            if !parent.children.contains(&target_id) {
              parent.children.push(target_id.clone());
            }
          }
          // First-seen parent wins; the full relation is in renders edges
          if target_id != parent_id {
            if let Some(child) = self.graph.component_mut(&target_id) {
              if child.parent.is_none() {
                child.parent = Some(parent_id.clone());
              }
            }
          }
        }
      }
    }
  }

  /// Pass 4: one `passes` edge per JSX attribute
  fn prop_edges_pass(&mut self) {
    let analyses = self.analyses;
    for (file_idx, analysis) in analyses.iter().enumerate() {
      for (comp_idx, component) in analysis.components.iter().enumerate() {
        let parent_id = component_id(&analysis.file_path, &component.name);
        let env = LocalEnv::build(self, analysis, component);

        for (jsx_idx, usage) in component.jsx.iter().enumerate() {
          let Some(target_id) = self.jsx_targets.get(&(file_idx, comp_idx, jsx_idx)).cloned()
          else {
            continue;
          };
          self.attribute_edges(analysis, component, &env, usage, &parent_id, &target_id);
        }
      }
    }
  }

  fn attribute_edges(
    &mut self,
    analysis: &FileAnalysis,
    component: &ComponentInfo,
    env: &LocalEnv,
    usage: &JsxUsage,
    parent_id: &NodeId,
    target_id: &NodeId,
  ) {
    let target_memoized = self
      .graph
      .component(target_id)
      .map(|node| node.memoized)
      .unwrap_or(false);

    for attr in &usage.attributes {
      let classified = self.classify(env, &attr.value);

      // Member expressions get a synthetic derived node so upstream tracing
      // can follow `settings.locale` back to `settings`
      if let AttrValue::Member { root, text, .. } = &attr.value {
        let sid = self.synthetic_state(analysis, component, text, DataShape::Unknown);
        if let Some(root_sid) = env.state_of(root) {
          self
            .graph
            .push_edge(Edge::new(EdgeKind::Derives, sid.clone(), root_sid.clone()));
          if let Some(state) = self.graph.state_mut(&sid) {
            if state.dependencies.is_empty() {
              state.dependencies.push(root_sid);
            }
          }
        }
      }

      let breaks = target_memoized && classified.stability == Stability::Unstable;
      let mut edge = Edge::new(EdgeKind::Passes, parent_id.clone(), target_id.clone());
      edge.prop_name = Some(attr.name.clone());
      edge.source_ident = classified.source_ident;
      edge.stability = Some(classified.stability);
      edge.reason = Some(classified.reason);
      edge.breaks_memoization = Some(breaks);
      edge.data_shape = Some(classified.shape);
      edge.prop_source_var = classified.source_var;
      edge.location = Some(attr.location.clone());
      self.graph.push_edge(edge);

      self.record_passed(parent_id, target_id, &attr.name);
    }

    for spread in &usage.spreads {
      self.spread_edges(analysis, component, usage, spread, parent_id, target_id);
    }
  }

  fn spread_edges(
    &mut self,
    analysis: &FileAnalysis,
    component: &ComponentInfo,
    usage: &JsxUsage,
    spread: &crate::source::model::JsxSpread,
    parent_id: &NodeId,
    target_id: &NodeId,
  ) {
    let spread_name = match &spread.expr {
      SpreadExpr::Identifier(name) => Some(name.clone()),
      SpreadExpr::Other(text) => {
        debug!("Opaque spread '{}' in {:?}", text, analysis.file_path);
        None
      }
    };

    let is_props_object = spread_name.as_deref().is_some_and(|name| {
      component.props_param.as_deref() == Some(name)
        || component.rest_prop.as_deref() == Some(name)
        || component.props.iter().any(|p| p.name == name)
    });

    let analyses = self.analyses;
    let target_info = self
      .component_info
      .get(target_id)
      .map(|&(fi, ci)| &analyses[fi].components[ci]);
    let target_destructures = target_info
      .map(|info| info.props_param.is_none() && !info.props.is_empty())
      .unwrap_or(false);

    if is_props_object && target_destructures {
      let spread_name = spread_name.as_deref().unwrap_or_default();
      let explicit: FxHashSet<&str> = usage
        .attributes
        .iter()
        .map(|attr| attr.name.as_str())
        .collect();
      // Props the parent destructured out never reach a `...rest` spread
      let consumed_by_parent: FxHashSet<&str> =
        if component.rest_prop.as_deref() == Some(spread_name) {
          component.props.iter().map(|p| p.name.as_str()).collect()
        } else {
          FxHashSet::default()
        };

      let target_props: Vec<String> = target_info
        .map(|info| info.props.iter().map(|p| p.name.clone()).collect())
        .unwrap_or_default();

      for prop_name in target_props {
        if explicit.contains(prop_name.as_str()) || consumed_by_parent.contains(prop_name.as_str())
        {
          continue;
        }
        let mut edge = Edge::new(EdgeKind::Passes, parent_id.clone(), target_id.clone());
        edge.prop_name = Some(prop_name.clone());
        edge.source_ident = Some(prop_name.clone());
        edge.stability = Some(Stability::Unknown);
        edge.reason = Some(StabilityReason::Identifier);
        edge.breaks_memoization = Some(false);
        edge.data_shape = Some(DataShape::Unknown);
        edge.location = Some(spread.location.clone());
        self.graph.push_edge(edge);
        self.record_passed(parent_id, target_id, &prop_name);
      }
    } else {
      // Cannot expand without type information: one sentinel edge, never a guess
      let mut edge = Edge::new(EdgeKind::Passes, parent_id.clone(), target_id.clone());
      edge.prop_name = Some(SPREAD_SENTINEL.to_string());
      edge.source_ident = spread_name;
      edge.stability = Some(Stability::Unknown);
      edge.reason = Some(StabilityReason::Unknown);
      edge.breaks_memoization = Some(false);
      edge.data_shape = Some(DataShape::Unknown);
      edge.location = Some(spread.location.clone());
      self.graph.push_edge(edge);
      self.record_passed(parent_id, target_id, SPREAD_SENTINEL);
    }
  }

  fn record_passed(&mut self, parent_id: &NodeId, target_id: &NodeId, prop_name: &str) {
    if let Some(parent) = self.graph.component_mut(parent_id) {
      parent
        .props_passed
        .entry(target_id.clone())
        .or_default()
        .push(prop_name.to_string());
    }
  }

  /// Stability classification of one attribute value
  fn classify(&self, env: &LocalEnv, value: &AttrValue) -> Classified {
    match value {
      AttrValue::Empty | AttrValue::StringLiteral(_) | AttrValue::PrimitiveLiteral(_) => {
        Classified {
          stability: Stability::Stable,
          reason: StabilityReason::Primitive,
          shape: DataShape::Primitive,
          source_ident: None,
          source_var: None,
        }
      }
      AttrValue::Identifier(name) => {
        let (stability, reason, shape) = env.stability_of(name);
        Classified {
          stability,
          reason,
          shape,
          source_ident: Some(name.clone()),
          source_var: None,
        }
      }
      AttrValue::Member { root, .. } => Classified {
        // Stable at the outer prop level; true stability is a property of
        // the root variable
        stability: Stability::Stable,
        reason: StabilityReason::MemberExpression,
        shape: DataShape::Unknown,
        source_ident: None,
        source_var: Some(root.clone()),
      },
      AttrValue::InlineObject => Classified {
        stability: Stability::Unstable,
        reason: StabilityReason::InlineObject,
        shape: DataShape::Object,
        source_ident: None,
        source_var: None,
      },
      AttrValue::InlineArray => Classified {
        stability: Stability::Unstable,
        reason: StabilityReason::InlineArray,
        shape: DataShape::Array,
        source_ident: None,
        source_var: None,
      },
      AttrValue::InlineFunction => Classified {
        stability: Stability::Unstable,
        reason: StabilityReason::InlineFunction,
        shape: DataShape::Function,
        source_ident: None,
        source_var: None,
      },
      AttrValue::Call { callee } => {
        // A direct memo-hook call keeps identity; any other call is a fresh
        // value every render
        match crate::source::react::hook_kind(callee) {
          Some(HookKind::Memo) => Classified {
            stability: Stability::Stable,
            reason: StabilityReason::UseMemo,
            shape: DataShape::Unknown,
            source_ident: None,
            source_var: None,
          },
          Some(HookKind::Callback) => Classified {
            stability: Stability::Stable,
            reason: StabilityReason::UseCallback,
            shape: DataShape::Function,
            source_ident: None,
            source_var: None,
          },
          _ => Classified {
            stability: Stability::Unstable,
            reason: StabilityReason::Call,
            shape: DataShape::Unknown,
            source_ident: None,
            source_var: None,
          },
        }
      }
      AttrValue::JsxNode => Classified {
        // A JSX value is a freshly allocated element object
        stability: Stability::Unstable,
        reason: StabilityReason::InlineObject,
        shape: DataShape::Object,
        source_ident: None,
        source_var: None,
      },
      AttrValue::Other(_) => Classified {
        stability: Stability::Unknown,
        reason: StabilityReason::Unknown,
        shape: DataShape::Unknown,
        source_ident: None,
        source_var: None,
      },
    }
  }

  fn define(&mut self, cid: &NodeId, sid: NodeId) {
    self
      .graph
      .push_edge(Edge::new(EdgeKind::Defines, cid.clone(), sid.clone()));
    if let Some(node) = self.graph.component_mut(cid) {
      node.states.push(sid);
    }
  }

  /// Synthetic derived state node keyed by expression text
  fn synthetic_state(
    &mut self,
    analysis: &FileAnalysis,
    component: &ComponentInfo,
    text: &str,
    shape: DataShape,
  ) -> NodeId {
    let sid = state_id(&analysis.file_path, &component.name, text);
    self.graph.add_state(StateNode {
      id: sid.clone(),
      kind: StateKind::Derived,
      name: text.to_string(),
      component: component.name.clone(),
      file_path: analysis.file_path.clone(),
      data_shape: shape,
      initial_value: None,
      mutable: false,
      dependencies: Vec::new(),
      update_sites: Vec::new(),
      synthetic: true,
    });
    sid
  }

  /// State id for a local name: prop, hook value, or derived binding
  fn local_state_id(
    &self,
    analysis: &FileAnalysis,
    component: &ComponentInfo,
    name: &str,
  ) -> Option<NodeId> {
    let local = name.split('.').next().unwrap_or(name);
    let declared = component.props.iter().any(|p| p.name == local)
      || component.hooks.iter().any(|hook| {
        hook.value_name.as_deref() == Some(local) || hook.bound_name.as_deref() == Some(local)
      });
    if declared {
      Some(state_id(&analysis.file_path, &component.name, local))
    } else {
      None
    }
  }

  /// Context node for a consumed/provided identifier: local `createContext`
  /// first, then through the import table; nominal node at the consumption
  /// site when nothing resolves
  fn resolve_context_node(
    &mut self,
    analysis: &FileAnalysis,
    component: &ComponentInfo,
    ident: &str,
  ) -> NodeId {
    if let Some(sid) = self.known_context_node(analysis, ident) {
      return sid;
    }

    // Nominal context node at the consumption site
    let sid = state_id(&analysis.file_path, &component.name, ident);
    self.graph.add_state(StateNode {
      id: sid.clone(),
      kind: StateKind::Context,
      name: ident.to_string(),
      component: component.name.clone(),
      file_path: analysis.file_path.clone(),
      data_shape: DataShape::Unknown,
      initial_value: None,
      mutable: false,
      dependencies: Vec::new(),
      update_sites: Vec::new(),
      synthetic: false,
    });
    sid
  }

  /// Context node id when the identifier resolves to a `createContext` home
  fn known_context_node(&mut self, analysis: &FileAnalysis, ident: &str) -> Option<NodeId> {
    if analysis.contexts.iter().any(|c| c.name == ident) {
      return Some(state_id(&analysis.file_path, "", ident));
    }

    let import = analysis
      .imports
      .iter()
      .find(|imp| imp.local_name == ident && !imp.is_type_only)?;
    let target = self
      .resolver
      .resolve_import(&analysis.file_path, &import.from_module)?;
    if self.symbols.has_context(&target, &import.imported_name) {
      let sid = state_id(&target, "", &import.imported_name);
      // The home file's node may not exist yet when files resolve forward
      self.graph.add_state(StateNode {
        id: sid.clone(),
        kind: StateKind::Context,
        name: import.imported_name.clone(),
        component: String::new(),
        file_path: target,
        data_shape: DataShape::Unknown,
        initial_value: None,
        mutable: false,
        dependencies: Vec::new(),
        update_sites: Vec::new(),
        synthetic: false,
      });
      return Some(sid);
    }
    None
  }

  /// Same-file component binding, following one memo-wrapper hop
  fn resolve_local_component(&self, analysis: &FileAnalysis, name: &str) -> Option<NodeId> {
    if analysis.components.iter().any(|c| c.name == name) {
      return Some(component_id(&analysis.file_path, name));
    }
    let import = analysis
      .imports
      .iter()
      .find(|imp| imp.local_name == name && !imp.is_type_only)?;
    let target = self
      .resolver
      .resolve_import(&analysis.file_path, &import.from_module)?;
    let (file, component_name) =
      self
        .symbols
        .resolve_component(self.resolver, &target, &import.imported_name)?;
    Some(component_id(&file, &component_name))
  }

  /// Resolve a JSX element to a component id: same-file first, then the
  /// importer's table through the module resolver
  fn resolve_jsx_target(&self, analysis: &FileAnalysis, usage: &JsxUsage) -> Option<NodeId> {
    let element_name = &usage.element_name;

    if let Some((root, member)) = element_name.split_once('.') {
      if member == "Provider" || member == "Consumer" {
        return None;
      }
      // Namespace import: <UI.Button /> through `import * as UI from ...`
      let import = analysis
        .imports
        .iter()
        .find(|imp| imp.local_name == root && imp.imported_name == "*")?;
      let target = self
        .resolver
        .resolve_import(&analysis.file_path, &import.from_module)?;
      let (file, name) = self.symbols.resolve_component(self.resolver, &target, member)?;
      return Some(component_id(&file, &name));
    }

    if !utils::is_pascal_case(element_name) {
      return None;
    }

    if analysis.components.iter().any(|c| c.name == *element_name) {
      return Some(component_id(&analysis.file_path, element_name));
    }

    let import = analysis
      .imports
      .iter()
      .find(|imp| imp.local_name == *element_name && !imp.is_type_only)?;
    let target = self
      .resolver
      .resolve_import(&analysis.file_path, &import.from_module)
      .or_else(|| {
        debug!(
          "Unresolved element '{}' via '{}' in {:?}",
          element_name, import.from_module, analysis.file_path
        );
        None
      })?;
    let (file, name) =
      self
        .symbols
        .resolve_component(self.resolver, &target, &import.imported_name)?;
    Some(component_id(&file, &name))
  }
}

struct Classified {
  stability: Stability,
  reason: StabilityReason,
  shape: DataShape,
  source_ident: Option<String>,
  source_var: Option<String>,
}

/// Per-component stability environment for identifier-valued attributes
struct LocalEnv {
  entries: FxHashMap<String, (Stability, StabilityReason, DataShape, Option<NodeId>)>,
}

impl LocalEnv {
  fn build(builder: &GraphBuilder, analysis: &FileAnalysis, component: &ComponentInfo) -> Self {
    let file = &analysis.file_path;
    let mut entries: FxHashMap<String, (Stability, StabilityReason, DataShape, Option<NodeId>)> =
      FxHashMap::default();

    // Imported symbols: constants, components and contexts keep identity
    for import in &analysis.imports {
      if import.is_type_only {
        continue;
      }
      let stability = builder
        .resolver
        .resolve_import(file, &import.from_module)
        .map(|target| {
          builder.symbols.is_constant(&target, &import.imported_name)
            || builder.symbols.has_context(&target, &import.imported_name)
            || builder
              .symbols
              .component(&target, &import.imported_name)
              .is_some()
            || import.imported_name == "default"
        })
        .unwrap_or(false);
      entries.insert(
        import.local_name.clone(),
        (
          if stability {
            Stability::Stable
          } else {
            Stability::Unknown
          },
          StabilityReason::Identifier,
          DataShape::Unknown,
          None,
        ),
      );
    }

    // Module-scope constants are created once
    for constant in &analysis.module_constants {
      entries.insert(
        constant.clone(),
        (
          Stability::Stable,
          StabilityReason::Identifier,
          DataShape::Unknown,
          None,
        ),
      );
    }

    // Declared props: whatever the parent passed; assumed stable
    for prop in &component.props {
      entries.insert(
        prop.name.clone(),
        (
          Stability::Unknown,
          StabilityReason::Identifier,
          shape_from_type(prop.type_text.as_deref()),
          Some(state_id(file, &component.name, &prop.name)),
        ),
      );
    }

    for hook in &component.hooks {
      if let Some(value_name) = &hook.value_name {
        // useState's value slot keeps identity between updates
        entries.insert(
          value_name.clone(),
          (
            Stability::Stable,
            StabilityReason::Identifier,
            hook.data_shape,
            Some(state_id(file, &component.name, value_name)),
          ),
        );
      }
      if let Some(setter_name) = &hook.setter_name {
        // Setters are guaranteed referentially stable by React
        entries.insert(
          setter_name.clone(),
          (
            Stability::Stable,
            StabilityReason::Identifier,
            DataShape::Function,
            None,
          ),
        );
      }
      if let Some(bound_name) = &hook.bound_name {
        let (stability, reason, shape) = match hook.kind {
          HookKind::Memo => (Stability::Stable, StabilityReason::UseMemo, hook.data_shape),
          HookKind::Callback => (
            Stability::Stable,
            StabilityReason::UseCallback,
            DataShape::Function,
          ),
          HookKind::Ref => (
            Stability::Stable,
            StabilityReason::Identifier,
            DataShape::Object,
          ),
          _ => (
            Stability::Unknown,
            StabilityReason::Identifier,
            DataShape::Unknown,
          ),
        };
        entries.insert(
          bound_name.clone(),
          (
            stability,
            reason,
            shape,
            Some(state_id(file, &component.name, bound_name)),
          ),
        );
      }
    }

    // Sibling components in the file are stable bindings
    for sibling in &analysis.components {
      entries.insert(
        sibling.name.clone(),
        (
          Stability::Stable,
          StabilityReason::Identifier,
          DataShape::Function,
          None,
        ),
      );
    }

    Self { entries }
  }

  /// Unknown names are assumed stable identifiers
  fn stability_of(&self, name: &str) -> (Stability, StabilityReason, DataShape) {
    match self.entries.get(name) {
      Some((stability, reason, shape, _)) => (*stability, *reason, *shape),
      None => (
        Stability::Unknown,
        StabilityReason::Identifier,
        DataShape::Unknown,
      ),
    }
  }

  fn state_of(&self, name: &str) -> Option<NodeId> {
    self.entries.get(name).and_then(|(_, _, _, sid)| sid.clone())
  }
}

fn shape_from_type(type_text: Option<&str>) -> DataShape {
  let Some(text) = type_text else {
    return DataShape::Unknown;
  };
  let text = text.trim();
  match text {
    "string" | "number" | "boolean" | "bigint" => DataShape::Primitive,
    _ if text.ends_with("[]") || text.starts_with("Array<") => DataShape::Array,
    _ if text.contains("=>") => DataShape::Function,
    _ if text.starts_with('{') => DataShape::Object,
    _ => DataShape::Unknown,
  }
}
