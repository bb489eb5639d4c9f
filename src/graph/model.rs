//! Project graph data model
//!
//! The graph owns every node and edge; components reference each other (and
//! their state) by id only, which keeps parent/child back-references safe and
//! cycle-free at the ownership layer. Secondary indices are derived data and
//! are maintained on every edge insertion.

use crate::source::model::{ComponentKind, DataShape, Location, PropDecl};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub type NodeId = String;

/// `<file>::<component>`
pub fn component_id(file: &Path, name: &str) -> NodeId {
  format!("{}::{}", file.display(), name)
}

/// `<file>::<component>::<local>`; module-scope state (contexts) uses an
/// empty component segment
pub fn state_id(file: &Path, component: &str, local: &str) -> NodeId {
  format!("{}::{}::{}", file.display(), component, local)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateKind {
  UseState,
  UseReducer,
  Context,
  Prop,
  Derived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateNode {
  pub id: NodeId,
  pub kind: StateKind,
  /// Local binding name within its component
  pub name: String,
  /// Owning component name; empty for module-scope context nodes
  pub component: String,
  pub file_path: PathBuf,
  pub data_shape: DataShape,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub initial_value: Option<String>,
  pub mutable: bool,
  /// State ids this value is derived from
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependencies: Vec<NodeId>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub update_sites: Vec<Location>,
  /// True for engine-synthesized nodes (member-expression properties,
  /// inline dependency origins)
  #[serde(default)]
  pub synthetic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
  pub id: NodeId,
  pub name: String,
  pub file_path: PathBuf,
  pub kind: ComponentKind,
  pub memoized: bool,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub props: Vec<PropDecl>,
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub props_used_locally: BTreeSet<String>,
  /// State ids defined here
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub states: Vec<NodeId>,
  /// State ids consumed (context and cross-component reads)
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub consumed: Vec<NodeId>,
  /// First-seen parent; the full relation lives in `renders` edges
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent: Option<NodeId>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<NodeId>,
  /// child id -> prop names passed to it
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub props_passed: BTreeMap<NodeId, Vec<String>>,
  pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
  Defines,
  Consumes,
  Updates,
  Passes,
  Derives,
  Renders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stability {
  Stable,
  Unstable,
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityReason {
  #[serde(rename = "primitive")]
  Primitive,
  #[serde(rename = "identifier")]
  Identifier,
  #[serde(rename = "useMemo")]
  UseMemo,
  #[serde(rename = "useCallback")]
  UseCallback,
  #[serde(rename = "inline-object")]
  InlineObject,
  #[serde(rename = "inline-array")]
  InlineArray,
  #[serde(rename = "inline-function")]
  InlineFunction,
  #[serde(rename = "member-expression")]
  MemberExpression,
  #[serde(rename = "call")]
  Call,
  #[serde(rename = "unknown")]
  Unknown,
}

/// Sentinel prop name for spreads that cannot be expanded
pub const SPREAD_SENTINEL: &str = "*spread*";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
  pub kind: EdgeKind,
  pub source: NodeId,
  pub target: NodeId,
  /// Prop name at the callee side (`Passes` only)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prop_name: Option<String>,
  /// Source-side identifier when it differs from or names the value
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_ident: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stability: Option<Stability>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<StabilityReason>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub breaks_memoization: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data_shape: Option<DataShape>,
  /// Root variable when the value came from a member expression
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prop_source_var: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<Location>,
}

impl Edge {
  pub fn new(kind: EdgeKind, source: NodeId, target: NodeId) -> Self {
    Self {
      kind,
      source,
      target,
      prop_name: None,
      source_ident: None,
      stability: None,
      reason: None,
      breaks_memoization: None,
      data_shape: None,
      prop_source_var: None,
      location: None,
    }
  }

  pub fn at(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }

  pub fn is_unstable(&self) -> bool {
    self.stability == Some(Stability::Unstable)
  }
}

/// The whole-project semantic model
///
/// Mutated only by the graph builder; frozen (shared read-only) once rules
/// run. Node maps are BTreeMaps so serialization is sorted by key.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGraph {
  pub state_nodes: BTreeMap<NodeId, StateNode>,
  pub component_nodes: BTreeMap<NodeId, ComponentNode>,
  pub edges: Vec<Edge>,
  #[serde(skip)]
  by_source: FxHashMap<NodeId, Vec<usize>>,
  #[serde(skip)]
  by_target: FxHashMap<NodeId, Vec<usize>>,
  #[serde(skip)]
  by_kind: FxHashMap<EdgeKind, Vec<usize>>,
}

impl ProjectGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_component(&mut self, node: ComponentNode) {
    self.component_nodes.insert(node.id.clone(), node);
  }

  pub fn add_state(&mut self, node: StateNode) {
    self.state_nodes.entry(node.id.clone()).or_insert(node);
  }

  pub fn component(&self, id: &str) -> Option<&ComponentNode> {
    self.component_nodes.get(id)
  }

  pub fn component_mut(&mut self, id: &str) -> Option<&mut ComponentNode> {
    self.component_nodes.get_mut(id)
  }

  pub fn state(&self, id: &str) -> Option<&StateNode> {
    self.state_nodes.get(id)
  }

  pub fn state_mut(&mut self, id: &str) -> Option<&mut StateNode> {
    self.state_nodes.get_mut(id)
  }

  /// Append an edge, keeping the secondary indices consistent
  pub fn push_edge(&mut self, edge: Edge) {
    let index = self.edges.len();
    self
      .by_source
      .entry(edge.source.clone())
      .or_default()
      .push(index);
    self
      .by_target
      .entry(edge.target.clone())
      .or_default()
      .push(index);
    self.by_kind.entry(edge.kind).or_default().push(index);
    self.edges.push(edge);
  }

  pub fn edges_from<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> {
    self
      .by_source
      .get(id)
      .into_iter()
      .flatten()
      .map(|&index| &self.edges[index])
  }

  pub fn edges_to<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> {
    self
      .by_target
      .get(id)
      .into_iter()
      .flatten()
      .map(|&index| &self.edges[index])
  }

  pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
    self
      .by_kind
      .get(&kind)
      .into_iter()
      .flatten()
      .map(|&index| &self.edges[index])
  }

  /// `Passes` edges leaving a component
  pub fn passes_from<'a>(&'a self, component: &str) -> impl Iterator<Item = &'a Edge> {
    self
      .edges_from(component)
      .filter(|edge| edge.kind == EdgeKind::Passes)
  }

  /// Rebuild indices from the edge sequence (used after deserialization)
  pub fn rebuild_indices(&mut self) {
    self.by_source.clear();
    self.by_target.clear();
    self.by_kind.clear();
    for (index, edge) in self.edges.iter().enumerate() {
      self.by_source.entry(edge.source.clone()).or_default().push(index);
      self.by_target.entry(edge.target.clone()).or_default().push(index);
      self.by_kind.entry(edge.kind).or_default().push(index);
    }
  }

  /// Set-equality check between the indices and the edge sequence
  pub fn indices_consistent(&self) -> bool {
    let indexed_by_source: usize = self.by_source.values().map(Vec::len).sum();
    let indexed_by_target: usize = self.by_target.values().map(Vec::len).sum();
    let indexed_by_kind: usize = self.by_kind.values().map(Vec::len).sum();
    if indexed_by_source != self.edges.len()
      || indexed_by_target != self.edges.len()
      || indexed_by_kind != self.edges.len()
    {
      return false;
    }

    self.by_source.iter().all(|(id, indices)| {
      indices.iter().all(|&index| self.edges[index].source == *id)
    }) && self.by_target.iter().all(|(id, indices)| {
      indices.iter().all(|&index| self.edges[index].target == *id)
    }) && self.by_kind.iter().all(|(kind, indices)| {
      indices.iter().all(|&index| self.edges[index].kind == *kind)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn location() -> Location {
    Location {
      file_path: PathBuf::from("/p/a.tsx"),
      line: 1,
      column: 0,
      component: None,
    }
  }

  fn graph_with_edges() -> ProjectGraph {
    let mut graph = ProjectGraph::new();
    graph.add_component(ComponentNode {
      id: "a::App".to_string(),
      name: "App".to_string(),
      file_path: PathBuf::from("/p/a.tsx"),
      kind: ComponentKind::FunctionDeclaration,
      memoized: false,
      props: Vec::new(),
      props_used_locally: BTreeSet::new(),
      states: Vec::new(),
      consumed: Vec::new(),
      parent: None,
      children: Vec::new(),
      props_passed: BTreeMap::new(),
      location: location(),
    });
    graph.push_edge(Edge::new(
      EdgeKind::Renders,
      "a::App".to_string(),
      "a::Child".to_string(),
    ));
    graph.push_edge(Edge::new(
      EdgeKind::Passes,
      "a::App".to_string(),
      "a::Child".to_string(),
    ));
    graph
  }

  #[test]
  fn test_indices_track_edges() {
    let graph = graph_with_edges();

    assert_eq!(graph.edges_from("a::App").count(), 2);
    assert_eq!(graph.edges_to("a::Child").count(), 2);
    assert_eq!(graph.edges_of_kind(EdgeKind::Passes).count(), 1);
    assert_eq!(graph.passes_from("a::App").count(), 1);
    assert!(graph.indices_consistent());
  }

  #[test]
  fn test_rebuild_indices_after_deserialize() {
    let graph = graph_with_edges();
    let json = serde_json::to_string(&graph).unwrap();

    let mut restored: ProjectGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.edges_from("a::App").count(), 0);
    restored.rebuild_indices();
    assert_eq!(restored.edges_from("a::App").count(), 2);
    assert!(restored.indices_consistent());
  }

  #[test]
  fn test_serialization_round_trip_is_stable() {
    let graph = graph_with_edges();
    let first = serde_json::to_string(&graph).unwrap();
    let restored: ProjectGraph = serde_json::from_str(&first).unwrap();
    let second = serde_json::to_string(&restored).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_id_formats() {
    assert_eq!(component_id(Path::new("/p/a.tsx"), "App"), "/p/a.tsx::App");
    assert_eq!(
      state_id(Path::new("/p/a.tsx"), "App", "count"),
      "/p/a.tsx::App::count"
    );
    assert_eq!(
      state_id(Path::new("/p/a.tsx"), "", "ThemeContext"),
      "/p/a.tsx::::ThemeContext"
    );
  }
}
