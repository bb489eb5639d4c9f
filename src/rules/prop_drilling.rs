//! `deep-prop-drilling`: a state value threaded through components that never
//! read it. The walk starts at the component defining the state, follows
//! `passes` edges (renames carry through the callee-side prop name; member
//! expressions through `prop_source_var` and the synthetic derived nodes),
//! and stops at leaf consumers - components that use the prop locally and do
//! not forward it further.
//!
//! A violation fires when the shortest origin-to-leaf path carries at least
//! `max(1, maxDepth - 2)` passthrough components; a fully-forwarded chain of
//! `maxDepth` components is the smallest offender. One diagnostic per
//! (origin state, leaf consumer), anchored at the origin JSX attribute;
//! equal-length paths tie-break on the lexicographically smallest
//! component-id sequence.

use crate::diagnostics::{Diagnostic, Severity};
use crate::graph::{Edge, EdgeKind, NodeId, ProjectGraph, StateKind, StateNode};
use crate::rules::{GraphRule, Rule};
use crate::source::model::Location;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

pub const RULE_ID: &str = "deep-prop-drilling";

pub struct DeepPropDrilling {
  /// Chain-length budget; a chain of max_depth components fires
  pub max_depth: usize,
}

impl Rule for DeepPropDrilling {
  fn id(&self) -> &'static str {
    RULE_ID
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }
}

impl GraphRule for DeepPropDrilling {
  fn check(&self, graph: &ProjectGraph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for state in graph.state_nodes.values() {
      if !is_drilling_origin(graph, state) {
        continue;
      }
      self.check_state(graph, state, &mut diagnostics);
    }

    diagnostics
  }
}

/// A step of the BFS: a component holding the value under a prop name
#[derive(Clone)]
struct Walk {
  component: NodeId,
  prop: String,
  path: Vec<NodeId>,
  /// Incoming prop name at each interior path component, for the
  /// passthrough count
  interior_props: Vec<String>,
  origin_site: Location,
}

struct LeafHit {
  path: Vec<NodeId>,
  interior_props: Vec<String>,
  passthroughs: usize,
  origin_site: Location,
}

impl DeepPropDrilling {
  fn check_state(&self, graph: &ProjectGraph, state: &StateNode, diagnostics: &mut Vec<Diagnostic>) {
    let origin_id = crate::graph::component_id(&state.file_path, &state.component);
    let Some(_origin) = graph.component(&origin_id) else {
      return;
    };

    // Local names that carry this state in the origin component: the binding
    // itself plus derived values tracing back to it
    let names = names_for_state(graph, state);

    let mut queue: VecDeque<Walk> = VecDeque::new();
    let mut visited: FxHashSet<(NodeId, String)> = FxHashSet::default();
    // (origin state, leaf) -> best hit
    let mut leaves: FxHashMap<NodeId, LeafHit> = FxHashMap::default();

    for edge in graph.passes_from(&origin_id) {
      if !edge_carries(edge, &names) {
        continue;
      }
      let (Some(prop), Some(site)) = (&edge.prop_name, &edge.location) else {
        continue;
      };
      queue.push_back(Walk {
        component: edge.target.clone(),
        prop: prop.clone(),
        path: vec![origin_id.clone(), edge.target.clone()],
        interior_props: Vec::new(),
        origin_site: site.clone(),
      });
    }

    while let Some(walk) = queue.pop_front() {
      if !visited.insert((walk.component.clone(), walk.prop.clone())) {
        continue;
      }
      let Some(component) = graph.component(&walk.component) else {
        continue;
      };

      let uses_locally = component.props_used_locally.contains(&walk.prop);
      let forwards: Vec<&Edge> = graph
        .passes_from(&walk.component)
        .filter(|edge| {
          edge.source_ident.as_deref() == Some(walk.prop.as_str())
            || edge.prop_source_var.as_deref() == Some(walk.prop.as_str())
        })
        .collect();

      if uses_locally && forwards.is_empty() {
        // Leaf consumer: passthroughs are interior components that never
        // read their incoming prop
        let passthroughs = walk
          .path
          .iter()
          .skip(1)
          .take(walk.path.len().saturating_sub(2))
          .zip(walk.interior_props.iter())
          .filter(|(id, prop)| {
            graph
              .component(id.as_str())
              .is_some_and(|node| !node.props_used_locally.contains(prop.as_str()))
          })
          .count();

        let hit = LeafHit {
          path: walk.path.clone(),
          interior_props: walk.interior_props.clone(),
          passthroughs,
          origin_site: walk.origin_site.clone(),
        };
        match leaves.get(&walk.component) {
          Some(existing) if (existing.path.len(), &existing.path) <= (hit.path.len(), &hit.path) => {
          }
          _ => {
            leaves.insert(walk.component.clone(), hit);
          }
        }
        continue;
      }

      for edge in forwards {
        let (Some(next_prop), target) = (&edge.prop_name, &edge.target) else {
          continue;
        };
        if walk.path.contains(target) {
          continue;
        }
        let mut path = walk.path.clone();
        path.push(target.clone());
        let mut interior_props = walk.interior_props.clone();
        interior_props.push(walk.prop.clone());
        queue.push_back(Walk {
          component: target.clone(),
          prop: next_prop.clone(),
          path,
          interior_props,
          origin_site: walk.origin_site.clone(),
        });
      }
    }

    let mut hits: Vec<(&NodeId, &LeafHit)> = leaves.iter().collect();
    hits.sort_by(|a, b| a.0.cmp(b.0));

    let threshold = self.max_depth.saturating_sub(2).max(1);
    for (_leaf, hit) in hits {
      if hit.passthroughs < threshold {
        continue;
      }

      let chain = hit
        .path
        .iter()
        .map(|id| {
          graph
            .component(id)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| id.clone())
        })
        .collect::<Vec<_>>()
        .join(" -> ");

      let mut diagnostic = Diagnostic::new(
        RULE_ID,
        self.severity(),
        format!(
          "'{}' is drilled through {} component{} that never read it ({})",
          state.name,
          hit.passthroughs,
          if hit.passthroughs == 1 { "" } else { "s" },
          chain
        ),
        &hit.origin_site,
      );
      let interiors = hit
        .path
        .iter()
        .skip(1)
        .take(hit.path.len().saturating_sub(2))
        .zip(hit.interior_props.iter());
      for (id, prop) in interiors {
        if let Some(node) = graph.component(id) {
          if !node.props_used_locally.contains(prop.as_str()) {
            diagnostic =
              diagnostic.related(&node.location, format!("passed through '{}'", node.name));
          }
        }
      }
      diagnostics.push(diagnostic);
    }
  }
}

/// Drilling origins: real mutable state, plus context bindings (derived
/// nodes that trace directly to a context)
fn is_drilling_origin(graph: &ProjectGraph, state: &StateNode) -> bool {
  match state.kind {
    StateKind::UseState | StateKind::UseReducer => true,
    StateKind::Derived => {
      !state.synthetic
        && state.dependencies.iter().any(|dep| {
          graph
            .state(dep)
            .is_some_and(|node| node.kind == StateKind::Context)
        })
    }
    _ => false,
  }
}

/// The origin-side names that denote this state: its own binding plus
/// derived bindings and synthetic member projections tracing back to it
fn names_for_state(graph: &ProjectGraph, state: &StateNode) -> FxHashSet<String> {
  let mut names = FxHashSet::default();
  names.insert(state.name.clone());

  // Derived nodes in the same component whose dependency closure reaches the state
  for candidate in graph.state_nodes.values() {
    if candidate.component != state.component || candidate.file_path != state.file_path {
      continue;
    }
    if candidate.id == state.id {
      continue;
    }
    if derives_from(graph, &candidate.id, &state.id, &mut FxHashSet::default()) {
      names.insert(candidate.name.clone());
    }
  }

  names
}

fn derives_from(
  graph: &ProjectGraph,
  from: &str,
  to: &str,
  visited: &mut FxHashSet<NodeId>,
) -> bool {
  if !visited.insert(from.to_string()) {
    return false;
  }
  let Some(node) = graph.state(from) else {
    return false;
  };
  node.dependencies.iter().any(|dep| {
    dep == to || derives_from(graph, dep, to, visited)
  })
}

/// Does a `passes` edge carry one of the origin-side names?
fn edge_carries(edge: &Edge, names: &FxHashSet<String>) -> bool {
  if edge.kind != EdgeKind::Passes {
    return false;
  }
  if let Some(ident) = &edge.source_ident {
    if names.contains(ident) {
      return true;
    }
  }
  if let Some(var) = &edge.prop_source_var {
    if names.contains(var) {
      return true;
    }
  }
  false
}
