pub mod builder;
pub mod model;

pub use builder::GraphBuilder;
pub use model::{
  component_id, state_id, ComponentNode, Edge, EdgeKind, NodeId, ProjectGraph, Stability,
  StabilityReason, StateKind, StateNode,
};
