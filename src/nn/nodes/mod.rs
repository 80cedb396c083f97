mod node_handle;
pub(in crate::nn) mod raw_node;

pub use node_handle::NodeId;
pub(in crate::nn) use node_handle::NodeHandle;
pub(in crate::nn) use raw_node::{NodeType, TraitNode};
