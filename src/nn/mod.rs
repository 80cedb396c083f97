/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18 10:12:40
 * @Description  : 负责神经网络（neural network）的构建：静态计算图、节点、
 *                 优化器以及图循环神经网络（GRNN）层
 */

mod criterion;
mod graph;
pub mod layer;
mod module;
mod nodes;
pub mod optimizer;
mod var;
mod var_ops;

pub use criterion::MseLoss;
pub use graph::{Graph, GraphError, GraphInner};
pub use layer::{GraphPropagator, Grnn, GrnnConfig, GrnnOutput};
pub use module::Module;
pub use nodes::NodeId;
pub use nodes::raw_node::Reduction;
pub use optimizer::{Adam, Optimizer, SGD};
pub use var::{Init, Var};
pub use var_ops::{VarActivationOps, VarLossOps, VarMatrixOps, VarShapeOps};

#[cfg(test)]
mod tests;
