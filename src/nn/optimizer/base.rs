/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : 优化器基础trait和辅助结构
 */

use crate::nn::graph::GraphInner;
use crate::nn::{Graph, GraphError, NodeId, Var};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// 优化器 trait（PyTorch 风格）
///
/// # 设计要点
/// - Optimizer 绑定特定参数（通过 Var）
/// - `backward()` 计算所有参数的梯度（由 Var 调用）
/// - `step()` 只更新 Optimizer 绑定的参数
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Adam::new(&graph, &model.parameters(), 0.01);
///
/// optimizer.zero_grad()?;
/// let loss = criterion.forward(&output, &y)?;
/// loss.backward()?;
/// optimizer.step()?;
///
/// // 或者一步完成
/// let loss_val = optimizer.minimize(&loss)?;
/// ```
pub trait Optimizer {
    /// 清零所有参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 更新参数（只更新 Optimizer 绑定的参数）
    fn step(&mut self) -> Result<(), GraphError>;

    /// 一步完成：zero_grad + forward + backward + step，返回 loss 的标量值
    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError> {
        self.zero_grad()?;
        let loss_val = loss.backward()?;
        self.step()?;
        Ok(loss_val)
    }

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如 Adam 的动量）
    fn reset(&mut self);
}

/// 优化器状态管理（内部实现，不对外暴露）
pub(super) struct OptimizerState {
    graph: Rc<RefCell<GraphInner>>,
    /// 要优化的参数节点 ID
    params: Vec<NodeId>,
    learning_rate: f32,
}

impl OptimizerState {
    pub(super) fn new(graph: &Graph, params: &[Var], learning_rate: f32) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.iter().map(Var::node_id).collect(),
            learning_rate,
        }
    }

    pub(super) const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub(super) const fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }

    pub(super) fn zero_grad(&self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            g.clear_node_grad(node_id)?;
        }
        Ok(())
    }

    /// 对每个有梯度的参数执行`update(node_id, 当前值, 梯度) -> 新值`
    pub(super) fn update_each<F>(&self, mut update: F) -> Result<(), GraphError>
    where
        F: FnMut(NodeId, &Tensor, &Tensor) -> Tensor,
    {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            let Some(grad) = g.get_node_grad(node_id)? else {
                continue;
            };
            let current = g.get_node_value(node_id)?.ok_or_else(|| {
                GraphError::ComputationError(format!("参数节点 {node_id:?} 没有值"))
            })?;
            let new_value = update(node_id, current, &grad);
            g.set_node_value(node_id, Some(&new_value))?;
        }
        Ok(())
    }
}
