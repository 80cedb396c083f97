/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-17
 * @Description  : 梯度下降优化器实现
 */

use super::base::{Optimizer, OptimizerState};
use crate::nn::{Graph, GraphError, Var};

/// SGD (随机梯度下降) 优化器：θ = θ - α * ∇θ
pub struct SGD {
    state: OptimizerState,
}

impl SGD {
    /// 创建新的 SGD 优化器
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self {
            state: OptimizerState::new(graph, params, lr),
        }
    }
}

impl Optimizer for SGD {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.state.zero_grad()
    }

    fn step(&mut self) -> Result<(), GraphError> {
        let lr = self.state.learning_rate();
        self.state
            .update_each(|_, current, grad| current - &(grad * lr))
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.state.set_learning_rate(lr);
    }

    fn reset(&mut self) {
        // SGD 无状态
    }
}
