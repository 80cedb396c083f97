/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:30:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-17
 * @Description  : Adam优化器实现
 */

use super::base::{Optimizer, OptimizerState};
use crate::nn::{Graph, GraphError, NodeId, Var};
use crate::tensor::Tensor;
use std::collections::HashMap;

/// Adam 优化器（Adaptive Moment Estimation）
///
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - θ = θ - α * m_hat / (√v_hat + ε)
pub struct Adam {
    state: OptimizerState,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计
    m: HashMap<NodeId, Tensor>,
    /// 二阶矩估计
    v: HashMap<NodeId, Tensor>,
    /// 时间步
    t: i32,
}

impl Adam {
    /// 使用默认参数（β1=0.9, β2=0.999, ε=1e-8）创建 Adam 优化器
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self::with_config(graph, params, lr, 0.9, 0.999, 1e-8)
    }

    /// 创建带完整配置的 Adam 优化器
    pub fn with_config(
        graph: &Graph,
        params: &[Var],
        lr: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    ) -> Self {
        Self {
            state: OptimizerState::new(graph, params, lr),
            beta1,
            beta2,
            epsilon,
            m: HashMap::new(),
            v: HashMap::new(),
            t: 0,
        }
    }
}

impl Optimizer for Adam {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.state.zero_grad()
    }

    fn step(&mut self) -> Result<(), GraphError> {
        self.t += 1;
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let lr = self.state.learning_rate();
        let bias_correction1 = 1.0 - beta1.powi(self.t);
        let bias_correction2 = 1.0 - beta2.powi(self.t);
        let (m_map, v_map) = (&mut self.m, &mut self.v);

        self.state.update_each(|node_id, current, gradient| {
            // 原地更新一阶矩估计: m = β1 * m + (1 - β1) * g
            let m = m_map
                .entry(node_id)
                .or_insert_with(|| Tensor::zeros(gradient.shape()));
            *m *= beta1;
            *m += &(gradient * (1.0 - beta1));

            // 原地更新二阶矩估计: v = β2 * v + (1 - β2) * g²
            let v = v_map
                .entry(node_id)
                .or_insert_with(|| Tensor::zeros(gradient.shape()));
            *v *= beta2;
            *v += &(&(gradient * gradient) * (1.0 - beta2));

            // 偏差修正后更新参数
            let m_hat = &*m / bias_correction1;
            let v_hat = &*v / bias_correction2;
            let update = &m_hat / &(&v_hat.sqrt() + epsilon);
            current - &(&update * lr)
        })
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.state.set_learning_rate(lr);
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }
}
