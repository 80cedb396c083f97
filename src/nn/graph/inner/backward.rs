/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::TraitNode;
use crate::tensor::Tensor;

impl GraphInner {
    // ========== VJP 反向传播核心 ==========

    /// 反向传播，返回损失的标量值。
    ///
    /// 要求损失节点已完成前向传播。参数节点的梯度在多次 backward 之间累加，
    /// 其余节点的梯度每次重新计算。前向传播得到的节点值在反向传播后保留
    pub fn backward(&mut self, loss_id: NodeId) -> Result<f32, GraphError> {
        let loss_node = self.get_node(loss_id)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行 forward"))
        })?;

        if loss_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求损失为标量 [1, 1]，但得到 {:?}",
                loss_value.shape()
            )));
        }
        let loss_scalar = loss_value.get_data_number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "无法从损失节点获取标量值，形状: {:?}",
                loss_value.shape()
            ))
        })?;
        let loss_grad = Tensor::ones(loss_value.shape());

        self.reset_intermediate_grad();
        self.get_node_mut(loss_id)?.set_grad(Some(&loss_grad));

        // 子节点的id总大于父节点，降序处理即保证处理某节点时其所有子节点已回传完毕
        let mut order = self.ancestors_ascending(loss_id)?;
        order.reverse();
        for node_id in order {
            self.propagate_grad_to_parents(node_id)?;
        }

        self.last_backward_pass_id += 1;
        Ok(loss_scalar)
    }

    /// 将梯度从当前节点传播到其父节点
    fn propagate_grad_to_parents(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_grads: Vec<(NodeId, Tensor)> = {
            let node = self.get_node(node_id)?;
            if node.is_leaf() || node.is_detached() {
                return Ok(());
            }
            let Some(upstream_grad) = node.grad() else {
                return Ok(());
            };
            let value = node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("{node}没有值，无法计算梯度"))
            })?;

            let parent_ids = self.get_node_parents(node_id)?;
            let parent_values = self.parent_values(node)?;

            let mut grads = Vec::with_capacity(parent_ids.len());
            for (index, parent_id) in parent_ids.iter().enumerate() {
                let parent = self.get_node(*parent_id)?;
                // 输入节点和被 detach 的节点不接收梯度
                if parent.is_input() || parent.is_detached() {
                    continue;
                }
                let parent_grad = node.raw_node().calc_grad_to_parent(
                    index,
                    &parent_values,
                    value,
                    upstream_grad,
                )?;
                grads.push((*parent_id, parent_grad));
            }
            grads
        };

        for (parent_id, parent_grad) in parent_grads {
            self.get_node_mut(parent_id)?.accumulate_grad(&parent_grad);
        }
        Ok(())
    }

    /// 清除所有节点的梯度
    pub fn clear_grad(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_grad();
        }
    }

    /// 清除单个节点的梯度
    pub fn clear_node_grad(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.clear_grad();
        Ok(())
    }

    /// 清零梯度（PyTorch 风格）
    pub fn zero_grad(&mut self) {
        self.clear_grad();
    }
}
