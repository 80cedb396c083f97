/*
 * @Author       : 老董
 * @Description  : 节点句柄：在具体节点类型（raw_node）之外统一保存
 *                 节点的id、名称、值、梯度以及detach状态
 */

use super::raw_node::{NodeType, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use std::fmt;

/// 节点在图中的唯一标识。图按创建顺序递增分配，故父节点的id总小于子节点的id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

pub(in crate::nn) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    is_detached: bool,
    /// 运算节点的值是在哪一代输入/参数取值下算出的
    value_generation: u64,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(raw_node: T) -> Self {
        Self {
            id: NodeId(0),
            name: String::new(),
            raw_node: raw_node.into(),
            value: None,
            grad: None,
            is_detached: false,
            value_generation: 0,
        }
    }

    pub(in crate::nn) fn bind_id_and_name(&mut self, id: NodeId, name: &str) {
        self.id = id;
        self.name = name.to_string();
    }

    pub(in crate::nn) const fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn name(&self) -> &str {
        &self.name
    }

    pub(in crate::nn) const fn raw_node(&self) -> &NodeType {
        &self.raw_node
    }

    pub(in crate::nn) fn type_name(&self) -> &'static str {
        self.raw_node.type_name()
    }

    pub(in crate::nn) fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    /// 输入/参数节点没有父节点，其值只能手动设置
    pub(in crate::nn) fn is_leaf(&self) -> bool {
        matches!(
            self.raw_node,
            NodeType::Input(_) | NodeType::Parameter(_)
        )
    }

    pub(in crate::nn) fn is_input(&self) -> bool {
        matches!(self.raw_node, NodeType::Input(_))
    }

    pub(in crate::nn) fn is_parameter(&self) -> bool {
        matches!(self.raw_node, NodeType::Parameter(_))
    }

    // ========== 值 ==========

    pub(in crate::nn) const fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    pub(in crate::nn) const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub(in crate::nn) const fn value_generation(&self) -> u64 {
        self.value_generation
    }

    /// 手动设置输入/参数节点的值
    pub(in crate::nn) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if !self.is_leaf() {
            return Err(GraphError::InvalidOperation(format!(
                "{self}的值只能通过父节点前向传播计算，不能手动设置"
            )));
        }
        if let Some(value) = value {
            if value.shape() != self.value_expected_shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.value_expected_shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("{self}被设置的值形状与节点形状不一致"),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    pub(in crate::nn) fn set_computed_value(&mut self, value: Tensor, generation: u64) {
        self.value = Some(value);
        self.value_generation = generation;
    }

    // ========== 梯度 ==========

    pub(in crate::nn) const fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    pub(in crate::nn) fn set_grad(&mut self, grad: Option<&Tensor>) {
        self.grad = grad.cloned();
    }

    /// 梯度累加（同一节点可能从多个子节点收到梯度）
    pub(in crate::nn) fn accumulate_grad(&mut self, grad: &Tensor) {
        match &mut self.grad {
            Some(existing) => *existing += grad,
            None => self.grad = Some(grad.clone()),
        }
    }

    pub(in crate::nn) fn clear_grad(&mut self) {
        self.grad = None;
    }

    // ========== detach ==========

    pub(in crate::nn) const fn is_detached(&self) -> bool {
        self.is_detached
    }

    pub(in crate::nn) const fn set_detached(&mut self, detached: bool) {
        self.is_detached = detached;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.0,
            self.name,
            self.type_name()
        )
    }
}
