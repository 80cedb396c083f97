/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 核心操作 + 前向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::{NodeHandle, TraitNode};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    /// 创建一个带固定种子的计算图（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        let mut graph = Self::new();
        graph.set_seed(seed);
        graph
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            node_names: HashSet::new(),
            name_counters: HashMap::new(),
            values_generation: 0,
            last_forward_pass_id: 0,
            last_backward_pass_id: 0,
            next_id: 0,
            rng: None,
        }
    }

    // ========== 基础访问器 ==========

    pub const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub const fn last_backward_pass_id(&self) -> u64 {
        self.last_backward_pass_id
    }

    /// 设置/重置图的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    /// 检查图是否有固定种子
    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(
        &mut self,
        id: NodeId,
    ) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    pub fn has_node_value(&self, node_id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(node_id)?.has_value())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    /// 设置输入/参数节点的值；所有依赖它的运算节点的值随之过期
    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)?;
        self.values_generation += 1;
        Ok(())
    }

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<Tensor>, GraphError> {
        Ok(self.get_node_grad_ref(id)?.cloned())
    }

    pub fn get_node_grad_ref(&self, node_id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        let node = self.get_node(node_id)?;
        // 输入节点不应该有梯度
        if node.is_input() {
            return Err(GraphError::InvalidOperation(format!(
                "输入{node}不应该有梯度"
            )));
        }
        Ok(node.grad())
    }

    /// 获取所有可训练的参数节点（按创建顺序）
    pub fn get_trainable_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_parameter())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        // 生成唯一的节点ID（先递增再返回，所以第一个节点 ID 是 1）
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(
        &self,
        name: &str,
    ) -> Result<(), GraphError> {
        if self.node_names.contains(name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    pub(in crate::nn::graph) fn generate_valid_new_node_name(
        &mut self,
        base_name: &str,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let counter = self.name_counters.entry(node_type.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let name = format!("{node_type}_{counter}");
            if !self.node_names.contains(&name) {
                return Ok(name);
            }
        }
    }

    // ========== 前向传播 ==========

    /// 按升序返回`node_id`及其所有祖先节点
    pub(in crate::nn::graph) fn ancestors_ascending(
        &self,
        node_id: NodeId,
    ) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(node_id)?;
        let mut visited = HashSet::from([node_id]);
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            if let Some(parents) = self.backward_edges.get(&id) {
                for &parent_id in parents {
                    if visited.insert(parent_id) {
                        stack.push(parent_id);
                    }
                }
            }
        }
        let mut order: Vec<NodeId> = visited.into_iter().collect();
        order.sort_unstable();
        Ok(order)
    }

    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let node = self.get_node(node_id)?;
        if node.is_leaf() {
            if node.has_value() {
                return Ok(());
            }
            return Err(GraphError::InvalidOperation(format!(
                "{node}是输入/参数类型，其值应通过 set_value 设置，而非通过父节点前向传播计算"
            )));
        }

        for id in self.ancestors_ascending(node_id)? {
            self.forward_node_internal(id)?;
        }
        self.last_forward_pass_id += 1;
        Ok(())
    }

    /// 计算单个节点的值（其父节点的值须已是最新）。
    /// 值仍是当前代次算出的运算节点直接跳过
    fn forward_node_internal(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let generation = self.values_generation;
        let value = {
            let node = self.get_node(node_id)?;
            if node.is_leaf() {
                if node.has_value() {
                    return Ok(());
                }
                return Err(GraphError::InvalidOperation(format!(
                    "{node}没有值，请先通过 set_value 设置"
                )));
            }
            if node.has_value() && node.value_generation() == generation {
                return Ok(());
            }

            let parent_values = self.parent_values(node)?;
            node.raw_node().calc_value_by_parents(&parent_values)?
        };

        self.get_node_mut(node_id)?
            .set_computed_value(value, generation);
        Ok(())
    }

    /// 按父节点顺序取出`node`所有父节点的值
    pub(in crate::nn::graph) fn parent_values(
        &self,
        node: &NodeHandle,
    ) -> Result<Vec<&Tensor>, GraphError> {
        let parent_ids = self.backward_edges.get(&node.id()).map_or(&[][..], Vec::as_slice);
        parent_ids
            .iter()
            .map(|&id| {
                let parent = self.get_node(id)?;
                parent.value().ok_or_else(|| {
                    GraphError::ComputationError(format!(
                        "{node}的父节点{parent}没有值。不该触及本错误，否则说明crate代码有问题"
                    ))
                })
            })
            .collect()
    }

    /// 重置中间节点的 grad（参数节点的梯度保留，由优化器的 zero_grad 清零）
    pub(in crate::nn::graph) fn reset_intermediate_grad(&mut self) {
        for node in self.nodes.values_mut() {
            if !node.is_parameter() {
                node.clear_grad();
            }
        }
    }
}
