/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{
    Add, Concat, Input, MSELoss, MatMul, Multiply, Parameter, Reduction, ScalarMultiply, Sigmoid,
    Subtract, Tanh,
};
use crate::nn::var::Init;

impl GraphInner {
    /// 添加节点到列表
    fn add_node_to_list(
        &mut self,
        mut node_handle: NodeHandle,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type)?;
        let node_id = self.generate_valid_node_id();

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }
        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        node_handle.bind_id_and_name(node_id, &node_name);
        self.node_names.insert(node_name);
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    /// 取出各父节点的形状（同时检查父节点是否存在）
    fn parent_shapes(&self, parents: &[NodeId]) -> Result<Vec<Vec<usize>>, GraphError> {
        parents
            .iter()
            .map(|&id| Ok(self.get_node(id)?.value_expected_shape().to_vec()))
            .collect()
    }

    /// 创建运算节点：先按父节点形状构造具体节点（其中完成形状检查），再挂到图上
    fn new_op_node<T, F>(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
        node_type: &str,
        build: F,
    ) -> Result<NodeId, GraphError>
    where
        T: Into<crate::nn::nodes::NodeType>,
        F: FnOnce(&[&[usize]]) -> Result<T, GraphError>,
    {
        let shapes = self.parent_shapes(parents)?;
        let shape_refs: Vec<&[usize]> = shapes.iter().map(Vec::as_slice).collect();
        let node = NodeHandle::new(build(&shape_refs)?);
        self.add_node_to_list(node, name, node_type, parents)
    }

    // ========== 叶子节点 ==========

    /// 创建基本输入节点（值需之后通过 set_node_value 设置）
    pub fn new_basic_input_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(Input::new(shape)?);
        self.add_node_to_list(node, name, "input", &[])
    }

    /// 创建参数节点，默认以N(0, 0.001)初始化（图有种子时可复现）
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(Parameter::new(shape)?);
        let node_id = self.add_node_to_list(node, name, "parameter", &[])?;
        let init = Init::Normal {
            mean: 0.0,
            std: 0.001,
        };
        let value = match self.rng.as_mut() {
            Some(rng) => init.generate_with_rng(shape, rng),
            None => init.generate(shape),
        };
        self.set_node_value(node_id, Some(&value))?;
        Ok(node_id)
    }

    // ========== 运算节点 ==========

    pub fn new_add_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(parents, name, "add", Add::new)
    }

    pub fn new_subtract_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[left, right], name, "subtract", Subtract::new)
    }

    pub fn new_multiply_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[left, right], name, "multiply", Multiply::new)
    }

    pub fn new_mat_mul_node(
        &mut self,
        left: NodeId,
        right: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[left, right], name, "mat_mul", MatMul::new)
    }

    pub fn new_scalar_multiply_node(
        &mut self,
        parent: NodeId,
        scalar: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[parent], name, "scalar_multiply", |shapes| {
            ScalarMultiply::new(shapes, scalar)
        })
    }

    pub fn new_sigmoid_node(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[parent], name, "sigmoid", Sigmoid::new)
    }

    pub fn new_tanh_node(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[parent], name, "tanh", Tanh::new)
    }

    pub fn new_concat_node(
        &mut self,
        parents: &[NodeId],
        axis: usize,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(parents, name, "concat", |shapes| Concat::new(shapes, axis))
    }

    pub fn new_mse_loss_node(
        &mut self,
        input: NodeId,
        target: NodeId,
        reduction: Reduction,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_op_node(&[input, target], name, "mse_loss", |shapes| {
            MSELoss::new(shapes, reduction)
        })
    }
}
