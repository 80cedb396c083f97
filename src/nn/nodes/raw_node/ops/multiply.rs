use super::binary_broadcast_shape;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Multiply 节点：逐元素乘法（Hadamard积），支持广播
///
/// backward: 对某一父节点的梯度 = upstream ⊙ 另一父节点的值
#[derive(Clone)]
pub(crate) struct Multiply {
    shape: Vec<usize>,
}

impl Multiply {
    pub(crate) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: binary_broadcast_shape("Multiply", parent_shapes)?,
        })
    }
}

impl TraitNode for Multiply {
    fn type_name(&self) -> &'static str {
        "Multiply"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] * parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let other = parents[1 - parent_index];
        Ok((upstream_grad * other).sum_to_shape(parents[parent_index].shape()))
    }
}
