use super::unary_shape;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// ScalarMultiply 节点：父节点乘以建图时给定的常数
#[derive(Clone)]
pub(crate) struct ScalarMultiply {
    scalar: f32,
    shape: Vec<usize>,
}

impl ScalarMultiply {
    pub(crate) fn new(parent_shapes: &[&[usize]], scalar: f32) -> Result<Self, GraphError> {
        Ok(Self {
            scalar,
            shape: unary_shape("ScalarMultiply", parent_shapes)?,
        })
    }
}

impl TraitNode for ScalarMultiply {
    fn type_name(&self) -> &'static str {
        "ScalarMultiply"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] * self.scalar)
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad * self.scalar)
    }
}
