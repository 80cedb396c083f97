use super::unary_shape;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Tanh 激活函数节点
///
/// forward: tanh(x)
/// backward: d(tanh)/dx = 1 - tanh²(x)
#[derive(Clone)]
pub(crate) struct Tanh {
    shape: Vec<usize>,
}

impl Tanh {
    pub(crate) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: unary_shape("Tanh", parent_shapes)?,
        })
    }
}

impl TraitNode for Tanh {
    fn type_name(&self) -> &'static str {
        "Tanh"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].tanh())
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let local_grad = 1.0 - &(value * value);
        Ok(upstream_grad * &local_grad)
    }
}
