use super::unary_shape;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Sigmoid 激活函数节点
///
/// forward: sigmoid(x) = 1 / (1 + e^(-x))
/// backward: d(sigmoid)/dx = sigmoid(x) * (1 - sigmoid(x))
#[derive(Clone)]
pub(crate) struct Sigmoid {
    shape: Vec<usize>,
}

impl Sigmoid {
    pub(crate) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: unary_shape("Sigmoid", parent_shapes)?,
        })
    }
}

impl TraitNode for Sigmoid {
    fn type_name(&self) -> &'static str {
        "Sigmoid"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].sigmoid())
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        // 由本节点的值直接得到局部导数，无需再算一遍sigmoid
        let local_grad = value * &(1.0 - value);
        Ok(upstream_grad * &local_grad)
    }
}
