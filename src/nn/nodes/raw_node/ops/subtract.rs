use super::binary_broadcast_shape;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Subtract 节点：`left - right`，支持广播
///
/// backward: 对left为`upstream`，对right为`-upstream`（各自沿被广播的轴求和）
#[derive(Clone)]
pub(crate) struct Subtract {
    shape: Vec<usize>,
}

impl Subtract {
    pub(crate) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: binary_broadcast_shape("Subtract", parent_shapes)?,
        })
    }
}

impl TraitNode for Subtract {
    fn type_name(&self) -> &'static str {
        "Subtract"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] - parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let grad = upstream_grad.sum_to_shape(parents[parent_index].shape());
        if parent_index == 0 {
            Ok(grad)
        } else {
            Ok(&grad * -1.0)
        }
    }
}
