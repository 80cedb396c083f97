use super::broadcast_shape;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Add 节点：所有父节点逐元素相加，支持广播（如偏置[D, 1]加到[D, n]上）
///
/// backward: 上游梯度沿被广播的轴求和后传给对应父节点
#[derive(Clone)]
pub(crate) struct Add {
    shape: Vec<usize>,
}

impl Add {
    pub(crate) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        // 1.1 父节点数量验证
        if parent_shapes.len() < 2 {
            return Err(GraphError::InvalidOperation(
                "Add节点至少需要2个父节点".to_string(),
            ));
        }

        // 1.2 验证所有父节点形状可相互广播
        let mut shape = parent_shapes[0].to_vec();
        for parent_shape in parent_shapes.iter().skip(1) {
            shape = match broadcast_shape(&shape, parent_shape) {
                Some(broadcast) => broadcast,
                None => {
                    return Err(GraphError::ShapeMismatch {
                        expected: shape,
                        got: parent_shape.to_vec(),
                        message: "Add节点的父节点形状无法广播".to_string(),
                    });
                }
            };
        }

        // 2. 返回
        Ok(Self { shape })
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let mut result = parents[0] + parents[1];
        for parent in parents.iter().skip(2) {
            result = &result + *parent;
        }
        Ok(result)
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad.sum_to_shape(parents[parent_index].shape()))
    }
}
