use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// MatMul 节点：`left[m, k] · right[k, p] -> [m, p]`
///
/// backward: `∂/∂left = upstream · rightᵀ`，`∂/∂right = leftᵀ · upstream`
#[derive(Clone)]
pub(crate) struct MatMul {
    shape: Vec<usize>,
}

impl MatMul {
    pub(crate) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        // 1.1 父节点数量验证
        let [left, right] = parent_shapes else {
            return Err(GraphError::InvalidOperation(
                "MatMul节点需要正好2个父节点".to_string(),
            ));
        };
        // 1.2 只支持矩阵
        for shape in [left, right] {
            if shape.len() != 2 {
                return Err(GraphError::DimensionMismatch {
                    expected: 2,
                    got: shape.len(),
                    message: "MatMul节点的父节点必须是矩阵".to_string(),
                });
            }
        }
        // 1.3 内维一致
        if left[1] != right[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![left[1], right[1]],
                got: right.to_vec(),
                message: format!(
                    "MatMul节点的2个父节点形状不兼容：左矩阵的列数({})与右矩阵的行数({})不相等",
                    left[1], right[0]
                ),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: vec![left[0], right[1]],
        })
    }
}

impl TraitNode for MatMul {
    fn type_name(&self) -> &'static str {
        "MatMul"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].mat_mul(parents[1]))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index == 0 {
            Ok(upstream_grad.mat_mul(&parents[1].transpose()))
        } else {
            Ok(parents[0].transpose().mat_mul(upstream_grad))
        }
    }
}
