use crate::nn::GraphError;
use crate::tensor::Tensor;

use super::TraitNode;

/// 参数节点：可训练的权重，只由优化器更新
#[derive(Clone)]
pub(crate) struct Parameter {
    shape: Vec<usize>,
}

impl Parameter {
    pub(crate) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        if shape.len() < 2 || shape.len() > 4 {
            return Err(GraphError::DimensionMismatch {
                expected: 2, // 表示 2-4 维
                got: shape.len(),
                message: format!(
                    "参数张量必须是 2-4 维，但收到的维度是 {} 维。",
                    shape.len(),
                ),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Parameter {
    fn type_name(&self) -> &'static str {
        "Parameter"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点被执行了前向传播。不该触及本错误，否则说明crate代码有问题".to_string(),
        ))
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点没有父节点。不该触及本错误，否则说明crate代码有问题".to_string(),
        ))
    }
}
