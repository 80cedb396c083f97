use crate::nn::GraphError;
use crate::tensor::Tensor;

use super::TraitNode;

/// 输入节点：值由外部写入（数据、目标值、跨窗口传递的隐藏状态等），不接收梯度
#[derive(Clone)]
pub(crate) struct Input {
    shape: Vec<usize>,
}

impl Input {
    pub(crate) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        // 1. 必要的验证：支持 2D-4D 张量
        if shape.len() < 2 || shape.len() > 4 {
            return Err(GraphError::DimensionMismatch {
                expected: 2, // 表示 2-4 维
                got: shape.len(),
                message: format!(
                    "节点张量必须是 2-4 维，但收到的维度是 {} 维。",
                    shape.len(),
                ),
            });
        }

        // 2. 返回
        Ok(Self {
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        "Input"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点被执行了前向传播。不该触及本错误，否则说明crate代码有问题".to_string(),
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
            "输入节点没有父节点。不该触及本错误，否则说明crate代码有问题".to_string(),
        ))
    }
}
