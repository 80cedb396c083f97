use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// MSE（均方误差）损失节点
///
/// 计算预测值和目标值之间的均方误差损失。
///
/// ## 公式
/// - Mean reduction: `MSE = mean((input - target)^2) = sum((input - target)^2) / N`
/// - Sum reduction: `MSE = sum((input - target)^2)`
///
/// ## 梯度
/// - Mean: `∂L/∂input = 2 * (input - target) / N`
/// - Sum: `∂L/∂input = 2 * (input - target)`
///
/// ## 输入
/// - 父节点 0: input（预测值）
/// - 父节点 1: target（目标值）
///
/// ## 输出
/// - 标量损失值 [1, 1]
#[derive(Clone)]
pub(crate) struct MSELoss {
    /// 输出形状固定为 [1, 1]（标量损失）
    shape: Vec<usize>,
    reduction: Reduction,
}

/// Reduction 模式
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Reduction {
    /// 对所有元素求平均（默认）
    #[default]
    Mean,
    /// 对所有元素求和
    Sum,
}

impl MSELoss {
    pub(crate) fn new(parent_shapes: &[&[usize]], reduction: Reduction) -> Result<Self, GraphError> {
        // 1. 验证父节点数量
        let [input, target] = parent_shapes else {
            return Err(GraphError::InvalidOperation(
                "MSELoss 节点需要 2 个父节点（input 和 target）".to_string(),
            ));
        };

        // 2. 验证形状一致
        if input != target {
            return Err(GraphError::ShapeMismatch {
                expected: input.to_vec(),
                got: target.to_vec(),
                message: "input 和 target 形状必须一致".to_string(),
            });
        }

        Ok(Self {
            shape: vec![1, 1],
            reduction,
        })
    }

    fn scale(&self, numel: usize) -> f32 {
        match self.reduction {
            Reduction::Mean => 1.0 / numel.max(1) as f32,
            Reduction::Sum => 1.0,
        }
    }
}

impl TraitNode for MSELoss {
    fn type_name(&self) -> &'static str {
        "MSELoss"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let diff = parents[0] - parents[1];
        let squared_sum = (&diff * &diff).sum();
        Ok(&squared_sum * self.scale(diff.size()))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let upstream = upstream_grad.get_data_number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "MSELoss 的上游梯度必须是标量，但得到形状 {:?}",
                upstream_grad.shape()
            ))
        })?;
        let diff = parents[0] - parents[1];
        let factor = 2.0 * self.scale(diff.size()) * upstream;
        let grad = &diff * factor;
        if parent_index == 0 {
            Ok(grad)
        } else {
            Ok(&grad * -1.0)
        }
    }
}
