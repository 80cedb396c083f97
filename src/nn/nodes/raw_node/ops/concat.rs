use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Concat 节点：沿`axis`拼接所有父节点（如把一个窗口内每个时间步的预测拼成一个矩阵）
///
/// backward: 把上游梯度沿`axis`按各父节点的长度切回去
#[derive(Clone)]
pub(crate) struct Concat {
    axis: usize,
    shape: Vec<usize>,
}

impl Concat {
    pub(crate) fn new(parent_shapes: &[&[usize]], axis: usize) -> Result<Self, GraphError> {
        // 1. 必要的验证
        let Some(first) = parent_shapes.first() else {
            return Err(GraphError::InvalidOperation(
                "Concat节点至少需要1个父节点".to_string(),
            ));
        };
        if axis >= first.len() {
            return Err(GraphError::DimensionMismatch {
                expected: axis + 1,
                got: first.len(),
                message: format!("Concat节点的拼接轴{axis}超出父节点维数"),
            });
        }
        let mut shape = first.to_vec();
        for parent_shape in parent_shapes.iter().skip(1) {
            let compatible = parent_shape.len() == first.len()
                && parent_shape
                    .iter()
                    .zip(first.iter())
                    .enumerate()
                    .all(|(i, (a, b))| i == axis || a == b);
            if !compatible {
                return Err(GraphError::ShapeMismatch {
                    expected: first.to_vec(),
                    got: parent_shape.to_vec(),
                    message: format!("Concat节点的父节点除第{axis}轴外形状必须一致"),
                });
            }
            shape[axis] += parent_shape[axis];
        }

        // 2. 返回
        Ok(Self { axis, shape })
    }
}

impl TraitNode for Concat {
    fn type_name(&self) -> &'static str {
        "Concat"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(Tensor::concat(parents, self.axis)?)
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let start: usize = parents[..parent_index]
            .iter()
            .map(|p| p.shape()[self.axis])
            .sum();
        let len = parents[parent_index].shape()[self.axis];
        Ok(upstream_grad.narrow(self.axis, start..start + len))
    }
}
