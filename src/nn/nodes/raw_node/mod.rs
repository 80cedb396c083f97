mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub use loss::Reduction;
pub(in crate::nn) use loss::MSELoss;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Clone)]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add(Add),
    Subtract(Subtract),
    Multiply(Multiply),
    MatMul(MatMul),
    ScalarMultiply(ScalarMultiply),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    Concat(Concat),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    MSELoss(MSELoss),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点类型名，如"MatMul"
    fn type_name(&self) -> &'static str;

    /// 节点值的形状，建图时即已确定
    fn value_expected_shape(&self) -> &[usize];

    // 根据父节点的值计算本节点的值（注意：由于该接口只在Graph中使用，所以实现时不用关心父节点的值是否已被计算，所有父节点的值已预先被计算过了）
    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError>;

    /// VJP：给定本节点的上游梯度`upstream_grad`，计算对第`parent_index`个父节点的梯度
    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;
}
