mod add;
mod concat;
mod mat_mul;
mod multiply;
mod scalar_multiply;
mod sigmoid;
mod subtract;
mod tanh;

pub(crate) use add::Add;
pub(crate) use concat::Concat;
pub(crate) use mat_mul::MatMul;
pub(crate) use multiply::Multiply;
pub(crate) use scalar_multiply::ScalarMultiply;
pub(crate) use sigmoid::Sigmoid;
pub(crate) use subtract::Subtract;
pub(crate) use tanh::Tanh;

use crate::nn::GraphError;

/// 两个形状按 NumPy 规则广播后的形状，无法广播时返回None
pub(super) fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let len = a.len().max(b.len());
    let mut shape = vec![0; len];
    for i in 0..len {
        let da = if i < len - a.len() { 1 } else { a[i - (len - a.len())] };
        let db = if i < len - b.len() { 1 } else { b[i - (len - b.len())] };
        shape[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(shape)
}

/// 二元逐元素运算节点共用的建图检查：恰好2个父节点且形状可广播
pub(super) fn binary_broadcast_shape(
    node_type: &str,
    parent_shapes: &[&[usize]],
) -> Result<Vec<usize>, GraphError> {
    if parent_shapes.len() != 2 {
        return Err(GraphError::InvalidOperation(format!(
            "{node_type}节点需要正好2个父节点"
        )));
    }
    broadcast_shape(parent_shapes[0], parent_shapes[1]).ok_or_else(|| GraphError::ShapeMismatch {
        expected: parent_shapes[0].to_vec(),
        got: parent_shapes[1].to_vec(),
        message: format!("{node_type}节点的两个父节点形状无法广播"),
    })
}

/// 一元运算节点共用的建图检查：恰好1个父节点，形状与父节点一致
pub(super) fn unary_shape(
    node_type: &str,
    parent_shapes: &[&[usize]],
) -> Result<Vec<usize>, GraphError> {
    match parent_shapes {
        [shape] => Ok(shape.to_vec()),
        _ => Err(GraphError::InvalidOperation(format!(
            "{node_type}节点只需要1个父节点"
        ))),
    }
}
