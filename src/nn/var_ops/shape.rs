/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::{GraphError, NodeId, Var};
use std::rc::Rc;

/// 形状变换扩展 trait
pub trait VarShapeOps: Sized {
    /// 沿`axis`拼接多个 Var（除`axis`外形状须一致）
    fn concat(parts: &[Self], axis: usize) -> Result<Self, GraphError>;
}

impl VarShapeOps for Var {
    fn concat(parts: &[Self], axis: usize) -> Result<Self, GraphError> {
        let Some(first) = parts.first() else {
            return Err(GraphError::InvalidOperation(
                "concat 至少需要1个 Var".to_string(),
            ));
        };
        if parts.iter().any(|p| !p.same_graph(first)) {
            return Err(GraphError::InvalidOperation(
                "不能拼接来自不同 Graph 的 Var".to_string(),
            ));
        }
        let ids: Vec<NodeId> = parts.iter().map(Var::node_id).collect();
        let id = first.graph().borrow_mut().new_concat_node(&ids, axis, None)?;
        Ok(Self::new(id, Rc::clone(first.graph())))
    }
}
