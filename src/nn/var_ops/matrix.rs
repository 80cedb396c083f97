/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 矩阵运算扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 矩阵运算扩展 trait
pub trait VarMatrixOps {
    /// 矩阵乘法：`self[m, k] · other[k, p] -> [m, p]`
    fn matmul(&self, other: &Var) -> Result<Var, GraphError>;
}

impl VarMatrixOps for Var {
    fn matmul(&self, other: &Var) -> Result<Var, GraphError> {
        if !self.same_graph(other) {
            return Err(GraphError::InvalidOperation(
                "不能对来自不同 Graph 的 Var 进行矩阵乘法".to_string(),
            ));
        }
        let id = self
            .graph()
            .borrow_mut()
            .new_mat_mul_node(self.node_id(), other.node_id(), None)?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
