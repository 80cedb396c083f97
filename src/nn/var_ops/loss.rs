/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 损失函数扩展 trait
 */

use crate::nn::{GraphError, Reduction, Var};
use std::rc::Rc;

/// 损失函数扩展 trait
pub trait VarLossOps {
    /// 均方误差损失（Mean reduction），返回形状为[1, 1]的损失节点
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// 指定 reduction 的均方误差损失
    fn mse_loss_with_reduction(&self, target: &Var, reduction: Reduction)
    -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.mse_loss_with_reduction(target, Reduction::Mean)
    }

    fn mse_loss_with_reduction(
        &self,
        target: &Var,
        reduction: Reduction,
    ) -> Result<Var, GraphError> {
        if !self.same_graph(target) {
            return Err(GraphError::InvalidOperation(
                "不能对来自不同 Graph 的 Var 计算损失".to_string(),
            ));
        }
        let id = self.graph().borrow_mut().new_mse_loss_node(
            self.node_id(),
            target.node_id(),
            reduction,
            None,
        )?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
