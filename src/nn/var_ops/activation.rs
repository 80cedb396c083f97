/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : GRNN 门控用到的两种逐元素激活
 */

use crate::nn::{GraphError, GraphInner, NodeId, Var};
use std::rc::Rc;

/// 逐元素激活扩展 trait
///
/// 传播单元里更新门`z`与重置门`r`走 sigmoid，候选状态`h̃`走 tanh：
/// ```ignore
/// let z = w_z.matmul(&m)?.try_add(&u_z.matmul(&x)?)?.try_add(&b_z)?.sigmoid()?;
/// let h_tilde = pre_h.tanh()?;
/// ```
pub trait VarActivationOps {
    /// `1 / (1 + e^-x)`，值域 (0, 1)
    fn sigmoid(&self) -> Result<Var, GraphError>;

    /// 值域 (-1, 1)
    fn tanh(&self) -> Result<Var, GraphError>;
}

impl VarActivationOps for Var {
    fn sigmoid(&self) -> Result<Var, GraphError> {
        self.unary(|g, parent| g.new_sigmoid_node(parent, None))
    }

    fn tanh(&self) -> Result<Var, GraphError> {
        self.unary(|g, parent| g.new_tanh_node(parent, None))
    }
}

impl Var {
    /// 以自身为唯一父节点，在同一张图里追加一个节点
    fn unary(
        &self,
        build: impl FnOnce(&mut GraphInner, NodeId) -> Result<NodeId, GraphError>,
    ) -> Result<Self, GraphError> {
        let id = build(&mut self.graph().borrow_mut(), self.node_id())?;
        Ok(Self::new(id, Rc::clone(self.graph())))
    }
}
