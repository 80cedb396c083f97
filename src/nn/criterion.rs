/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 窗口训练用的均方误差准则
 *
 * 截断BPTT的每个窗口里，预测节点固定、目标`y`固定，内层迭代只重复前向与反向。
 * 因此每个预测节点只建一次 target 输入与 loss 节点，
 * 之后每个窗口调用一次`forward`写入新目标，返回的 loss 节点在窗口内反复`backward`。
 */

use super::{GraphError, NodeId, Reduction, Var, VarLossOps};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::collections::HashMap;

/// 挂在某个预测节点上的 target 输入与 loss 节点
struct LossHead {
    target: Var,
    loss: Var,
}

/// 均方误差准则
///
/// # 使用示例
/// ```ignore
/// let criterion = MseLoss::new();
/// // 每个窗口写入一次目标
/// let loss = criterion.forward(model.prediction_var(), &model.stack_target(&window.y)?)?;
/// for _ in 0..n_iter {
///     model.forward(&window.x, &hidden)?;
///     optimizer.zero_grad()?;
///     loss.backward()?;
///     optimizer.step()?;
/// }
/// ```
pub struct MseLoss {
    reduction: Reduction,
    heads: RefCell<HashMap<NodeId, LossHead>>,
}

impl MseLoss {
    /// 按元素取平均
    pub fn new() -> Self {
        Self::with_reduction(Reduction::Mean)
    }

    pub fn with_reduction(reduction: Reduction) -> Self {
        Self {
            reduction,
            heads: RefCell::new(HashMap::new()),
        }
    }

    /// 把`target`写入`prediction`对应的 target 节点并返回 loss 节点
    ///
    /// 首次遇到某个预测节点时在其所在的图中建 target 与 loss 节点，之后只覆盖 target 的值。
    /// `target`形状须与首次建节点时一致。
    pub fn forward(&self, prediction: &Var, target: &Tensor) -> Result<Var, GraphError> {
        let mut heads = self.heads.borrow_mut();
        if let Some(head) = heads.get(&prediction.node_id()) {
            head.target.set_value(target)?;
            return Ok(head.loss.clone());
        }

        let head = self.build(prediction, target)?;
        let loss = head.loss.clone();
        heads.insert(prediction.node_id(), head);
        Ok(loss)
    }

    fn build(&self, prediction: &Var, target: &Tensor) -> Result<LossHead, GraphError> {
        let target = prediction.get_graph().input(target)?;
        let loss = prediction.mse_loss_with_reduction(&target, self.reduction)?;
        Ok(LossHead { target, loss })
    }

    /// 已挂上 loss 的预测节点数
    pub fn cache_size(&self) -> usize {
        self.heads.borrow().len()
    }

    /// 丢弃全部 loss 节点的引用；图中已建的节点不受影响
    pub fn clear_cache(&self) {
        self.heads.borrow_mut().clear();
    }
}

impl Default for MseLoss {
    fn default() -> Self {
        Self::new()
    }
}
