/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner detach 机制
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;

impl GraphInner {
    /// 将节点标记为 detached：该节点不再接收梯度，也就不会把梯度继续传给它的祖先
    pub fn detach_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_detached(true);
        Ok(())
    }

    /// 取消节点的 detach 状态
    pub fn attach_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_detached(false);
        Ok(())
    }

    /// 检查节点是否被 detach
    pub fn is_node_detached(&self, node_id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(node_id)?.is_detached())
    }
}
