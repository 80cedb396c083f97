/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作 + forward
 * - backward.rs: VJP 反向传播
 * - mode.rs: detach 机制
 * - node_builders.rs: new_*_node
 */

mod backward;
mod core;
mod mode;
mod node_builders;

use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构，也可通过 `graph.inner()` 访问底层操作。
///
/// 图是静态的：节点建好后不再删除。节点id按创建顺序递增，
/// 因此升序遍历即为前向的拓扑序，降序遍历即为反向的拓扑序。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 正向边：parent_id -> child_ids（父节点指向子节点）
    pub(in crate::nn::graph) forward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 反向边：child_id -> parent_ids（子节点指向父节点，保持父节点顺序）
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    pub(in crate::nn::graph) node_names: HashSet<String>,
    /// 各节点类型自动命名的计数器
    pub(in crate::nn::graph) name_counters: HashMap<String, usize>,
    /// 输入/参数节点的取值代次，每次 set_value 后递增；运算节点据此判断缓存的值是否过期
    pub(in crate::nn::graph) values_generation: u64,
    /// 最后一次前向传播的 id
    pub(in crate::nn::graph) last_forward_pass_id: u64,
    /// 最后一次反向传播的 id
    pub(in crate::nn::graph) last_backward_pass_id: u64,
    pub(in crate::nn::graph) next_id: u64,
    /// 图级别的随机数生成器（用于参数初始化等）
    /// None 表示使用默认的 thread_rng（非确定性）
    pub(in crate::nn::graph) rng: Option<StdRng>,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
