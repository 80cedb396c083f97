/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Layer 模块 - 组合 Node 构建图循环网络
 *
 * Layer 不是新的抽象层，只是把若干节点按固定结构串起来的语法糖。
 */

mod grnn;
mod propagator;

pub use grnn::{Grnn, GrnnConfig, GrnnOutput};
pub use propagator::GraphPropagator;
