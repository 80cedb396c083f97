//! # GRNN Traffic
//!
//! 用图循环神经网络（GRNN）预测交通传感器读数：
//! 传感器之间的邻接矩阵决定隐藏状态如何沿图聚合，
//! 训练时以滑动窗口做截断BPTT，隐藏状态只以值的形式跨窗口传递。
//!
//! - [`tensor`]: 基于`ndarray`的张量
//! - [`nn`]: 静态计算图、节点、`Grnn`模型、损失与优化器
//! - [`data`]: 交通流量数据集
//! - [`train`]: 训练配置与训练驱动
//! - [`vision`]: 预测曲线绘图

pub mod data;
pub mod errors;
pub mod nn;
pub mod tensor;
pub mod train;
pub mod utils;
pub mod vision;
