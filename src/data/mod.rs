//! 数据加载模块
//!
//! 提供交通流量预测任务的数据集读取。
//!
//! # 主要组件
//!
//! - [`TrafficDataset`]: 传感器读数序列与邻接矩阵（从 `task<id>/` 目录的 .npy 文件读取）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use grnn_traffic::data::{TrafficDataset, default_data_dir};
//!
//! let dataset = TrafficDataset::load(default_data_dir(), 1)?;
//! let series = dataset.series_tensor(); // [1, T, n, 1]
//! let adjacency = dataset.adjacency_tensor(); // [1, n, n]，含自环
//! ```

pub mod error;
mod traffic;


// Re-exports
pub use error::DataError;
pub use traffic::{TrafficDataset, default_data_dir};
