//! 训练模块
//!
//! 以滑动窗口截断BPTT训练 [`Grnn`](crate::nn::Grnn)：
//!
//! - [`TrainConfig`]: 训练配置（命令行参数）
//! - [`Trainer`]: 训练驱动，逐窗口前向、反向、更新并推进隐藏状态
//! - [`extract_window`]: 从序列截取输入窗口与右移一步的目标窗口
//! - [`TrainObserver`]: 每个窗口结束后的回调（如绘图）
//! - [`TrainError`]: 训练错误类型

mod config;
mod driver;
mod error;
mod observer;
mod timer;
mod window;

#[cfg(test)]
mod tests;

pub use config::TrainConfig;
pub use driver::{TrainReport, Trainer, WindowReport};
pub use error::TrainError;
pub use observer::{NullObserver, TrainObserver, WindowEvent};
pub use timer::format_elapsed;
pub use window::{Window, extract_window, window_count};
