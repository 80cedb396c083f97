//! 训练过程错误类型定义

use thiserror::Error;

use crate::data::DataError;
use crate::errors::TensorError;
use crate::nn::GraphError;

/// 训练相关错误
#[derive(Debug, Error)]
pub enum TrainError {
    /// 窗口起点越界：需满足`t + truncate + 1 <= len`
    #[error("窗口起点{t}越界：截断长度{truncate}，序列长度{len}")]
    WindowOutOfRange { t: usize, truncate: usize, len: usize },

    /// 序列长度不大于截断长度时没有可训练的窗口
    #[error("序列长度{len}须大于截断长度{truncate}")]
    SeriesTooShort { len: usize, truncate: usize },

    #[error("训练配置无效：{0}")]
    InvalidConfig(String),

    #[error("绘图失败：{0}")]
    Plot(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Tensor(#[from] TensorError),
}
