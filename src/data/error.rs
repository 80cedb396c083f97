//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 任务编号对应的数据目录不存在
    #[error("未知的交通预测任务{task_id}：目录{path}不存在")]
    UnknownTask { task_id: u32, path: PathBuf },

    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// 格式错误（如 .npy 文件无法按 f64/f32 二维数组解析）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 序列太短，无法构成“输入-下一步目标”对
    #[error("读数序列至少需要2个时间步，实际只有{0}个")]
    SeriesTooShort(usize),
}
