/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块的错误类型
 */

use crate::errors::TensorError;
use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("节点{0:?}不存在")]
    NodeNotFound(NodeId),
    #[error("非法操作：{0}")]
    InvalidOperation(String),
    #[error("形状不匹配：{message}（预期{expected:?}，实际{got:?}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("维数不匹配：{message}（预期{expected}，实际{got}）")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },
    #[error("计算错误：{0}")]
    ComputationError(String),
    #[error("节点名重复：{0}")]
    DuplicateNodeName(String),
}

impl From<TensorError> for GraphError {
    fn from(err: TensorError) -> Self {
        Self::ComputationError(err.to_string())
    }
}
