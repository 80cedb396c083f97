/*
 * @Author       : 老董
 * @Description  : 滑动窗口切片
 */

use crate::tensor::Tensor;
use crate::train::TrainError;

/// 一个训练窗口：输入`x`与右移一步的目标`y`，形状均为 [batch, truncate, n, d]
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub x: Tensor,
    pub y: Tensor,
}

/// 从序列 [batch, T, n, d] 中截取起点为`t`的窗口
///
/// `x = series[:, t..t+truncate]`，`y = series[:, t+1..t+truncate+1]`，
/// 故须满足`t + truncate < T`
pub fn extract_window(series: &Tensor, t: usize, truncate: usize) -> Result<Window, TrainError> {
    if series.dimension() != 4 {
        return Err(TrainError::InvalidConfig(format!(
            "序列形状须为 [batch, T, n, d]，实际为{:?}",
            series.shape()
        )));
    }
    let len = series.shape()[1];
    if truncate == 0 || t + truncate >= len {
        return Err(TrainError::WindowOutOfRange { t, truncate, len });
    }
    Ok(Window {
        x: series.narrow(1, t..t + truncate),
        y: series.narrow(1, t + 1..t + truncate + 1),
    })
}

/// 序列长度为`len`时的窗口数
pub const fn window_count(len: usize, truncate: usize) -> usize {
    len.saturating_sub(truncate)
}
