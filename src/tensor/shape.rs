/*
 * @Author       : 老董
 * @Description  : 张量形状相关：广播判定、变形、沿轴切片与拼接
 */

use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Axis, Slice};
use std::ops::Range;

impl Tensor {
    /// 判断两个张量能否按 NumPy 规则相互广播：
    /// - 从右向左对齐维度
    /// - 每个维度必须相等，或其中一个为 1
    /// - 维度数不同时，较短的形状前面补 1
    pub fn can_broadcast_with(&self, other: &Self) -> bool {
        self.shape()
            .iter()
            .rev()
            .zip(other.shape().iter().rev())
            .all(|(&a, &b)| a == b || a == 1 || b == 1)
    }

    /// 判断本张量能否（单向）广播到`target`形状
    pub fn can_broadcast_to(&self, target: &[usize]) -> bool {
        self.dimension() <= target.len()
            && self
                .shape()
                .iter()
                .rev()
                .zip(target.iter().rev())
                .all(|(&a, &b)| a == b || a == 1)
    }

    /// 改变形状（按行优先顺序），元素个数必须一致，否则panic
    pub fn reshape(&self, shape: &[usize]) -> Self {
        assert!(
            self.size() == shape.iter().product::<usize>(),
            "{}",
            TensorError::DataLengthMismatch {
                data_len: self.size(),
                shape: shape.to_vec(),
            }
        );
        Self::new(&self.to_vec(), shape)
    }

    /// 沿`axis`截取`range`范围的元素（保留该维度），如对形状[1, T, n, 1]的张量
    /// `narrow(1, t..t + k)`得到[1, k, n, 1]
    pub fn narrow(&self, axis: usize, range: Range<usize>) -> Self {
        assert!(
            axis < self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
        let len = self.shape()[axis];
        assert!(
            range.start <= range.end && range.end <= len,
            "{}",
            TensorError::SliceOutOfRange {
                start: range.start,
                end: range.end,
                len,
            }
        );
        let view = self.data.slice_axis(
            Axis(axis),
            Slice::from(range.start as isize..range.end as isize),
        );
        Self::from_array(view.to_owned())
    }

    /// 沿`axis`拼接多个张量，除`axis`外各维度须一致
    pub fn concat(tensors: &[&Self], axis: usize) -> Result<Self, TensorError> {
        let first = tensors.first().ok_or(TensorError::EmptyList)?;
        for t in tensors.iter().skip(1) {
            let same_except_axis = t.dimension() == first.dimension()
                && t
                    .shape()
                    .iter()
                    .zip(first.shape())
                    .enumerate()
                    .all(|(i, (a, b))| i == axis || a == b);
            if !same_except_axis {
                return Err(TensorError::OperatorError {
                    operator: Operator::Concat,
                    tensor1_shape: first.shape().to_vec(),
                    tensor2_shape: t.shape().to_vec(),
                });
            }
        }
        if axis >= first.dimension() {
            return Err(TensorError::AxisOutOfRange {
                axis,
                dimension: first.dimension(),
            });
        }
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(axis), &views)
            .map_err(|_| TensorError::IncompatibleShape)?;
        Ok(Self::from_array(data))
    }
}
