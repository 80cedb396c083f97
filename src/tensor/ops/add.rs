/*
 * @Author       : 老董
 * @Description  : 张量的加法，实现了两个张量“逐元素”（或张量与纯数）相加的运算，并返回一个新的张量。
 *                 该运算支持以下情况：
 *                 1. 其中一个操作数为纯数而另一个为张量：则返回的张量形状与该张量相同。
 *                 2. 两个操作数均为张量：支持 NumPy 风格的广播（broadcasting）。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::AddAssign;

impl_elementwise_op!(Add, add, Operator::Add, +);

impl AddAssign<&Tensor> for Tensor {
    /// 原地相加，`other`须能广播到`self`的形状
    fn add_assign(&mut self, other: &Tensor) {
        assert!(
            other.can_broadcast_to(self.shape()),
            "{}",
            TensorError::OperatorError {
                operator: Operator::Add,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        self.data += other.raw();
    }
}

impl AddAssign<f32> for Tensor {
    fn add_assign(&mut self, scalar: f32) {
        self.data += scalar;
    }
}
