/*
 * @Author       : 老董
 * @Description  : 张量的乘法，实现了张量与纯数的乘法以及两个张量“逐元素”相乘的运算，并返回一个新的张量。
 *                 注意：这里的乘法概念与线性代数中的矩阵乘法不同，在这里其更类似于哈达玛积（Hadamard product）与数乘的结合。
 *                 矩阵乘法请使用`mat_mul`。
 */

use crate::errors::Operator;
use crate::tensor::Tensor;
use std::ops::MulAssign;

impl_elementwise_op!(Mul, mul, Operator::Mul, *);

impl MulAssign<f32> for Tensor {
    fn mul_assign(&mut self, scalar: f32) {
        self.data *= scalar;
    }
}
