/*
 * @Author       : 老董
 * @Description  : 张量的其它运算：矩阵乘法、转置、激活函数映射、归约等
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Axis, Ix2, IxDyn};

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1, 1]的标量。
    pub fn sum(&self) -> Self {
        Self::new(&[self.data.sum()], &[1, 1])
    }

    /// 所有元素的算术平均值（空张量返回0）
    pub fn mean_value(&self) -> f32 {
        if self.size() == 0 {
            0.0
        } else {
            self.data.sum() / self.size() as f32
        }
    }

    /// 两个二阶张量（矩阵）的矩阵乘法：`[m, n] x [n, p] -> [m, p]`
    /// 形状不满足要求时panic（计算图中的MatMul节点会在建图时预先检查形状）
    pub fn mat_mul(&self, other: &Self) -> Self {
        let incompatible = || TensorError::OperatorError {
            operator: Operator::MatMul,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        let (Ok(a), Ok(b)) = (
            self.data.view().into_dimensionality::<Ix2>(),
            other.data.view().into_dimensionality::<Ix2>(),
        ) else {
            panic!("{}", incompatible());
        };
        assert!(a.ncols() == b.nrows(), "{}", incompatible());
        Self::from_array(a.dot(&b).into_dyn())
    }

    /// 二阶张量的转置
    pub fn transpose(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::AxisOutOfRange {
                axis: 1,
                dimension: self.dimension(),
            }
        );
        Self::from_array(self.data.t().as_standard_layout().into_owned())
    }

    /// 按给定顺序重排各轴，如对形状为[b, t, n, d]的张量`permute(&[0, 1, 3, 2])`得到[b, t, d, n]
    pub fn permute(&self, axes: &[usize]) -> Self {
        Self::from_array(
            self.data
                .clone()
                .permuted_axes(IxDyn(axes))
                .as_standard_layout()
                .into_owned(),
        )
    }

    /// 逐元素映射
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self::from_array(self.data.mapv(f))
    }

    pub fn tanh(&self) -> Self {
        self.map(f32::tanh)
    }

    /// sigmoid(x) = 1 / (1 + e^(-x))，对负数采用等价形式以保证数值稳定
    pub fn sigmoid(&self) -> Self {
        self.map(|x| {
            if x >= 0.0 {
                1.0 / (1.0 + (-x).exp())
            } else {
                let e = x.exp();
                e / (1.0 + e)
            }
        })
    }

    pub fn sqrt(&self) -> Self {
        self.map(f32::sqrt)
    }

    /// 将（经过广播得到的）张量沿被广播的轴求和，还原到`shape`。
    /// 用于计算图中带广播的二元运算向父节点回传梯度
    pub fn sum_to_shape(&self, shape: &[usize]) -> Self {
        if self.shape() == shape {
            return self.clone();
        }
        assert!(
            Self::zeros(shape).can_broadcast_to(self.shape()),
            "{}",
            TensorError::IncompatibleShape
        );
        let mut data = self.data.clone();
        // 1. 先把多出的前导轴求和消掉
        while data.ndim() > shape.len() {
            data = data.sum_axis(Axis(0));
        }
        // 2. 再对目标形状中为1、而当前不为1的轴求和（保持维度）
        for (axis, &len) in shape.iter().enumerate() {
            if len == 1 && data.shape()[axis] != 1 {
                data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
            }
        }
        Self::from_array(data)
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
