/*
 * @Author       : 老董
 * @Description  : 张量（Tensor）：基于ndarray的f32多维数组封装，
 *                 为计算图、数据集与训练流程提供统一的数值载体
 */

use ndarray::{Array, IxDyn};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::errors::{ComparisonOperator, TensorError};

/// 为张量批量实现“逐元素”二元运算（支持NumPy风格广播，以及与纯数的运算）。
/// 形状无法广播时panic，panic信息为对应的`TensorError::OperatorError`
macro_rules! impl_elementwise_op {
    ($trait:ident, $method:ident, $operator:expr, $op:tt) => {
        impl std::ops::$trait<&Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: &Tensor) -> Tensor {
                assert!(
                    self.can_broadcast_with(other),
                    "{}",
                    $crate::errors::TensorError::OperatorError {
                        operator: $operator,
                        tensor1_shape: self.shape().to_vec(),
                        tensor2_shape: other.shape().to_vec(),
                    }
                );
                Tensor::from_array(self.raw() $op other.raw())
            }
        }
        impl std::ops::$trait<Tensor> for Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                &self $op &other
            }
        }
        impl std::ops::$trait<&Tensor> for Tensor {
            type Output = Tensor;

            fn $method(self, other: &Tensor) -> Tensor {
                &self $op other
            }
        }
        impl std::ops::$trait<Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                self $op &other
            }
        }
        impl std::ops::$trait<f32> for &Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                Tensor::from_array(self.raw() $op scalar)
            }
        }
        impl std::ops::$trait<f32> for Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                &self $op scalar
            }
        }
        impl std::ops::$trait<&Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: &Tensor) -> Tensor {
                Tensor::from_array(self $op tensor.raw())
            }
        }
        impl std::ops::$trait<Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: Tensor) -> Tensor {
                self $op &tensor
            }
        }
    };
}

mod ops {
    pub mod add;
    pub mod div;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

mod index;
mod print;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let expected: usize = shape.iter().product();
        assert!(
            data.len() == expected,
            "{}",
            TensorError::DataLengthMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        );
        Self {
            data: Array::from_shape_vec(IxDyn(shape), data.to_vec())
                .unwrap_or_else(|_| Array::zeros(IxDyn(shape))),
        }
    }

    /// 直接由ndarray数组构造（crate内部使用）
    pub(crate) const fn from_array(data: Array<f32, IxDyn>) -> Self {
        Self { data }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个含`n`个对角元素的单位矩阵。
    /// n必须大于等于1，否则会panic。
    pub fn eye(n: usize) -> Self {
        assert!(
            n >= 1,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "n".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 1,
            }
        );
        let mut data = Array::zeros(IxDyn(&[n, n]));
        for i in 0..n {
            data[[i, i]] = 1.0;
        }
        Self { data }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn uniform_with_rng<R: Rng>(min: f32, max: f32, shape: &[usize], rng: &mut R) -> Self {
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 创建一个服从正态分布的随机张量（使用全局 thread_rng，不可复现）
    pub fn normal(mean: f32, std_dev: f32, shape: &[usize]) -> Self {
        Self::normal_with_rng(mean, std_dev, shape, &mut rand::thread_rng())
    }

    /// 创建一个服从正态分布的随机张量（使用指定的 RNG，可复现）。
    /// 采用Box-Muller变换生成。
    pub fn normal_with_rng<R: Rng>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);
        let unit = Uniform::new(f32::EPSILON, 1.0);

        while data.len() < data_len {
            let u1: f32 = unit.sample(rng);
            let u2: f32 = unit.sample(rng);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }
}
