/*
 * @Author       : 老董
 * @Description  : 张量的除法，规则同乘法（逐元素，支持广播与纯数）。
 *                 除数为零时遵循IEEE 754语义（得到inf或NaN），不做额外检查
 */

use crate::errors::Operator;
use crate::tensor::Tensor;

impl_elementwise_op!(Div, div, Operator::Div, /);
