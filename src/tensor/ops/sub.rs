/*
 * @Author       : 老董
 * @Description  : 张量的减法，规则同加法（支持广播与纯数）
 */

use crate::errors::Operator;
use crate::tensor::Tensor;

impl_elementwise_op!(Sub, sub, Operator::Sub, -);
