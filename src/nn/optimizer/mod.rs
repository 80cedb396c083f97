/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-17
 * @Description  : 优化器模块，实现 PyTorch 风格的梯度优化算法
 */

mod adam;
mod base;
mod sgd;

pub use adam::Adam;
pub use base::Optimizer;
pub use sgd::SGD;
