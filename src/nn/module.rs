/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use super::Var;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Var>`（签名一致，放入 trait）
///
/// # 使用示例
///
/// ```ignore
/// impl Module for Grnn {
///     fn parameters(&self) -> Vec<Var> {
///         self.cell.parameters()
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可训练参数（优化器据此知道要更新哪些参数）
    fn parameters(&self) -> Vec<Var>;

    /// 获取参数数量
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 获取所有参数的元素总数
    fn num_param_elements(&self) -> usize {
        self.parameters()
            .iter()
            .filter_map(|p| p.value_expected_shape().ok())
            .map(|shape| shape.iter().product::<usize>())
            .sum()
    }
}
