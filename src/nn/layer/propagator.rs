/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : GraphPropagator：GRNN 的单步图传播单元
 *
 * 对单个 batch 行，以各节点特征 x [d, n]、隐藏状态 H [D, n] 与邻接矩阵 A [n, n]
 * 为输入，先沿图聚合邻居的隐藏状态 M = H·A，再以门控方式更新：
 *   z  = σ(W_z·M + U_z·x + b_z)
 *   r  = σ(W_r·M + U_r·x + b_r)
 *   h̃  = tanh(W_h·(r⊙M) + U_h·x + b_h)
 *   H' = H + z⊙(h̃ - H)
 *   ŷ  = V·H' + c
 * 所有参数在各图节点、各时间步之间共享。
 */

use crate::nn::{Graph, GraphError, Init, Module, Var, VarActivationOps, VarMatrixOps};

/// 单步图传播单元
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new_with_seed(42);
/// let cell = GraphPropagator::new(&graph, 1, 32, "cell")?;
/// let (prediction, hidden) = cell.step(&x, &h, &a)?;
/// ```
#[derive(Debug)]
pub struct GraphPropagator {
    /// 更新门
    w_z: Var,
    u_z: Var,
    b_z: Var,
    /// 重置门
    w_r: Var,
    u_r: Var,
    b_r: Var,
    /// 候选状态
    w_h: Var,
    u_h: Var,
    b_h: Var,
    /// 输出映射
    v: Var,
    c: Var,

    dim_feature: usize,
    dim_hidden: usize,
}

impl GraphPropagator {
    /// 创建传播单元并在`graph`中注册其全部参数
    ///
    /// 权重采用 Xavier 初始化，偏置初始化为零；参数名以`name`为前缀
    pub fn new(
        graph: &Graph,
        dim_feature: usize,
        dim_hidden: usize,
        name: &str,
    ) -> Result<Self, GraphError> {
        if dim_feature == 0 || dim_hidden == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "GraphPropagator 的特征维度与隐藏维度须大于0，实际: dim_feature={dim_feature}, dim_hidden={dim_hidden}"
            )));
        }
        let (d, hd) = (dim_feature, dim_hidden);
        let param = |suffix: &str, shape: &[usize], init: Init| {
            graph.parameter(shape, init, &format!("{name}_{suffix}"))
        };

        Ok(Self {
            w_z: param("W_z", &[hd, hd], Init::Xavier)?,
            u_z: param("U_z", &[hd, d], Init::Xavier)?,
            b_z: param("b_z", &[hd, 1], Init::Zeros)?,
            w_r: param("W_r", &[hd, hd], Init::Xavier)?,
            u_r: param("U_r", &[hd, d], Init::Xavier)?,
            b_r: param("b_r", &[hd, 1], Init::Zeros)?,
            w_h: param("W_h", &[hd, hd], Init::Xavier)?,
            u_h: param("U_h", &[hd, d], Init::Xavier)?,
            b_h: param("b_h", &[hd, 1], Init::Zeros)?,
            v: param("V", &[d, hd], Init::Xavier)?,
            c: param("c", &[d, 1], Init::Zeros)?,
            dim_feature,
            dim_hidden,
        })
    }

    /// 在图中追加一步传播，返回`(预测 [d, n], 新隐藏状态 [D, n])`
    ///
    /// 新隐藏状态的形状与`h`一致；当`a`为单位矩阵时各图节点互不影响
    pub fn step(&self, x: &Var, h: &Var, a: &Var) -> Result<(Var, Var), GraphError> {
        self.check_step_shapes(x, h, a)?;

        // 沿图聚合邻居隐藏状态
        let m = h.matmul(a)?;

        let z = self
            .w_z
            .matmul(&m)?
            .try_add(&self.u_z.matmul(x)?)?
            .try_add(&self.b_z)?
            .sigmoid()?;
        let r = self
            .w_r
            .matmul(&m)?
            .try_add(&self.u_r.matmul(x)?)?
            .try_add(&self.b_r)?
            .sigmoid()?;
        let h_tilde = self
            .w_h
            .matmul(&r.try_mul(&m)?)?
            .try_add(&self.u_h.matmul(x)?)?
            .try_add(&self.b_h)?
            .tanh()?;

        // H' = H + z⊙(h̃ - H)
        let hidden = h.try_add(&z.try_mul(&h_tilde.try_sub(h)?)?)?;
        let prediction = self.v.matmul(&hidden)?.try_add(&self.c)?;

        Ok((prediction, hidden))
    }

    fn check_step_shapes(&self, x: &Var, h: &Var, a: &Var) -> Result<(), GraphError> {
        let a_shape = a.value_expected_shape()?;
        let n = a_shape.first().copied().unwrap_or(0);
        let checks = [
            (vec![n, n], a_shape, "邻接矩阵"),
            (vec![self.dim_feature, n], x.value_expected_shape()?, "节点特征"),
            (vec![self.dim_hidden, n], h.value_expected_shape()?, "隐藏状态"),
        ];
        for (expected, got, what) in checks {
            if expected != got {
                return Err(GraphError::ShapeMismatch {
                    expected,
                    got,
                    message: format!("GraphPropagator 的{what}形状不正确"),
                });
            }
        }
        Ok(())
    }

    pub const fn dim_feature(&self) -> usize {
        self.dim_feature
    }

    pub const fn dim_hidden(&self) -> usize {
        self.dim_hidden
    }
}

impl Module for GraphPropagator {
    fn parameters(&self) -> Vec<Var> {
        vec![
            self.w_z.clone(),
            self.u_z.clone(),
            self.b_z.clone(),
            self.w_r.clone(),
            self.u_r.clone(),
            self.b_r.clone(),
            self.w_h.clone(),
            self.u_h.clone(),
            self.b_h.clone(),
            self.v.clone(),
            self.c.clone(),
        ]
    }
}
