/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : Grnn：把 GraphPropagator 按时间展开成固定长度的静态子图
 *
 * 计算图只定义一次：建图时为每个 batch 行、每个时间步创建输入节点并串接传播单元，
 * 之后每个窗口只需写入新的输入值再执行前向/反向。
 * 初始隐藏状态是输入节点，因此梯度不会越过窗口边界（截断 BPTT）。
 *
 * 张量约定：
 * - 序列输入 x: [batch, steps, n_node, dim_feature]
 * - 隐藏状态 h: [batch, dim_hidden, n_node]
 * - 图中单步的特征为 [dim_feature, n_node]，隐藏状态为 [dim_hidden, n_node]
 */

use super::GraphPropagator;
use crate::nn::{Graph, GraphError, Module, Var, VarShapeOps};
use crate::tensor::Tensor;

/// Grnn 的结构超参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrnnConfig {
    pub batch_size: usize,
    pub dim_feature: usize,
    pub dim_hidden: usize,
    pub n_node: usize,
    /// 展开的时间步数（即截断窗口长度）
    pub truncate: usize,
}

/// 一次前向的结果
#[derive(Debug, Clone)]
pub struct GrnnOutput {
    /// 每个时间步的预测：[batch, steps, n_node, dim_feature]
    pub prediction: Tensor,
    /// 最后一步之后的隐藏状态：[batch, dim_hidden, n_node]
    pub hidden: Tensor,
}

/// 按固定步数展开的一套子图
struct Unrolled {
    steps: usize,
    /// [batch][step]，每个形状为 [dim_feature, n_node]
    inputs: Vec<Vec<Var>>,
    /// [batch]，每个形状为 [dim_hidden, n_node]
    init_hidden: Vec<Var>,
    /// 先按 batch、再按时间步沿第0轴拼接的预测：[batch * steps * dim_feature, n_node]
    stacked_prediction: Var,
    /// [batch]，最后一步的隐藏状态
    final_hidden: Vec<Var>,
}

/// 图循环神经网络
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new_with_seed(7);
/// let model = Grnn::new(&graph, &config)?;
/// model.set_adjacency(&dataset.adjacency_with_self_loops())?;
/// let output = model.forward(&window.x, &h0)?;
/// let loss = criterion.forward(model.prediction_var(), &model.stack_target(&window.y)?)?;
/// ```
pub struct Grnn {
    graph: Graph,
    config: GrnnConfig,
    cell: GraphPropagator,
    adjacency: Var,
    window: Unrolled,
    single_step: Unrolled,
}

impl Grnn {
    /// 在`graph`中注册参数，并建好长度为`truncate`的窗口子图与单步子图
    ///
    /// 邻接矩阵初始为单位阵，可通过[`Grnn::set_adjacency`]替换
    pub fn new(graph: &Graph, config: &GrnnConfig) -> Result<Self, GraphError> {
        let c = *config;
        if c.batch_size == 0 || c.n_node == 0 || c.truncate == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "Grnn 的 batch_size、n_node 与 truncate 须大于0，实际: {c:?}"
            )));
        }

        let cell = GraphPropagator::new(graph, c.dim_feature, c.dim_hidden, "grnn")?;
        let adjacency = graph.input_shape(&[c.n_node, c.n_node], Some("grnn_adjacency"))?;
        adjacency.set_value(&Tensor::eye(c.n_node))?;

        let window = Self::unroll(graph, &cell, &adjacency, &c, c.truncate, "window")?;
        let single_step = Self::unroll(graph, &cell, &adjacency, &c, 1, "step")?;

        Ok(Self {
            graph: graph.clone(),
            config: c,
            cell,
            adjacency,
            window,
            single_step,
        })
    }

    fn unroll(
        graph: &Graph,
        cell: &GraphPropagator,
        adjacency: &Var,
        c: &GrnnConfig,
        steps: usize,
        tag: &str,
    ) -> Result<Unrolled, GraphError> {
        let mut inputs = Vec::with_capacity(c.batch_size);
        let mut init_hidden = Vec::with_capacity(c.batch_size);
        let mut predictions = Vec::with_capacity(c.batch_size * steps);
        let mut final_hidden = Vec::with_capacity(c.batch_size);

        for b in 0..c.batch_size {
            let h0 = graph.input_shape(
                &[c.dim_hidden, c.n_node],
                Some(&format!("grnn_{tag}_h0_b{b}")),
            )?;
            let mut h = h0.clone();
            let mut row_inputs = Vec::with_capacity(steps);
            for t in 0..steps {
                let x_t = graph.input_shape(
                    &[c.dim_feature, c.n_node],
                    Some(&format!("grnn_{tag}_x_b{b}_t{t}")),
                )?;
                let (prediction, hidden) = cell.step(&x_t, &h, adjacency)?;
                predictions.push(prediction);
                row_inputs.push(x_t);
                h = hidden;
            }
            inputs.push(row_inputs);
            init_hidden.push(h0);
            final_hidden.push(h);
        }

        Ok(Unrolled {
            steps,
            inputs,
            init_hidden,
            stacked_prediction: Var::concat(&predictions, 0)?,
            final_hidden,
        })
    }

    /// 以`h0`为初始隐藏状态，对长度为`truncate`的序列`x`执行前向
    ///
    /// - `x`: [batch, truncate, n_node, dim_feature]
    /// - `h0`: [batch, dim_hidden, n_node]
    pub fn forward(&self, x: &Tensor, h0: &Tensor) -> Result<GrnnOutput, GraphError> {
        self.run(&self.window, x, h0)
    }

    /// 单步传播：`x_t`为[batch, n_node, dim_feature]，返回这一步的预测与新隐藏状态
    pub fn propagate(&self, x_t: &Tensor, h: &Tensor) -> Result<GrnnOutput, GraphError> {
        let c = &self.config;
        self.check_shape(x_t.shape(), &[c.batch_size, c.n_node, c.dim_feature], "单步输入")?;
        let x = x_t.reshape(&[c.batch_size, 1, c.n_node, c.dim_feature]);
        let output = self.run(&self.single_step, &x, h)?;
        Ok(GrnnOutput {
            prediction: output
                .prediction
                .reshape(&[c.batch_size, c.n_node, c.dim_feature]),
            hidden: output.hidden,
        })
    }

    fn run(&self, unrolled: &Unrolled, x: &Tensor, h0: &Tensor) -> Result<GrnnOutput, GraphError> {
        let c = &self.config;
        let steps = unrolled.steps;
        self.check_shape(
            x.shape(),
            &[c.batch_size, steps, c.n_node, c.dim_feature],
            "序列输入",
        )?;
        self.check_shape(h0.shape(), &[c.batch_size, c.dim_hidden, c.n_node], "初始隐藏状态")?;

        // 1. 写入输入值
        let x = x.permute(&[0, 1, 3, 2]);
        for b in 0..c.batch_size {
            let x_b = x.narrow(0, b..b + 1);
            for (t, x_t) in unrolled.inputs[b].iter().enumerate() {
                x_t.set_value(&x_b.narrow(1, t..t + 1).reshape(&[c.dim_feature, c.n_node]))?;
            }
            unrolled.init_hidden[b].set_value(
                &h0.narrow(0, b..b + 1)
                    .reshape(&[c.dim_hidden, c.n_node]),
            )?;
        }

        // 2. 前向（最后一步的隐藏状态是最后一步预测的祖先，随之算出）
        self.graph.forward(&unrolled.stacked_prediction)?;
        let prediction = Self::value_of(&unrolled.stacked_prediction)?
            .reshape(&[c.batch_size, steps, c.dim_feature, c.n_node])
            .permute(&[0, 1, 3, 2]);

        let mut hidden_rows = Vec::with_capacity(c.batch_size);
        for h in &unrolled.final_hidden {
            self.graph.forward(h)?;
            hidden_rows.push(Self::value_of(h)?.reshape(&[1, c.dim_hidden, c.n_node]));
        }
        let hidden = Tensor::concat(&hidden_rows.iter().collect::<Vec<_>>(), 0)?;

        Ok(GrnnOutput { prediction, hidden })
    }

    fn value_of(var: &Var) -> Result<Tensor, GraphError> {
        var.value()?.ok_or_else(|| {
            GraphError::ComputationError(format!("节点{:?}在前向后仍没有值", var.node_id()))
        })
    }

    fn check_shape(&self, got: &[usize], expected: &[usize], what: &str) -> Result<(), GraphError> {
        if got == expected {
            Ok(())
        } else {
            Err(GraphError::ShapeMismatch {
                expected: expected.to_vec(),
                got: got.to_vec(),
                message: format!("Grnn 的{what}形状不正确"),
            })
        }
    }

    /// 窗口子图中拼接后的预测节点，损失函数挂在它上面
    pub const fn prediction_var(&self) -> &Var {
        &self.window.stacked_prediction
    }

    /// 把目标序列 [batch, truncate, n_node, dim_feature] 排成与[`Grnn::prediction_var`]一致的布局
    pub fn stack_target(&self, y: &Tensor) -> Result<Tensor, GraphError> {
        let c = &self.config;
        self.check_shape(
            y.shape(),
            &[c.batch_size, c.truncate, c.n_node, c.dim_feature],
            "目标序列",
        )?;
        Ok(y.permute(&[0, 1, 3, 2])
            .reshape(&[c.batch_size * c.truncate * c.dim_feature, c.n_node]))
    }

    /// 设置邻接矩阵，接受 [n_node, n_node] 或 [1, n_node, n_node]
    pub fn set_adjacency(&self, adjacency: &Tensor) -> Result<(), GraphError> {
        let n = self.config.n_node;
        let a = match adjacency.shape() {
            [rows, cols] if *rows == n && *cols == n => adjacency.clone(),
            [1, rows, cols] if *rows == n && *cols == n => adjacency.reshape(&[n, n]),
            other => {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![n, n],
                    got: other.to_vec(),
                    message: "邻接矩阵形状不正确".to_string(),
                });
            }
        };
        self.adjacency.set_value(&a)
    }

    /// 隐藏状态张量的形状：[batch, dim_hidden, n_node]
    pub fn hidden_shape(&self) -> [usize; 3] {
        [self.config.batch_size, self.config.dim_hidden, self.config.n_node]
    }

    pub const fn config(&self) -> &GrnnConfig {
        &self.config
    }

    pub const fn cell(&self) -> &GraphPropagator {
        &self.cell
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl Module for Grnn {
    fn parameters(&self) -> Vec<Var> {
        self.cell.parameters()
    }
}
