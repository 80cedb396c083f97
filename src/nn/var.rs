/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @Description  : Smart Var - 智能变量句柄，支持算子重载和链式调用
 */

use super::graph::GraphInner;
use super::{GraphError, NodeId};
use crate::tensor::Tensor;
use rand::Rng;
use std::cell::RefCell;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;

// ==================== Init 枚举 ====================

/// 参数初始化策略
#[derive(Debug, Clone)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 正态分布（使用 Graph 的 RNG）
    Normal { mean: f32, std: f32 },
    /// Xavier/Glorot 初始化（适用于 Sigmoid/Tanh）
    Xavier,
}

impl Init {
    /// 生成初始化后的 Tensor（使用全局 RNG）
    pub fn generate(&self, shape: &[usize]) -> Tensor {
        self.generate_with_rng(shape, &mut rand::thread_rng())
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng<R: Rng>(&self, shape: &[usize], rng: &mut R) -> Tensor {
        match self {
            Self::Constant(v) => &Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Xavier => {
                let (fan_out, fan_in) = (shape[0], shape.get(1).copied().unwrap_or(1));
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}

// ==================== Var 结构 ====================

/// 智能变量句柄 - 携带图引用，支持算子重载和链式调用
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&features)?;      // 返回 Var
/// let y = w.matmul(&x)?;                // 方法调用
/// let z = (&y + &b).tanh()?;            // 算子重载 + 链式调用
/// let loss = z.mse_loss(&target)?;
/// loss.backward()?;                     // 直接在 Var 上调用
/// ```
#[derive(Clone)]
pub struct Var {
    /// 节点 ID
    id: NodeId,
    /// 图引用（用户不可见）
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    /// 创建新的 Var（内部使用）
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    /// 获取节点 ID
    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    /// 获取内部图引用（供 trait 和内部模块使用）
    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> super::graph::Graph {
        super::graph::Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 获取节点的预期输出形状（节点创建时就已确定）
    pub fn value_expected_shape(&self) -> Result<Vec<usize>, GraphError> {
        Ok(self
            .graph
            .borrow()
            .get_node_value_expected_shape(self.id)?
            .to_vec())
    }

    pub fn name(&self) -> Result<String, GraphError> {
        Ok(self.graph.borrow().get_node_name(self.id)?.to_string())
    }

    // ==================== 梯度流控制 ====================

    /// 截断梯度流：本节点及其祖先不再从本节点的下游收到梯度
    pub fn detach(&self) -> Result<Self, GraphError> {
        self.graph.borrow_mut().detach_node(self.id)?;
        Ok(self.clone())
    }

    /// 恢复梯度流
    pub fn attach(&self) -> Result<Self, GraphError> {
        self.graph.borrow_mut().attach_node(self.id)?;
        Ok(self.clone())
    }

    pub fn is_detached(&self) -> Result<bool, GraphError> {
        self.graph.borrow().is_node_detached(self.id)
    }

    // ==================== 执行 ====================

    /// 前向传播
    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 反向传播（ensure-forward 语义）
    ///
    /// 自动先执行 forward()，确保 loss 值已计算，然后执行反向传播。
    /// 返回 loss 的标量值
    pub fn backward(&self) -> Result<f32, GraphError> {
        let mut g = self.graph.borrow_mut();
        g.forward(self.id)?;
        g.backward(self.id)
    }

    // ==================== 值访问和设置 ====================

    /// 获取节点的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    /// 设置节点的值（仅限输入/参数节点）
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    /// 获取标量值（假设是 1x1 Tensor）
    pub fn item(&self) -> Result<f32, GraphError> {
        let val = self.value()?.ok_or_else(|| {
            GraphError::ComputationError(format!("节点{:?}没有值，请先执行 forward", self.id))
        })?;
        val.get_data_number()
            .ok_or_else(|| GraphError::InvalidOperation("Tensor 不是标量".to_string()))
    }

    /// 获取节点的梯度
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        self.graph.borrow().get_node_grad(self.id)
    }

    // ==================== 安全版本（返回 Result）====================

    fn check_same_graph(&self, other: &Self, op_name: &str) -> Result<(), GraphError> {
        if self.same_graph(other) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(format!(
                "不能对来自不同 Graph 的 Var 进行{op_name}"
            )))
        }
    }

    /// 安全的加法（返回 Result），支持广播
    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "加法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_add_node(&[self.id, other.id], None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    /// 安全的减法（返回 Result），支持广播
    pub fn try_sub(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "减法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_subtract_node(self.id, other.id, None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    /// 安全的元素级乘法（返回 Result），支持广播
    pub fn try_mul(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "乘法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_multiply_node(self.id, other.id, None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }
}

// ==================== 算子重载 ====================

macro_rules! impl_var_binary_op {
    ($trait:ident, $method:ident, $try_method:ident, $fail_msg:literal) => {
        impl $trait for &Var {
            type Output = Var;

            fn $method(self, other: &Var) -> Var {
                self.$try_method(other).expect($fail_msg)
            }
        }

        impl $trait for Var {
            type Output = Self;

            fn $method(self, other: Self) -> Self {
                (&self).$method(&other)
            }
        }

        impl $trait<Var> for &Var {
            type Output = Var;

            fn $method(self, other: Var) -> Var {
                self.$method(&other)
            }
        }

        impl $trait<&Self> for Var {
            type Output = Self;

            fn $method(self, other: &Self) -> Self {
                (&self).$method(other)
            }
        }
    };
}

impl_var_binary_op!(Add, add, try_add, "Var 加法失败");
impl_var_binary_op!(Sub, sub, try_sub, "Var 减法失败");
impl_var_binary_op!(Mul, mul, try_mul, "Var 乘法失败");

// Mul<f32> for &Var（乘以常数）
impl Mul<f32> for &Var {
    type Output = Var;

    fn mul(self, scalar: f32) -> Var {
        let id = self
            .graph
            .borrow_mut()
            .new_scalar_multiply_node(self.id, scalar, None)
            .expect("Var 数乘失败");
        Var::new(id, Rc::clone(&self.graph))
    }
}

impl Mul<f32> for Var {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        &self * scalar
    }
}
