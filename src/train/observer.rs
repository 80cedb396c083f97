use crate::tensor::Tensor;
use crate::train::TrainError;

/// 每个窗口训练结束后发给观察者的事件
#[derive(Debug, Clone, Copy)]
pub struct WindowEvent<'a> {
    /// 窗口起点`t`
    pub window_index: usize,
    pub truncate: usize,
    /// 窗口输入 [batch, truncate, n, d]
    pub x: &'a Tensor,
    /// 最后一次内层迭代的预测 [batch, truncate, n, d]
    pub prediction: &'a Tensor,
    /// 最后一次内层迭代的损失
    pub loss: f32,
}

/// 训练过程观察者（如绘图）
pub trait TrainObserver {
    fn on_window(&mut self, event: &WindowEvent<'_>) -> Result<(), TrainError>;

    /// 全部窗口结束后调用一次
    fn on_finish(&mut self) -> Result<(), TrainError> {
        Ok(())
    }
}

/// 什么也不做的观察者
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TrainObserver for NullObserver {
    fn on_window(&mut self, _event: &WindowEvent<'_>) -> Result<(), TrainError> {
        Ok(())
    }
}
