/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 滑动窗口截断BPTT训练驱动
 *
 * 窗口起点 t 从 0 走到 T - truncate - 1，每个窗口：
 * 1. 截取 x = data[t..t+truncate]，y = data[t+1..t+truncate+1]
 * 2. 以当前携带的隐藏状态做 n_iter 次前向、反向与 Adam 更新
 * 3. 用更新后的参数对 x 的第一个时间片单步传播，得到下一个窗口的隐藏状态
 * 4. 通知观察者
 * 隐藏状态只以值的形式在窗口间传递，梯度不会跨窗口。
 */

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::window::{extract_window, window_count};
use super::{TrainConfig, TrainError, TrainObserver, WindowEvent, format_elapsed};
use crate::data::TrafficDataset;
use crate::nn::{Adam, Graph, Grnn, GrnnConfig, Module, MseLoss, Optimizer};
use crate::tensor::Tensor;

/// 读数的特征维度（每个传感器一个标量）
const DIM_FEATURE: usize = 1;

/// 单个窗口的训练记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowReport {
    pub window_index: usize,
    /// 每次内层迭代的损失
    pub losses: Vec<f32>,
    pub forward_count: usize,
    pub backward_count: usize,
    pub step_count: usize,
    pub advance_count: usize,
}

impl WindowReport {
    fn new(window_index: usize) -> Self {
        Self {
            window_index,
            ..Self::default()
        }
    }

    pub fn final_loss(&self) -> Option<f32> {
        self.losses.last().copied()
    }
}

/// 整次训练的汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    pub windows: usize,
    /// 各窗口最后一次内层迭代的损失
    pub window_losses: Vec<f32>,
    pub forward_count: usize,
    pub backward_count: usize,
    pub step_count: usize,
    pub advance_count: usize,
    pub elapsed: Duration,
}

impl TrainReport {
    fn absorb(&mut self, window: &WindowReport) {
        self.windows += 1;
        self.window_losses.extend(window.final_loss());
        self.forward_count += window.forward_count;
        self.backward_count += window.backward_count;
        self.step_count += window.step_count;
        self.advance_count += window.advance_count;
    }
}

/// 训练驱动
///
/// # 使用示例
/// ```ignore
/// let dataset = TrafficDataset::load(&config.data_root, config.task_id)?;
/// let mut trainer = Trainer::new(&config, &dataset)?;
/// let report = trainer.run(&mut NullObserver)?;
/// ```
pub struct Trainer {
    config: TrainConfig,
    seed: u64,
    model: Grnn,
    criterion: MseLoss,
    optimizer: Adam,
    /// 广播到各 batch 行的读数序列 [batch, T, n, 1]
    series: Tensor,
    /// 携带的隐藏状态 [batch, dim_hidden, n]
    hidden: Tensor,
}

impl Trainer {
    pub fn new(config: &TrainConfig, dataset: &TrafficDataset) -> Result<Self, TrainError> {
        config.validate()?;
        let mut config = config.clone();
        let seed = config.resolve_seed();

        let len = dataset.len();
        if len <= config.truncate {
            return Err(TrainError::SeriesTooShort {
                len,
                truncate: config.truncate,
            });
        }
        if config.plot_enabled() && config.plot_node >= dataset.n_node() {
            return Err(TrainError::InvalidConfig(format!(
                "plot_node为{}，超出节点数{}",
                config.plot_node,
                dataset.n_node()
            )));
        }

        let graph = Graph::new_with_seed(seed);
        let model = Grnn::new(
            &graph,
            &GrnnConfig {
                batch_size: config.batch_size,
                dim_feature: DIM_FEATURE,
                dim_hidden: config.dim_hidden,
                n_node: dataset.n_node(),
                truncate: config.truncate,
            },
        )?;
        model.set_adjacency(&dataset.adjacency_tensor())?;
        let optimizer = Adam::new(&graph, &model.parameters(), config.lr);

        // 单条读数序列广播到每个 batch 行
        let single = dataset.series_tensor();
        let rows = vec![&single; config.batch_size];
        let series = Tensor::concat(&rows, 0)?;

        let hidden = Tensor::normal_with_rng(
            0.0,
            1.0,
            &model.hidden_shape(),
            &mut StdRng::seed_from_u64(seed),
        );

        debug!(
            "模型参数共{}个张量、{}个元素",
            model.num_params(),
            model.num_param_elements()
        );

        Ok(Self {
            config,
            seed,
            model,
            criterion: MseLoss::new(),
            optimizer,
            series,
            hidden,
        })
    }

    /// 依次训练全部窗口
    pub fn run<O>(&mut self, observer: &mut O) -> Result<TrainReport, TrainError>
    where
        O: TrainObserver + ?Sized,
    {
        let start = Instant::now();
        let mut report = TrainReport::default();
        for t in 0..self.window_count() {
            let window = self.run_window(t, observer)?;
            report.absorb(&window);
        }
        observer.on_finish()?;
        report.elapsed = start.elapsed();

        info!(
            "训练完成：共{}个窗口，用时{}",
            report.windows,
            format_elapsed(report.elapsed)
        );
        Ok(report)
    }

    /// 训练起点为`t`的单个窗口，并推进携带的隐藏状态
    pub fn run_window<O>(&mut self, t: usize, observer: &mut O) -> Result<WindowReport, TrainError>
    where
        O: TrainObserver + ?Sized,
    {
        let truncate = self.config.truncate;
        let window = extract_window(&self.series, t, truncate)?;

        // 同一窗口内目标不变，只需写入一次
        let target = self.model.stack_target(&window.y)?;
        let loss = self
            .criterion
            .forward(self.model.prediction_var(), &target)?;

        let mut report = WindowReport::new(t);
        let mut prediction = None;
        for i in 0..self.config.n_iter {
            let start = Instant::now();
            let output = self.model.forward(&window.x, &self.hidden)?;
            report.forward_count += 1;
            info!(
                "[Log] {} propagation, {} epoch. Forward used: {}.",
                t + 1,
                i + 1,
                format_elapsed(start.elapsed())
            );

            let start = Instant::now();
            self.optimizer.zero_grad()?;
            let loss_value = loss.backward()?;
            report.backward_count += 1;
            info!(
                "[Log] {} propagation, {} epoch. Backward used: {}.",
                t + 1,
                i + 1,
                format_elapsed(start.elapsed())
            );

            self.optimizer.step()?;
            report.step_count += 1;
            report.losses.push(loss_value);
            prediction = Some(output.prediction);
        }
        let prediction = prediction
            .ok_or_else(|| TrainError::InvalidConfig("n_iter须大于0".to_string()))?;

        // 用更新后的参数对窗口第一个时间片单步传播
        let x_first = first_slice(&window.x);
        self.hidden = self.model.propagate(&x_first, &self.hidden)?.hidden;
        report.advance_count += 1;

        let loss_value = report.final_loss().unwrap_or_default();
        debug!("窗口{t}的损失: {loss_value}");
        observer.on_window(&WindowEvent {
            window_index: t,
            truncate,
            x: &window.x,
            prediction: &prediction,
            loss: loss_value,
        })?;
        Ok(report)
    }

    /// 窗口总数`T - truncate`
    pub fn window_count(&self) -> usize {
        window_count(self.series.shape()[1], self.config.truncate)
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub const fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub const fn model(&self) -> &Grnn {
        &self.model
    }

    /// 当前携带的隐藏状态 [batch, dim_hidden, n]
    pub const fn hidden(&self) -> &Tensor {
        &self.hidden
    }

    /// 广播后的读数序列 [batch, T, n, 1]
    pub const fn series(&self) -> &Tensor {
        &self.series
    }
}

/// [batch, truncate, n, d] 的第 0 个时间片，形状 [batch, n, d]
fn first_slice(x: &Tensor) -> Tensor {
    let shape = x.shape();
    x.narrow(1, 0..1).reshape(&[shape[0], shape[2], shape[3]])
}
