/*
 * @Author       : 老董
 * @Description  : 训练配置（命令行参数）
 */

use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::train::TrainError;

/// GRNN 交通流量预测的训练配置
///
/// 由命令行解析一次后以引用传递；未给出`--manual-seed`时由[`TrainConfig::resolve_seed`]随机选取
#[derive(Debug, Clone, PartialEq, Parser, Serialize, Deserialize)]
#[command(
    name = "grnn-traffic",
    version,
    about = "基于图循环神经网络与截断BPTT的交通传感器读数预测"
)]
pub struct TrainConfig {
    /// 交通预测任务编号，对应数据目录`task<id>`
    #[arg(long, default_value_t = 1)]
    pub task_id: u32,

    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// 每个图节点的隐藏状态维度
    #[arg(long, default_value_t = 32)]
    pub dim_hidden: usize,

    /// 截断长度（窗口长度）
    #[arg(long, default_value_t = 144)]
    pub truncate: usize,

    /// 每个窗口上的优化迭代次数
    #[arg(long, default_value_t = 2)]
    pub n_iter: usize,

    /// Adam 学习率
    #[arg(long, default_value_t = 0.01)]
    pub lr: f32,

    /// 使用 GPU（目前只支持 CPU，开启时仅给出警告）
    #[arg(long)]
    pub cuda: bool,

    /// 输出更详细的日志
    #[arg(long)]
    pub verbal: bool,

    /// 随机种子
    #[arg(long)]
    pub manual_seed: Option<u64>,

    /// 数据根目录
    #[arg(long, default_value = "./data")]
    pub data_root: PathBuf,

    /// 预测曲线图的保存路径
    #[arg(long, default_value = "grnn_prediction.png")]
    pub plot: PathBuf,

    /// 不绘图
    #[arg(long)]
    pub no_plot: bool,

    /// 每个窗口绘图后暂停的毫秒数，0 为不暂停
    #[arg(long, default_value_t = 500)]
    pub plot_pause_ms: u64,

    /// 绘制哪个图节点的曲线
    #[arg(long, default_value_t = 0)]
    pub plot_node: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::parse_from(["grnn-traffic"])
    }
}

impl TrainConfig {
    /// 确定本次运行的随机种子；未指定时从`1..=10000`中随机选取并记录
    pub fn resolve_seed(&mut self) -> u64 {
        *self
            .manual_seed
            .get_or_insert_with(|| rand::thread_rng().gen_range(1..=10000))
    }

    /// 检查各参数的取值范围
    pub fn validate(&self) -> Result<(), TrainError> {
        let positive = [
            ("batch_size", self.batch_size),
            ("dim_hidden", self.dim_hidden),
            ("truncate", self.truncate),
            ("n_iter", self.n_iter),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(TrainError::InvalidConfig(format!("{name}须大于0")));
            }
        }
        if !self.lr.is_finite() || self.lr <= 0.0 {
            return Err(TrainError::InvalidConfig(format!(
                "lr须为正数，实际为{}",
                self.lr
            )));
        }
        Ok(())
    }

    /// 是否需要绘图
    pub const fn plot_enabled(&self) -> bool {
        !self.no_plot
    }

    /// stderrlog 的日志级别：2 为 info，4 为 trace
    pub const fn log_verbosity(&self) -> usize {
        if self.verbal { 4 } else { 2 }
    }

    /// 按`--verbal`初始化本 crate 的 stderr 日志；全局 logger 只能设置一次，重复调用返回错误
    pub fn init_logger(&self) -> Result<(), log::SetLoggerError> {
        stderrlog::new()
            .module("grnn_traffic")
            .verbosity(self.log_verbosity())
            .init()
    }
}
