/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 训练过程中某个图节点的真实值（红）与预测值（蓝）折线图
 *
 * 第一个窗口画出整段：真实值 x[0, 0..truncate] 位于横坐标 t..t+truncate，
 * 预测值右移一步位于 t+1..=t+truncate；
 * 之后每个窗口只追加最新的一段：真实值延伸到 t+truncate-1，预测值延伸到 t+truncate。
 */

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use log::info;

use crate::tensor::Tensor;
use crate::train::{TrainError, TrainObserver, WindowEvent};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([160, 160, 160]);
const TRUTH: Rgb<u8> = Rgb([220, 30, 30]);
const PREDICTION: Rgb<u8> = Rgb([30, 60, 220]);

/// 画布尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    /// 四周留白（像素）
    pub margin: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 480,
            margin: 24,
        }
    }
}

/// 每个窗口后重绘并保存折线图的观察者
pub struct PlotObserver {
    path: PathBuf,
    node: usize,
    pause: Duration,
    style: PlotStyle,
    /// (横坐标, 值)
    truth: Vec<(f32, f32)>,
    prediction: Vec<(f32, f32)>,
}

impl PlotObserver {
    pub fn new(path: impl AsRef<Path>, node: usize, pause: Duration) -> Self {
        Self::with_style(path, node, pause, PlotStyle::default())
    }

    pub fn with_style(path: impl AsRef<Path>, node: usize, pause: Duration, style: PlotStyle) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            node,
            pause,
            style,
            truth: Vec::new(),
            prediction: Vec::new(),
        }
    }

    pub fn truth_points(&self) -> &[(f32, f32)] {
        &self.truth
    }

    pub fn prediction_points(&self) -> &[(f32, f32)] {
        &self.prediction
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 记录一个窗口的真实值与预测值（只取第0个 batch 行）
    pub fn record(&mut self, event: &WindowEvent<'_>) -> Result<(), TrainError> {
        let shape = event.x.shape();
        if shape.len() != 4 || event.prediction.shape() != shape {
            return Err(TrainError::Plot(format!(
                "窗口输入与预测的形状须同为 [batch, truncate, n, d]，实际为{:?}与{:?}",
                shape,
                event.prediction.shape()
            )));
        }
        if self.node >= shape[2] {
            return Err(TrainError::Plot(format!(
                "绘图节点{}超出节点数{}",
                self.node, shape[2]
            )));
        }
        let steps = shape[1];
        if steps == 0 {
            return Ok(());
        }

        let t = event.window_index;
        let node = self.node;
        let value = |tensor: &Tensor, k: usize| tensor[[0, k, node, 0]];
        let last = steps - 1;
        if self.truth.is_empty() {
            for k in 0..steps {
                self.truth.push(((t + k) as f32, value(event.x, k)));
                self.prediction
                    .push(((t + k + 1) as f32, value(event.prediction, k)));
            }
        } else {
            // 上一窗口的末点即新一段的起点
            self.truth.push(((t + last) as f32, value(event.x, last)));
            self.prediction
                .push(((t + steps) as f32, value(event.prediction, last)));
        }
        Ok(())
    }

    /// 将当前两条折线画到画布上
    pub fn render(&self) -> RgbImage {
        let PlotStyle {
            width,
            height,
            margin,
        } = self.style;
        let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

        let (left, right) = (margin as f32, width.saturating_sub(margin) as f32);
        let (top, bottom) = (margin as f32, height.saturating_sub(margin) as f32);
        draw_line_segment_mut(&mut canvas, (left, bottom), (right, bottom), AXIS);
        draw_line_segment_mut(&mut canvas, (left, top), (left, bottom), AXIS);

        let points = self.truth.iter().chain(&self.prediction);
        let Some(bounds) = Bounds::of(points) else {
            return canvas;
        };
        let to_pixel = |(x, y): (f32, f32)| {
            (
                left + (x - bounds.x_min) / bounds.x_span() * (right - left),
                bottom - (y - bounds.y_min) / bounds.y_span() * (bottom - top),
            )
        };

        for (line, color) in [(&self.truth, TRUTH), (&self.prediction, PREDICTION)] {
            for pair in line.windows(2) {
                draw_line_segment_mut(&mut canvas, to_pixel(pair[0]), to_pixel(pair[1]), color);
            }
        }
        canvas
    }

    /// 渲染并保存为图像文件（格式由扩展名决定）
    pub fn save(&self) -> Result<(), TrainError> {
        self.render()
            .save(&self.path)
            .map_err(|e| TrainError::Plot(format!("{}: {e}", self.path.display())))
    }
}

impl TrainObserver for PlotObserver {
    fn on_window(&mut self, event: &WindowEvent<'_>) -> Result<(), TrainError> {
        self.record(event)?;
        self.save()?;
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        Ok(())
    }

    fn on_finish(&mut self) -> Result<(), TrainError> {
        self.save()?;
        info!("预测曲线已保存到{}", self.path.display());
        Ok(())
    }
}

/// 数据范围
struct Bounds {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl Bounds {
    fn of<'a>(points: impl Iterator<Item = &'a (f32, f32)>) -> Option<Self> {
        points.fold(None, |acc, &(x, y)| {
            Some(match acc {
                None => Self {
                    x_min: x,
                    x_max: x,
                    y_min: y,
                    y_max: y,
                },
                Some(b) => Self {
                    x_min: b.x_min.min(x),
                    x_max: b.x_max.max(x),
                    y_min: b.y_min.min(y),
                    y_max: b.y_max.max(y),
                },
            })
        })
    }

    /// 范围为0时按1处理，避免除零
    fn x_span(&self) -> f32 {
        span(self.x_min, self.x_max)
    }

    fn y_span(&self) -> f32 {
        span(self.y_min, self.y_max)
    }
}

fn span(min: f32, max: f32) -> f32 {
    let span = max - min;
    if span > f32::EPSILON { span } else { 1.0 }
}
