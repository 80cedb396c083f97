use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use grnn_traffic::data::TrafficDataset;
use grnn_traffic::train::{NullObserver, TrainConfig, TrainError, TrainObserver, Trainer};
use grnn_traffic::vision::PlotObserver;

fn main() -> ExitCode {
    let mut config = TrainConfig::parse();
    if let Err(e) = config.init_logger() {
        eprintln!("日志初始化失败：{e}");
    }

    match run(&mut config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &mut TrainConfig) -> Result<(), TrainError> {
    let seed = config.resolve_seed();
    info!("Random Seed: {seed}");
    match serde_json::to_string(config) {
        Ok(json) => info!("{json}"),
        Err(e) => warn!("无法序列化训练配置：{e}"),
    }
    if config.cuda {
        warn!("暂不支持 GPU，继续使用 CPU 训练");
    }

    let dataset = TrafficDataset::load(&config.data_root, config.task_id)?;
    info!(
        "已加载任务{}：{}个传感器，{}个时间步",
        config.task_id,
        dataset.n_node(),
        dataset.len()
    );

    let mut trainer = Trainer::new(config, &dataset)?;
    let mut observer: Box<dyn TrainObserver> = if config.plot_enabled() {
        Box::new(PlotObserver::new(
            &config.plot,
            config.plot_node,
            Duration::from_millis(config.plot_pause_ms),
        ))
    } else {
        Box::new(NullObserver)
    };
    let report = trainer.run(observer.as_mut())?;

    if let Some(loss) = report.window_losses.last() {
        info!("最后一个窗口的损失: {loss}");
    }
    Ok(())
}
