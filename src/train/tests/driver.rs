/*
 * @Author       : 老董
 * @Description  : Trainer 单元测试
 */

use crate::data::TrafficDataset;
use crate::tensor::Tensor;
use crate::train::{
    NullObserver, TrainConfig, TrainError, TrainObserver, Trainer, WindowEvent, extract_window,
};

/// 记录每个窗口事件的观察者
#[derive(Default)]
struct Recorder {
    windows: Vec<usize>,
    shapes: Vec<(Vec<usize>, Vec<usize>)>,
    losses: Vec<f32>,
    finished: bool,
}

impl TrainObserver for Recorder {
    fn on_window(&mut self, event: &WindowEvent<'_>) -> Result<(), TrainError> {
        self.windows.push(event.window_index);
        self.shapes
            .push((event.x.shape().to_vec(), event.prediction.shape().to_vec()));
        self.losses.push(event.loss);
        Ok(())
    }

    fn on_finish(&mut self) -> Result<(), TrainError> {
        self.finished = true;
        Ok(())
    }
}

fn dataset(len: usize, n: usize) -> TrafficDataset {
    let data: Vec<f32> = (0..len * n).map(|i| (i as f32 * 0.37).sin()).collect();
    let mut adjacency = Tensor::zeros(&[n, n]);
    for j in 0..n - 1 {
        adjacency[[j, j + 1]] = 1.0;
        adjacency[[j + 1, j]] = 1.0;
    }
    TrafficDataset::from_parts(Tensor::new(&data, &[len, n]), adjacency).unwrap()
}

fn config(truncate: usize, n_iter: usize) -> TrainConfig {
    TrainConfig {
        batch_size: 1,
        dim_hidden: 4,
        truncate,
        n_iter,
        lr: 0.01,
        manual_seed: Some(3),
        no_plot: true,
        ..TrainConfig::default()
    }
}

#[test]
fn test_run_counts_and_observer() {
    let mut trainer = Trainer::new(&config(5, 1), &dataset(10, 2)).unwrap();
    assert_eq!(trainer.window_count(), 5);
    assert_eq!(trainer.seed(), 3);

    let mut recorder = Recorder::default();
    let report = trainer.run(&mut recorder).unwrap();

    assert_eq!(report.windows, 5);
    assert_eq!(report.forward_count, 5);
    assert_eq!(report.backward_count, 5);
    assert_eq!(report.step_count, 5);
    assert_eq!(report.advance_count, 5);
    assert_eq!(report.window_losses.len(), 5);
    assert!(report.window_losses.iter().all(|l| *l >= 0.0 && l.is_finite()));

    assert_eq!(recorder.windows, vec![0, 1, 2, 3, 4]);
    assert!(recorder.finished);
    for (x_shape, prediction_shape) in &recorder.shapes {
        assert_eq!(x_shape, &vec![1, 5, 2, 1]);
        assert_eq!(prediction_shape, x_shape);
    }
    assert_eq!(recorder.losses, report.window_losses);
}

#[test]
fn test_run_window_inner_iterations() {
    let mut trainer = Trainer::new(&config(4, 3), &dataset(9, 3)).unwrap();
    let report = trainer.run_window(0, &mut NullObserver).unwrap();
    assert_eq!(report.window_index, 0);
    assert_eq!(report.losses.len(), 3);
    assert_eq!(report.forward_count, 3);
    assert_eq!(report.backward_count, 3);
    assert_eq!(report.step_count, 3);
    assert_eq!(report.advance_count, 1);
    assert_eq!(report.final_loss(), report.losses.last().copied());

    assert!(matches!(
        trainer.run_window(5, &mut NullObserver),
        Err(TrainError::WindowOutOfRange {
            t: 5,
            truncate: 4,
            len: 9
        })
    ));
}

#[test]
fn test_hidden_shape_is_invariant() {
    let c = TrainConfig {
        batch_size: 2,
        ..config(3, 1)
    };
    let mut trainer = Trainer::new(&c, &dataset(8, 3)).unwrap();
    assert_eq!(trainer.hidden().shape(), &[2, 4, 3]);
    assert_eq!(trainer.series().shape(), &[2, 8, 3, 1]);

    let before = trainer.hidden().clone();
    for t in 0..trainer.window_count() {
        trainer.run_window(t, &mut NullObserver).unwrap();
        assert_eq!(trainer.hidden().shape(), &[2, 4, 3]);
        assert!(!trainer.hidden().has_non_finite());
    }
    assert_ne!(trainer.hidden(), &before);
}

#[test]
fn test_same_seed_same_run() {
    let data = dataset(12, 2);
    let first = Trainer::new(&config(4, 2), &data)
        .unwrap()
        .run(&mut NullObserver)
        .unwrap();
    let second = Trainer::new(&config(4, 2), &data)
        .unwrap()
        .run(&mut NullObserver)
        .unwrap();
    assert_eq!(first.window_losses, second.window_losses);
}

#[test]
fn test_series_too_short() {
    let err = Trainer::new(&config(5, 1), &dataset(5, 2)).err().unwrap();
    assert!(matches!(
        err,
        TrainError::SeriesTooShort {
            len: 5,
            truncate: 5
        }
    ));
}

#[test]
fn test_invalid_config() {
    let c = TrainConfig {
        n_iter: 0,
        ..config(3, 1)
    };
    let err = Trainer::new(&c, &dataset(8, 2)).err().unwrap();
    assert!(matches!(err, TrainError::InvalidConfig(_)));
}

/// 下一个窗口的隐藏状态 = 用更新后的参数对本窗口第一个时间片单步传播
#[test]
fn test_hidden_advances_one_step_from_first_slice() {
    let truncate = 4;
    let mut trainer = Trainer::new(&config(truncate, 2), &dataset(10, 3)).unwrap();

    for t in 0..3 {
        let h_prev = trainer.hidden().clone();
        trainer.run_window(t, &mut NullObserver).unwrap();

        let x = extract_window(trainer.series(), t, truncate).unwrap().x;
        let first = x.narrow(1, 0..1).reshape(&[1, 3, 1]);
        let last = x.narrow(1, truncate - 1..truncate).reshape(&[1, 3, 1]);
        let model = trainer.model();

        let expected = model.propagate(&first, &h_prev).unwrap().hidden;
        assert!(trainer.hidden().approx_eq(&expected, 1e-6));

        // 不是整窗展开后的末状态，也不是最后一个时间片的单步结果
        let unrolled = model.forward(&x, &h_prev).unwrap().hidden;
        assert!(!trainer.hidden().approx_eq(&unrolled, 1e-6));
        let from_last = model.propagate(&last, &h_prev).unwrap().hidden;
        assert!(!trainer.hidden().approx_eq(&from_last, 1e-6));
    }
}

#[test]
fn test_plot_node_out_of_range() {
    let c = TrainConfig {
        no_plot: false,
        plot_node: 2,
        ..config(3, 1)
    };
    let err = Trainer::new(&c, &dataset(8, 2)).err().unwrap();
    assert!(matches!(err, TrainError::InvalidConfig(_)));
    assert!(err.to_string().contains("plot_node为2"));

    // 末尾节点合法
    let c = TrainConfig {
        no_plot: false,
        plot_node: 1,
        ..config(3, 1)
    };
    assert!(Trainer::new(&c, &dataset(8, 2)).is_ok());

    // 关闭绘图时不检查
    let c = TrainConfig {
        plot_node: 9,
        ..config(3, 1)
    };
    assert!(Trainer::new(&c, &dataset(8, 2)).is_ok());
}
