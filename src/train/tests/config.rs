use std::path::PathBuf;

use clap::Parser;

use crate::train::{TrainConfig, TrainError};

#[test]
fn test_defaults() {
    let c = TrainConfig::default();
    assert_eq!(c.task_id, 1);
    assert_eq!(c.batch_size, 1);
    assert_eq!(c.dim_hidden, 32);
    assert_eq!(c.truncate, 144);
    assert_eq!(c.n_iter, 2);
    assert!((c.lr - 0.01).abs() < f32::EPSILON);
    assert!(!c.cuda);
    assert!(!c.verbal);
    assert_eq!(c.manual_seed, None);
    assert_eq!(c.data_root, PathBuf::from("./data"));
    assert_eq!(c.plot, PathBuf::from("grnn_prediction.png"));
    assert!(c.plot_enabled());
    assert_eq!(c.plot_pause_ms, 500);
    assert_eq!(c.plot_node, 0);
    assert!(c.validate().is_ok());
}

#[test]
fn test_parse_arguments() {
    let c = TrainConfig::try_parse_from([
        "grnn-traffic",
        "--task-id",
        "3",
        "--batch-size",
        "4",
        "--dim-hidden",
        "16",
        "--truncate",
        "12",
        "--n-iter",
        "5",
        "--lr",
        "0.05",
        "--cuda",
        "--verbal",
        "--manual-seed",
        "42",
        "--data-root",
        "/tmp/traffic",
        "--no-plot",
        "--plot-pause-ms",
        "0",
        "--plot-node",
        "2",
    ])
    .unwrap();
    assert_eq!(c.task_id, 3);
    assert_eq!(c.batch_size, 4);
    assert_eq!(c.dim_hidden, 16);
    assert_eq!(c.truncate, 12);
    assert_eq!(c.n_iter, 5);
    assert!((c.lr - 0.05).abs() < f32::EPSILON);
    assert!(c.cuda && c.verbal);
    assert_eq!(c.manual_seed, Some(42));
    assert_eq!(c.data_root, PathBuf::from("/tmp/traffic"));
    assert!(!c.plot_enabled());
    assert_eq!(c.plot_pause_ms, 0);
    assert_eq!(c.plot_node, 2);

    assert!(TrainConfig::try_parse_from(["grnn-traffic", "--truncate", "abc"]).is_err());
}

#[test]
fn test_resolve_seed() {
    let mut c = TrainConfig {
        manual_seed: Some(7),
        ..TrainConfig::default()
    };
    assert_eq!(c.resolve_seed(), 7);

    let mut c = TrainConfig::default();
    let seed = c.resolve_seed();
    assert!((1..=10000).contains(&seed));
    // 选定后保持不变
    assert_eq!(c.manual_seed, Some(seed));
    assert_eq!(c.resolve_seed(), seed);
}

#[test]
fn test_validate() {
    let invalid = [
        TrainConfig {
            batch_size: 0,
            ..TrainConfig::default()
        },
        TrainConfig {
            n_iter: 0,
            ..TrainConfig::default()
        },
        TrainConfig {
            truncate: 0,
            ..TrainConfig::default()
        },
        TrainConfig {
            lr: -0.1,
            ..TrainConfig::default()
        },
        TrainConfig {
            lr: f32::NAN,
            ..TrainConfig::default()
        },
    ];
    for c in invalid {
        assert!(matches!(c.validate(), Err(TrainError::InvalidConfig(_))));
    }
}

#[test]
fn test_serialize_to_json() {
    let c = TrainConfig {
        manual_seed: Some(5),
        ..TrainConfig::default()
    };
    let json = serde_json::to_string(&c).unwrap();
    assert!(json.contains("\"truncate\":144"));
    assert!(json.contains("\"manual_seed\":5"));
    let back: TrainConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn test_init_logger_twice() {
    let c = TrainConfig {
        verbal: true,
        ..TrainConfig::default()
    };
    assert_eq!(c.log_verbosity(), 4);
    assert_eq!(TrainConfig::default().log_verbosity(), 2);

    // 同一进程内只有第一次设置成功，第二次返回错误而不是 panic
    let _ = c.init_logger();
    assert!(c.init_logger().is_err());
    log::info!("logger 已就绪");
}
