/*
 * @Author       : 老董
 * @Description  : 滑动窗口切片单元测试
 */

use crate::tensor::Tensor;
use crate::train::{TrainError, extract_window, window_count};

/// [2, 8, 3, 1]：第 b 行第 t 步第 j 个节点的值为 100b + 10t + j
fn series() -> Tensor {
    let mut data = Vec::new();
    for b in 0..2 {
        for t in 0..8 {
            for j in 0..3 {
                data.push((100 * b + 10 * t + j) as f32);
            }
        }
    }
    Tensor::new(&data, &[2, 8, 3, 1])
}

#[test]
fn test_target_is_input_shifted_by_one_step() {
    let s = series();
    let truncate = 4;
    for t in 0..window_count(8, truncate) {
        let w = extract_window(&s, t, truncate).unwrap();
        assert_eq!(w.x.shape(), &[2, 4, 3, 1]);
        assert_eq!(w.x.shape(), w.y.shape());
        for b in 0..2 {
            for k in 0..truncate {
                for j in 0..3 {
                    assert_eq!(w.x[[b, k, j, 0]], s[[b, t + k, j, 0]]);
                    assert_eq!(w.y[[b, k, j, 0]], s[[b, t + k + 1, j, 0]]);
                }
            }
        }
        // y 的前 truncate-1 步即 x 的后 truncate-1 步
        assert_eq!(w.y.narrow(1, 0..3), w.x.narrow(1, 1..4));
    }
}

#[test]
fn test_window_out_of_range() {
    let s = series();
    assert_eq!(window_count(8, 4), 4);
    assert!(extract_window(&s, 3, 4).is_ok());

    let err = extract_window(&s, 4, 4).unwrap_err();
    assert!(matches!(
        err,
        TrainError::WindowOutOfRange {
            t: 4,
            truncate: 4,
            len: 8
        }
    ));
    assert!(matches!(
        extract_window(&s, 0, 8),
        Err(TrainError::WindowOutOfRange { .. })
    ));
    assert!(matches!(
        extract_window(&s, 0, 0),
        Err(TrainError::WindowOutOfRange { .. })
    ));
    assert!(matches!(
        extract_window(&Tensor::zeros(&[8, 3]), 0, 2),
        Err(TrainError::InvalidConfig(_))
    ));
    assert_eq!(window_count(3, 5), 0);
}
