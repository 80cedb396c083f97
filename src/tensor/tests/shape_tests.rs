use crate::assert_panic;
use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_can_broadcast() {
    let a = Tensor::zeros(&[2, 3]);
    assert!(a.can_broadcast_with(&Tensor::zeros(&[2, 1])));
    assert!(a.can_broadcast_with(&Tensor::zeros(&[3])));
    assert!(!a.can_broadcast_with(&Tensor::zeros(&[2])));
    assert!(Tensor::zeros(&[2, 1]).can_broadcast_to(&[2, 3]));
    assert!(!Tensor::zeros(&[2, 3]).can_broadcast_to(&[2, 1]));
}

#[test]
fn test_reshape() {
    let t = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[1, 3, 2, 1]);
    let r = t.reshape(&[3, 2]);
    assert_eq!(r.shape(), &[3, 2]);
    assert_eq!(r[[2, 1]], 6.);
    assert_panic!(
        t.reshape(&[4, 2]),
        "数据长度6与形状[4, 2]的元素个数不一致"
    );
}

#[test]
fn test_narrow() {
    // [1, T=4, n=2, 1]
    let series = Tensor::new(&[0., 1., 10., 11., 20., 21., 30., 31.], &[1, 4, 2, 1]);
    let window = series.narrow(1, 1..3);
    assert_eq!(window.shape(), &[1, 2, 2, 1]);
    assert_eq!(window.to_vec(), vec![10., 11., 20., 21.]);
    assert_panic!(series.narrow(1, 3..5), "切片范围3..5超出轴长度4");
    assert_panic!(series.narrow(4, 0..1), "轴4超出张量维数4");
}

#[test]
fn test_concat() {
    let a = Tensor::new(&[1., 2.], &[1, 2]);
    let b = Tensor::new(&[3., 4., 5., 6.], &[2, 2]);
    let c = Tensor::concat(&[&a, &b], 0).unwrap();
    assert_eq!(c, Tensor::new(&[1., 2., 3., 4., 5., 6.], &[3, 2]));

    assert_eq!(Tensor::concat(&[], 0), Err(TensorError::EmptyList));
    let bad = Tensor::zeros(&[1, 3]);
    assert!(matches!(
        Tensor::concat(&[&a, &bad], 0),
        Err(TensorError::OperatorError { .. })
    ));
    assert_eq!(
        Tensor::concat(&[&a, &a], 2),
        Err(TensorError::AxisOutOfRange {
            axis: 2,
            dimension: 2
        })
    );
}

#[test]
fn test_display() {
    let m = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    let text = format!("{m}");
    assert!(text.contains("形状: [2, 2]"));
    let big = Tensor::zeros(&[1, 2, 3]);
    assert!(format!("{big}").contains("无法展示具体数据"));
}
