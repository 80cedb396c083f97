/*
 * @Author       : 老董
 * @Description  : Grnn 展开层单元测试
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, Grnn, GrnnConfig, Module, MseLoss};
use crate::tensor::Tensor;

fn config() -> GrnnConfig {
    GrnnConfig {
        batch_size: 2,
        dim_feature: 1,
        dim_hidden: 4,
        n_node: 3,
        truncate: 5,
    }
}

/// [batch, steps, n_node, 1] 的确定性序列，各 batch 行相同
fn series(c: &GrnnConfig, steps: usize) -> Tensor {
    let row: Vec<f32> = (0..steps * c.n_node)
        .map(|i| (i as f32 * 0.7).sin())
        .collect();
    let data: Vec<f32> = (0..c.batch_size).flat_map(|_| row.clone()).collect();
    Tensor::new(&data, &[c.batch_size, steps, c.n_node, c.dim_feature])
}

fn hidden(c: &GrnnConfig) -> Tensor {
    let row: Vec<f32> = (0..c.dim_hidden * c.n_node)
        .map(|i| (i as f32 * 0.3).cos() * 0.5)
        .collect();
    let data: Vec<f32> = (0..c.batch_size).flat_map(|_| row.clone()).collect();
    Tensor::new(&data, &[c.batch_size, c.dim_hidden, c.n_node])
}

#[test]
fn test_forward_shapes() {
    let c = config();
    let graph = Graph::new_with_seed(11);
    let model = Grnn::new(&graph, &c).unwrap();
    assert_eq!(model.hidden_shape(), [2, 4, 3]);
    assert_eq!(model.config(), &c);

    let output = model.forward(&series(&c, c.truncate), &hidden(&c)).unwrap();
    assert_eq!(output.prediction.shape(), &[2, 5, 3, 1]);
    assert_eq!(output.hidden.shape(), &[2, 4, 3]);
    assert!(!output.prediction.has_non_finite());

    // 相同输入的 batch 行给出相同结果
    let first = output.prediction.narrow(0, 0..1);
    let second = output.prediction.narrow(0, 1..2);
    assert_eq!(first, second);
}

#[test]
fn test_parameters_are_shared_across_steps() {
    let c = config();
    let graph = Graph::new_with_seed(12);
    let model = Grnn::new(&graph, &c).unwrap();
    assert_eq!(model.num_params(), 11);
    assert_eq!(graph.parameters().len(), 11);
    assert_eq!(model.cell().dim_hidden(), 4);
}

#[test]
fn test_propagate_matches_first_window_step() {
    let c = config();
    let graph = Graph::new_with_seed(13);
    let model = Grnn::new(&graph, &c).unwrap();
    let x = series(&c, c.truncate);
    let h0 = hidden(&c);

    let window = model.forward(&x, &h0).unwrap();
    let x0 = x.narrow(1, 0..1).reshape(&[c.batch_size, c.n_node, c.dim_feature]);
    let step = model.propagate(&x0, &h0).unwrap();

    assert_eq!(step.prediction.shape(), &[2, 3, 1]);
    assert_eq!(step.hidden.shape(), &[2, 4, 3]);
    let expected = window
        .prediction
        .narrow(1, 0..1)
        .reshape(&[c.batch_size, c.n_node, c.dim_feature]);
    assert!(step.prediction.approx_eq(&expected, 1e-6));

    // 逐步传播到窗口末尾，隐藏状态与整窗前向一致
    let mut h = step.hidden;
    for t in 1..c.truncate {
        let x_t = x
            .narrow(1, t..t + 1)
            .reshape(&[c.batch_size, c.n_node, c.dim_feature]);
        h = model.propagate(&x_t, &h).unwrap().hidden;
    }
    assert!(h.approx_eq(&window.hidden, 1e-5));
}

#[test]
fn test_stack_target_matches_prediction_layout() {
    let c = config();
    let graph = Graph::new_with_seed(14);
    let model = Grnn::new(&graph, &c).unwrap();
    let output = model.forward(&series(&c, c.truncate), &hidden(&c)).unwrap();

    // 以模型自己的预测作为目标，损失应为0
    let target = model.stack_target(&output.prediction).unwrap();
    assert_eq!(target.shape(), &[2 * 5, 3]);
    let criterion = MseLoss::new();
    let loss = criterion.forward(model.prediction_var(), &target).unwrap();
    assert!(loss.backward().unwrap().abs() < 1e-10);

    assert_err!(
        model.stack_target(&Tensor::zeros(&[2, 4, 3, 1])),
        GraphError::ShapeMismatch([2, 5, 3, 1], [2, 4, 3, 1], "Grnn 的目标序列形状不正确")
    );
}

#[test]
fn test_set_adjacency() {
    let c = config();
    let graph = Graph::new_with_seed(15);
    let model = Grnn::new(&graph, &c).unwrap();
    let x = series(&c, c.truncate);
    let h0 = hidden(&c);
    let identity = model.forward(&x, &h0).unwrap();

    let mut a = Tensor::eye(3);
    a[[0, 2]] = 1.0;
    model.set_adjacency(&a).unwrap();
    let mixed = model.forward(&x, &h0).unwrap();
    assert!(!identity.prediction.approx_eq(&mixed.prediction, 1e-7));

    // [1, n, n] 形式等价
    model.set_adjacency(&a.reshape(&[1, 3, 3])).unwrap();
    let again = model.forward(&x, &h0).unwrap();
    assert_eq!(again.prediction, mixed.prediction);

    assert_err!(
        model.set_adjacency(&Tensor::eye(4)),
        GraphError::ShapeMismatch([3, 3], [4, 4], "邻接矩阵形状不正确")
    );
}

#[test]
fn test_forward_shape_errors() {
    let c = config();
    let graph = Graph::new_with_seed(16);
    let model = Grnn::new(&graph, &c).unwrap();

    assert_err!(
        model.forward(&series(&c, 4), &hidden(&c)),
        GraphError::ShapeMismatch([2, 5, 3, 1], [2, 4, 3, 1], "Grnn 的序列输入形状不正确")
    );
    assert_err!(
        model.forward(&series(&c, 5), &Tensor::zeros(&[2, 3, 4])),
        GraphError::ShapeMismatch([2, 4, 3], [2, 3, 4], "Grnn 的初始隐藏状态形状不正确")
    );
    assert_err!(
        model.propagate(&Tensor::zeros(&[2, 3]), &hidden(&c)),
        GraphError::ShapeMismatch([2, 3, 1], [2, 3], "Grnn 的单步输入形状不正确")
    );
}

#[test]
fn test_invalid_config() {
    let graph = Graph::new();
    let c = GrnnConfig {
        truncate: 0,
        ..config()
    };
    assert!(matches!(
        Grnn::new(&graph, &c),
        Err(GraphError::InvalidOperation(_))
    ));
}
