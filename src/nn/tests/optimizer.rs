/*
 * @Author       : 老董
 * @Date         : 2025-12-20
 * @Description  : 优化器测试（SGD、Adam 与 Optimizer trait 的通用行为）
 */

use crate::nn::{Adam, Graph, Init, MseLoss, Optimizer, Reduction, SGD, Var, VarLossOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

/// loss = Σ w²（对零目标的求和 MSE），∇w = 2w
fn square_loss(graph: &Graph, w: &Var) -> Var {
    let zeros = graph.zeros(&w.value_expected_shape().unwrap()).unwrap();
    w.mse_loss_with_reduction(&zeros, Reduction::Sum).unwrap()
}

#[test]
fn test_sgd_update_formula() {
    // θ_new = θ_old - α * ∇θ = w - 0.1 * 2w = 0.8w
    let graph = Graph::new();
    let w = graph.parameter(&[1, 2], Init::Constant(1.0), "w").unwrap();
    w.set_value(&Tensor::new(&[1.0, -2.0], &[1, 2])).unwrap();
    let loss = square_loss(&graph, &w);

    let mut sgd = SGD::new(&graph, &[w.clone()], 0.1);
    let loss_value = sgd.minimize(&loss).unwrap();

    assert_abs_diff_eq!(loss_value, 5.0, epsilon = 1e-6);
    let updated = w.value().unwrap().unwrap();
    assert!(updated.approx_eq(&Tensor::new(&[0.8, -1.6], &[1, 2]), 1e-6));
}

#[test]
fn test_sgd_learning_rate_modification() {
    let graph = Graph::new();
    let w = graph.parameter(&[2, 2], Init::Zeros, "w").unwrap();
    let mut sgd = SGD::new(&graph, &[w], 0.01);
    assert_abs_diff_eq!(sgd.learning_rate(), 0.01);

    sgd.set_learning_rate(0.001);
    assert_abs_diff_eq!(sgd.learning_rate(), 0.001);
}

#[test]
fn test_adam_first_step() {
    // 第一步偏差修正后 m_hat = g, v_hat = g²，更新量约为 lr * sign(g)
    let graph = Graph::new();
    let w = graph.parameter(&[1, 2], Init::Zeros, "w").unwrap();
    w.set_value(&Tensor::new(&[1.0, -2.0], &[1, 2])).unwrap();
    let loss = square_loss(&graph, &w);

    let mut adam = Adam::new(&graph, &[w.clone()], 0.01);
    adam.minimize(&loss).unwrap();

    let updated = w.value().unwrap().unwrap();
    assert!(updated.approx_eq(&Tensor::new(&[0.99, -1.99], &[1, 2]), 1e-5));
}

#[test]
fn test_adam_second_step() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Constant(1.0), "w").unwrap();
    let loss = square_loss(&graph, &w);
    let mut adam = Adam::with_config(&graph, &[w.clone()], 0.1, 0.9, 0.999, 1e-8);

    // 第1步：g1 = 2，w = 1 - 0.1 = 0.9
    adam.minimize(&loss).unwrap();
    // 第2步：g2 = 1.8
    //   m = 0.9 * 0.2 + 0.1 * 1.8 = 0.36，m_hat = 0.36 / 0.19
    //   v = 0.999 * 0.004 + 0.001 * 3.24 = 0.007236，v_hat = 0.007236 / 0.001999
    adam.minimize(&loss).unwrap();

    let m_hat: f32 = 0.36 / 0.19;
    let v_hat: f32 = 0.007_236 / 0.001_999;
    let expected = 0.9 - 0.1 * m_hat / (v_hat.sqrt() + 1e-8);
    assert_abs_diff_eq!(w.item().unwrap(), expected, epsilon = 1e-5);
}

#[test]
fn test_adam_reset_and_learning_rate() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Constant(1.0), "w").unwrap();
    let loss = square_loss(&graph, &w);
    let mut adam = Adam::new(&graph, &[w.clone()], 0.05);
    adam.minimize(&loss).unwrap();
    adam.reset();
    adam.set_learning_rate(0.5);
    assert_abs_diff_eq!(adam.learning_rate(), 0.5);

    // 重置后下一步等同于第一步：更新量约为 lr
    let before = w.item().unwrap();
    adam.minimize(&loss).unwrap();
    assert_abs_diff_eq!(w.item().unwrap(), before - 0.5, epsilon = 1e-4);
}

#[test]
fn test_optimizer_only_updates_bound_params() {
    let graph = Graph::new();
    let w1 = graph.parameter(&[1, 1], Init::Constant(1.0), "w1").unwrap();
    let w2 = graph.parameter(&[1, 1], Init::Constant(1.0), "w2").unwrap();
    let sum = &w1 + &w2;
    let loss = square_loss(&graph, &sum);

    let mut sgd = SGD::new(&graph, &[w1.clone()], 0.1);
    sgd.minimize(&loss).unwrap();
    assert_abs_diff_eq!(w1.item().unwrap(), 0.6, epsilon = 1e-6);
    assert_abs_diff_eq!(w2.item().unwrap(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_minimize_clears_previous_grads() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Constant(1.0), "w").unwrap();
    let loss = square_loss(&graph, &w);
    let mut sgd = SGD::new(&graph, &[w.clone()], 0.0);

    sgd.minimize(&loss).unwrap();
    sgd.minimize(&loss).unwrap();
    // 学习率为0时参数不变，梯度不跨 minimize 累加
    assert_abs_diff_eq!(w.grad().unwrap().unwrap().to_vec()[0], 2.0, epsilon = 1e-6);

    sgd.zero_grad().unwrap();
    assert!(w.grad().unwrap().is_none());
}

#[test]
fn test_adam_fits_constant_target() {
    let graph = Graph::new();
    let w = graph.parameter(&[2, 2], Init::Zeros, "w").unwrap();
    let criterion = MseLoss::new();
    let target = Tensor::new(&[0.5, -0.5, 1.0, 0.0], &[2, 2]);
    let loss = criterion.forward(&w, &target).unwrap();
    let mut adam = Adam::new(&graph, &graph.parameters(), 0.02);

    let first = adam.minimize(&loss).unwrap();
    assert_abs_diff_eq!(first, 0.375, epsilon = 1e-6);
    let mut last = first;
    for _ in 0..500 {
        last = adam.minimize(&loss).unwrap();
    }
    assert!(last < 0.01, "loss 没有下降：{first} -> {last}");
}
