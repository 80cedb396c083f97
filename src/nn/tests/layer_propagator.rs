/*
 * @Author       : 老董
 * @Description  : GraphPropagator 单步传播单元测试
 */

use super::assert_grads_match;
use crate::assert_err;
use crate::nn::{
    Graph, GraphError, GraphPropagator, Module, NodeId, Reduction, Var, VarLossOps,
};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

const D: usize = 3;
const N: usize = 3;

struct Step {
    x: Var,
    h: Var,
    a: Var,
    prediction: Var,
    hidden: Var,
}

fn build(graph: &Graph, cell: &GraphPropagator) -> Step {
    let x = graph.input(&Tensor::new(&[0.5, -1.0, 2.0], &[1, N])).unwrap();
    let h = graph
        .input(&Tensor::normal_with_rng(0.0, 1.0, &[D, N], &mut StdRng::seed_from_u64(9)))
        .unwrap();
    let a = graph.input(&Tensor::eye(N)).unwrap();
    let (prediction, hidden) = cell.step(&x, &h, &a).unwrap();
    Step {
        x,
        h,
        a,
        prediction,
        hidden,
    }
}

fn values(step: &Step) -> (Tensor, Tensor) {
    step.prediction.forward().unwrap();
    step.hidden.forward().unwrap();
    (
        step.prediction.value().unwrap().unwrap(),
        step.hidden.value().unwrap().unwrap(),
    )
}

#[test]
fn test_step_shapes_and_parameters() {
    let graph = Graph::new_with_seed(1);
    let cell = GraphPropagator::new(&graph, 1, D, "cell").unwrap();
    let step = build(&graph, &cell);

    assert_eq!(step.prediction.value_expected_shape().unwrap(), vec![1, N]);
    assert_eq!(step.hidden.value_expected_shape().unwrap(), vec![D, N]);

    assert_eq!(cell.num_params(), 11);
    assert_eq!(cell.num_param_elements(), 3 * D * D + 3 * D + 3 * D + D + 1);
    assert_eq!(cell.dim_feature(), 1);
    assert_eq!(cell.dim_hidden(), D);
    assert_eq!(graph.parameters().len(), 11);
}

#[test]
fn test_identity_adjacency_keeps_nodes_independent() {
    let graph = Graph::new_with_seed(2);
    let cell = GraphPropagator::new(&graph, 1, D, "cell").unwrap();
    let step = build(&graph, &cell);
    let (pred_before, hidden_before) = values(&step);

    // 只改动第2个图节点的输入与隐藏状态
    step.x
        .set_value(&Tensor::new(&[0.5, -1.0, -7.0], &[1, N]))
        .unwrap();
    let mut h = step.h.value().unwrap().unwrap();
    for k in 0..D {
        h[[k, 2]] += 3.0;
    }
    step.h.set_value(&h).unwrap();
    let (pred_after, hidden_after) = values(&step);

    for j in 0..2 {
        assert_eq!(pred_before[[0, j]], pred_after[[0, j]]);
        for k in 0..D {
            assert_eq!(hidden_before[[k, j]], hidden_after[[k, j]]);
        }
    }
    assert_ne!(pred_before[[0, 2]], pred_after[[0, 2]]);
}

#[test]
fn test_adjacency_mixes_neighbours() {
    let graph = Graph::new_with_seed(3);
    let cell = GraphPropagator::new(&graph, 1, D, "cell").unwrap();
    let step = build(&graph, &cell);

    // 节点0指向节点1：M 的第1列含有 H 的第0列
    let mut a = Tensor::eye(N);
    a[[0, 1]] = 1.0;
    step.a.set_value(&a).unwrap();
    let (_, hidden_before) = values(&step);

    let mut h = step.h.value().unwrap().unwrap();
    for k in 0..D {
        h[[k, 0]] += 2.0;
    }
    step.h.set_value(&h).unwrap();
    let (_, hidden_after) = values(&step);

    let column_changed =
        |j: usize| (0..D).any(|k| hidden_before[[k, j]] != hidden_after[[k, j]]);
    assert!(column_changed(0));
    assert!(column_changed(1));
    assert!(!column_changed(2));
}

#[test]
fn test_step_grads_match_numeric() {
    let graph = Graph::new_with_seed(4);
    let cell = GraphPropagator::new(&graph, 1, D, "cell").unwrap();
    let step = build(&graph, &cell);
    let mut a = Tensor::eye(N);
    a[[2, 0]] = 0.5;
    step.a.set_value(&a).unwrap();

    let target = graph.input(&Tensor::new(&[1.0, 0.0, -1.0], &[1, N])).unwrap();
    let loss = step
        .prediction
        .mse_loss_with_reduction(&target, Reduction::Sum)
        .unwrap();

    let params: Vec<NodeId> = cell.parameters().iter().map(Var::node_id).collect();
    assert_grads_match(&mut graph.inner_mut(), loss.node_id(), &params);
}

#[test]
fn test_step_shape_errors() {
    let graph = Graph::new();
    let cell = GraphPropagator::new(&graph, 1, D, "cell").unwrap();
    let x = graph.zeros(&[1, N]).unwrap();
    let h = graph.zeros(&[D, N]).unwrap();
    let a = graph.zeros(&[N, N]).unwrap();

    let wrong_h = graph.zeros(&[D + 1, N]).unwrap();
    assert_err!(
        cell.step(&x, &wrong_h, &a),
        GraphError::ShapeMismatch([D, N], [D + 1, N], "GraphPropagator 的隐藏状态形状不正确")
    );
    let wrong_x = graph.zeros(&[2, N]).unwrap();
    assert_err!(
        cell.step(&wrong_x, &h, &a),
        GraphError::ShapeMismatch([1, N], [2, N], "GraphPropagator 的节点特征形状不正确")
    );
    let wrong_a = graph.zeros(&[N, N + 1]).unwrap();
    assert_err!(
        cell.step(&x, &h, &wrong_a),
        GraphError::ShapeMismatch([N, N], [N, N + 1], "GraphPropagator 的邻接矩阵形状不正确")
    );

    assert_err!(
        GraphPropagator::new(&graph, 0, D, "bad"),
        GraphError::InvalidOperation(_)
    );
}
