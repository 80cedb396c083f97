/*
 * @Author       : 老董
 * @Description  : nn 模块单元测试
 */

use crate::nn::{GraphInner, NodeId};
use crate::tensor::Tensor;

mod layer_grnn;
mod layer_propagator;
mod optimizer;

/// 创建参数节点并写入给定的值
fn parameter_with(graph: &mut GraphInner, data: &[f32], shape: &[usize], name: &str) -> NodeId {
    let id = graph.new_parameter_node(shape, Some(name)).unwrap();
    graph
        .set_node_value(id, Some(&Tensor::new(data, shape)))
        .unwrap();
    id
}

/// 创建输入节点并写入给定的值
fn input_with(graph: &mut GraphInner, data: &[f32], shape: &[usize], name: &str) -> NodeId {
    let id = graph.new_basic_input_node(shape, Some(name)).unwrap();
    graph
        .set_node_value(id, Some(&Tensor::new(data, shape)))
        .unwrap();
    id
}

/// 用中心差分估计`loss`对参数节点`param`的梯度
fn numeric_grad(graph: &mut GraphInner, loss: NodeId, param: NodeId) -> Tensor {
    const EPS: f32 = 1e-2;
    let origin = graph.get_node_value(param).unwrap().unwrap().clone();
    let shape = origin.shape().to_vec();
    let base = origin.to_vec();
    let mut grad = Vec::with_capacity(base.len());

    let loss_at = |graph: &mut GraphInner, data: &[f32]| {
        graph
            .set_node_value(param, Some(&Tensor::new(data, &shape)))
            .unwrap();
        graph.forward(loss).unwrap();
        graph
            .get_node_value(loss)
            .unwrap()
            .unwrap()
            .get_data_number()
            .unwrap()
    };

    for i in 0..base.len() {
        let mut plus = base.clone();
        plus[i] += EPS;
        let mut minus = base.clone();
        minus[i] -= EPS;
        let diff = loss_at(graph, &plus) - loss_at(graph, &minus);
        grad.push(diff / (2.0 * EPS));
    }
    graph.set_node_value(param, Some(&origin)).unwrap();
    Tensor::new(&grad, &shape)
}

/// 反向传播得到的解析梯度须与数值梯度一致
fn assert_grads_match(graph: &mut GraphInner, loss: NodeId, params: &[NodeId]) {
    graph.zero_grad();
    graph.forward(loss).unwrap();
    graph.backward(loss).unwrap();
    let analytic: Vec<Tensor> = params
        .iter()
        .map(|&p| graph.get_node_grad(p).unwrap().unwrap())
        .collect();

    for (&p, analytic) in params.iter().zip(analytic) {
        let numeric = numeric_grad(graph, loss, p);
        assert!(
            analytic.approx_eq(&numeric, 1e-2),
            "节点{:?}的梯度不一致：解析梯度{:?}，数值梯度{:?}",
            p,
            analytic.to_vec(),
            numeric.to_vec()
        );
    }
}
