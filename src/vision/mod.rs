/*
 * @Author       : 老董
 * @Date         : 2023-08-30 19:16:48
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 本模块提供可视化相关的功能。
 *                 目前只有训练过程中真实值与预测值的折线图（以PNG图像保存）。
 */

mod plot;


pub use plot::{PlotObserver, PlotStyle};
