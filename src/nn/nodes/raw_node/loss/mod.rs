mod mse_loss;

pub(crate) use mse_loss::MSELoss;
pub use mse_loss::Reduction;
