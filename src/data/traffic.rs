//! 交通流量预测数据集
//!
//! 每个任务目录下有两个 .npy 文件：
//! - `data.npy`：各传感器的读数，按 [n, T] 存放（传感器优先）
//! - `adj.npy`：传感器之间的邻接矩阵 [n, n]
//!
//! 加载后读数转置为时间优先的 [T, n]。

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::read_npy;

use crate::data::error::DataError;
use crate::tensor::Tensor;

const READINGS_FILE: &str = "data.npy";
const ADJACENCY_FILE: &str = "adj.npy";

/// 交通流量数据集：一条多传感器读数序列及传感器图的邻接矩阵
#[derive(Debug, Clone)]
pub struct TrafficDataset {
    /// 读数 [T, n]
    readings: Tensor,
    /// 邻接矩阵 [n, n]（不含自环）
    adjacency: Tensor,
}

impl TrafficDataset {
    /// 从`root/task<task_id>/`加载数据集
    pub fn load(root: impl AsRef<Path>, task_id: u32) -> Result<Self, DataError> {
        let task_dir = root.as_ref().join(format!("task{task_id}"));
        if !task_dir.is_dir() {
            return Err(DataError::UnknownTask {
                task_id,
                path: task_dir,
            });
        }

        // 读数按传感器优先存放，转置为时间优先
        let readings = read_matrix(&task_dir.join(READINGS_FILE))?.reversed_axes();
        let adjacency = read_matrix(&task_dir.join(ADJACENCY_FILE))?;

        Self::from_parts(to_tensor(readings), to_tensor(adjacency))
    }

    /// 由内存中的读数 [T, n] 与邻接矩阵 [n, n] 构建数据集
    pub fn from_parts(readings: Tensor, adjacency: Tensor) -> Result<Self, DataError> {
        let &[len, n_node] = readings.shape() else {
            return Err(DataError::ShapeMismatch {
                expected: vec![0, 0],
                got: readings.shape().to_vec(),
            });
        };
        if n_node == 0 {
            return Err(DataError::FormatError("读数中没有任何传感器".to_string()));
        }
        if adjacency.shape() != [n_node, n_node] {
            return Err(DataError::ShapeMismatch {
                expected: vec![n_node, n_node],
                got: adjacency.shape().to_vec(),
            });
        }
        if len < 2 {
            return Err(DataError::SeriesTooShort(len));
        }
        Ok(Self {
            readings,
            adjacency,
        })
    }

    /// 读数 [T, n]
    pub const fn readings(&self) -> &Tensor {
        &self.readings
    }

    /// 原始邻接矩阵 [n, n]
    pub const fn adjacency(&self) -> &Tensor {
        &self.adjacency
    }

    pub fn n_node(&self) -> usize {
        self.readings.shape()[1]
    }

    /// 时间步数 T
    pub fn len(&self) -> usize {
        self.readings.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 加上自环后的邻接矩阵：A + I
    pub fn adjacency_with_self_loops(&self) -> Tensor {
        &self.adjacency + &Tensor::eye(self.n_node())
    }

    /// 模型输入格式的读数序列：[1, T, n, 1]
    pub fn series_tensor(&self) -> Tensor {
        self.readings.reshape(&[1, self.len(), self.n_node(), 1])
    }

    /// 模型输入格式的邻接矩阵（含自环）：[1, n, n]
    pub fn adjacency_tensor(&self) -> Tensor {
        let n = self.n_node();
        self.adjacency_with_self_loops().reshape(&[1, n, n])
    }
}

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// 读取二维 .npy 矩阵，依次尝试 f64 与 f32
fn read_matrix(path: &Path) -> Result<Array2<f64>, DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    match read_npy::<_, Array2<f64>>(path) {
        Ok(matrix) => Ok(matrix),
        Err(_) => read_npy::<_, Array2<f32>>(path)
            .map(|matrix| matrix.mapv(f64::from))
            .map_err(|e| DataError::FormatError(format!("{}: {e}", path.display()))),
    }
}

fn to_tensor(matrix: Array2<f64>) -> Tensor {
    Tensor::from_array(
        matrix
            .mapv(|v| v as f32)
            .as_standard_layout()
            .into_owned()
            .into_dyn(),
    )
}
